use crate::config::NOX_WARNING_PPM;

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub timestamp: String,
    pub nox: Option<f64>,
}

impl Measurement {
    pub fn is_warning(&self) -> bool {
        self.nox.is_some_and(|nox| nox >= NOX_WARNING_PPM)
    }

    pub fn message(&self) -> String {
        let nox = match self.nox {
            Some(nox) => format!("{nox:?}"),
            None => "N/A".to_string(),
        };
        let marker = if self.is_warning() { " 🚨" } else { "" };

        format!(
            "\n📢 *굴뚝 측정 데이터 업데이트* 🏭\n\
             📅 측정 시간: `{}`  \n\
             🔸 질소산화물 (NOx): `{nox} ppm`{marker}\n",
            self.timestamp
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastNotified {
    pub timestamp: Option<String>,
    pub nox: Option<f64>,
}

impl LastNotified {
    /// Exact comparison: any difference in either field counts, including
    /// a value appearing or disappearing.
    pub fn differs_from(&self, m: &Measurement) -> bool {
        self.timestamp.as_deref() != Some(m.timestamp.as_str()) || self.nox != m.nox
    }
}

impl From<&Measurement> for LastNotified {
    fn from(m: &Measurement) -> Self {
        Self {
            timestamp: Some(m.timestamp.clone()),
            nox: m.nox,
        }
    }
}
