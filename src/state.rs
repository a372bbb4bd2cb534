use std::{fs, io::ErrorKind, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::measurement::LastNotified;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    prev_mesure_dt: Option<String>,
    #[serde(default)]
    prev_nox: Option<f64>,
}

#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Never fails: a missing or unreadable file means no prior state.
    pub fn load(&self) -> LastNotified {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return LastNotified::default(),
            Err(e) => {
                log::warn!("Failed to read {}: {e}", self.path.display());
                return LastNotified::default();
            }
        };

        match serde_json::from_str::<StateFile>(&text) {
            Ok(state) => LastNotified {
                timestamp: state.prev_mesure_dt,
                nox: state.prev_nox,
            },
            Err(e) => {
                log::warn!("Ignoring corrupt state file {}: {e}", self.path.display());
                LastNotified::default()
            }
        }
    }

    pub fn save(&self, state: &LastNotified) -> Result<(), anyhow::Error> {
        let json = serde_json::to_string(&StateFile {
            prev_mesure_dt: state.timestamp.clone(),
            prev_nox: state.nox,
        })
        .context("Failed to serialize state")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("prev_data.json"));
        assert_eq!(store.load(), LastNotified::default());
    }

    #[test]
    fn test_load_corrupt_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{not json").unwrap();

        let store = StateStore::new(file.path());
        assert_eq!(store.load(), LastNotified::default());
    }

    #[test]
    fn test_load_wrong_shape() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"["2024-01-01 10:00", 12.3]"#).unwrap();

        let store = StateStore::new(file.path());
        assert_eq!(store.load(), LastNotified::default());
    }

    #[test]
    fn test_load_partial_record() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"prev_mesure_dt": "2024-01-01 10:00"}}"#).unwrap();

        let store = StateStore::new(file.path());
        let state = store.load();
        assert_eq!(state.timestamp.as_deref(), Some("2024-01-01 10:00"));
        assert_eq!(state.nox, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("prev_data.json"));

        let state = LastNotified {
            timestamp: Some("2024-01-01 10:00".to_string()),
            nox: Some(12.3),
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);

        let state = LastNotified {
            timestamp: Some("2024-01-01 10:30".to_string()),
            nox: None,
        };
        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn test_saved_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prev_data.json");
        let store = StateStore::new(&path);

        store
            .save(&LastNotified {
                timestamp: Some("2024-01-01 10:00".to_string()),
                nox: Some(12.3),
            })
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"prev_mesure_dt": "2024-01-01 10:00", "prev_nox": 12.3})
        );
    }
}
