use std::time::Duration;

pub const API_URL: &str = "http://apis.data.go.kr/B552584/cleansys/rltmMesureResult";
pub const AREA_NAME: &str = "경기도";
pub const FACTORY_NAME: &str = "린텍스기업(주)";

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const PARSE_MODE: &str = "Markdown";

/// Survives restarts of the same container, not redeploys.
pub const STATE_FILE: &str = "/tmp/prev_data.json";

pub const POLL_INTERVAL: Duration = Duration::from_secs(1800);

pub const NOX_WARNING_PPM: f64 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Missing values are left empty; the HTTP calls report the failure.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key).unwrap_or_else(|| {
                log::warn!("{key} is not set");
                String::new()
            })
        };

        Self {
            bot_token: get("TELEGRAM_BOT_TOKEN"),
            chat_id: get("TELEGRAM_CHAT_ID"),
            api_key: get("API_KEY"),
        }
    }
}
