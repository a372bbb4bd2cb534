use anyhow::Context;

use crate::config::{PARSE_MODE, TELEGRAM_API_URL};

pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), anyhow::Error>;
}

#[derive(Debug)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, bot_token: String, chat_id: String) -> Self {
        Self {
            client,
            bot_token,
            chat_id,
        }
    }

    fn url(&self) -> String {
        format!("{TELEGRAM_API_URL}/bot{}/sendMessage", self.bot_token)
    }

    fn form<'a>(&'a self, text: &'a str) -> [(&'static str, &'a str); 3] {
        [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", PARSE_MODE),
        ]
    }
}

impl Notifier for TelegramNotifier {
    /// A rejected message is only logged; transport errors are returned.
    async fn send(&self, text: &str) -> Result<(), anyhow::Error> {
        let response = self
            .client
            .post(self.url())
            .form(&self.form(text))
            .send()
            .await
            .context("Failed to send Telegram message")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Telegram API returned {status}: {body}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TelegramNotifier {
        TelegramNotifier::new(
            reqwest::Client::new(),
            "123:abc".to_string(),
            "-10042".to_string(),
        )
    }

    #[test]
    fn test_url() {
        assert_eq!(
            notifier().url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_form() {
        let notifier = notifier();
        let form = notifier.form("hello");
        assert_eq!(
            form,
            [
                ("chat_id", "-10042"),
                ("text", "hello"),
                ("parse_mode", "Markdown"),
            ]
        );
    }
}
