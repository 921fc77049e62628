//! Telegram Bot API notifier backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use vaultwatch_core::{NotifyError, Notifier};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Posts each message to one chat through the Bot API.
pub struct TelegramNotifier {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    disable_preview: bool,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Both the token and the chat id are required.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let bot_token = bot_token.into();
        let chat_id = chat_id.into();
        check_credentials(&bot_token, &chat_id)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.into(),
            bot_token,
            chat_id,
            disable_preview: true,
        })
    }

    /// Point at a self-hosted Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Let Telegram render link previews.
    pub fn with_link_preview(mut self, enabled: bool) -> Self {
        self.disable_preview = !enabled;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }

    fn body<'a>(&'a self, text: &'a str) -> SendMessage<'a> {
        SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: self.disable_preview,
        }
    }
}

fn check_credentials(bot_token: &str, chat_id: &str) -> Result<(), NotifyError> {
    if bot_token.trim().is_empty() {
        return Err(NotifyError::MissingCredentials { what: "bot token" });
    }
    if chat_id.trim().is_empty() {
        return Err(NotifyError::MissingCredentials { what: "chat id" });
    }
    Ok(())
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        check_credentials(&self.bot_token, &self.chat_id)?;

        // The URL carries the token; keep it out of error messages.
        let resp = self
            .http
            .post(self.endpoint())
            .json(&self.body(text))
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected { status, body });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_rejected() {
        assert!(matches!(
            TelegramNotifier::new("", "123"),
            Err(NotifyError::MissingCredentials { what: "bot token" })
        ));
        assert!(matches!(
            TelegramNotifier::new("123:abc", " "),
            Err(NotifyError::MissingCredentials { what: "chat id" })
        ));
    }

    #[test]
    fn endpoint_embeds_token() {
        let n = TelegramNotifier::new("123:abc", "-10042")
            .unwrap()
            .with_api_base("http://localhost:8081/");
        assert_eq!(n.endpoint(), "http://localhost:8081/bot123:abc/sendMessage");
    }

    #[test]
    fn body_disables_preview_by_default() {
        let n = TelegramNotifier::new("123:abc", "-10042").unwrap();
        let json = serde_json::to_value(n.body("hello")).unwrap();
        assert_eq!(json["chat_id"], "-10042");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["disable_web_page_preview"], true);

        let n = n.with_link_preview(true);
        let json = serde_json::to_value(n.body("hello")).unwrap();
        assert_eq!(json["disable_web_page_preview"], false);
    }

    #[test]
    fn debug_hides_token() {
        let n = TelegramNotifier::new("123:secret", "1").unwrap();
        assert!(!format!("{n:?}").contains("secret"));
    }
}
