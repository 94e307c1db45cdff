use crate::config::toml_config::TelegramConfig;
use crate::domain::model::InboundMessage;
use crate::domain::ports::Notifier;
use crate::utils::error::{WatchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Telegram Bot API channel, driven directly over HTTP. Outbound messages
/// go through `sendMessage`; the latest inbound message comes from the
/// last entry of `getUpdates`.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    message_id: i64,
    text: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: config.api_base_url().trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let params = [("chat_id", self.chat_id.as_str()), ("text", message)];

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .form(&params)
            .send()
            .await?;

        // Best-effort delivery: a rejected message is logged, not fatal.
        if !response.status().is_success() {
            tracing::warn!("Telegram send failed: {}", response.status());
        }

        Ok(())
    }

    async fn fetch_latest_inbound(&self) -> Result<Option<InboundMessage>> {
        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .send()
            .await?;

        let body = response.text().await?;
        let updates: UpdatesResponse =
            serde_json::from_str(&body).map_err(|e| WatchError::MalformedResponseError {
                message: format!("getUpdates payload did not parse: {}", e),
            })?;

        if !updates.ok {
            return Err(WatchError::MalformedResponseError {
                message: "getUpdates returned ok=false".to_string(),
            });
        }

        Ok(updates
            .result
            .last()
            .and_then(|update| update.message.as_ref())
            .map(|message| InboundMessage {
                id: message.message_id,
                text: message.text.clone(),
            }))
    }
}
