//! Telegram notification sink.
//!
//! Delivery is best-effort by contract: a sink without credentials skips
//! silently, and delivery failures are surfaced as errors for the caller to
//! log — never to abort a run. The bot token stays inside a
//! [`SecretString`] and is only interpolated into the request URL.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::TelegramConfig;
use crate::http_client::{HttpClient, HttpRequest};

const API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT_MS: u64 = 10_000;
const MAX_ERROR_BODY_LEN: usize = 200;

/// Delivery errors. The bot token never appears in these messages.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("telegram transport error: {0}")]
    Transport(String),

    #[error("telegram API returned status {status}: {body}")]
    Api { status: u16, body: String },
}

/// Sends per-ticker report messages to a Telegram chat.
pub struct TelegramNotifier {
    http: Arc<dyn HttpClient>,
    bot_token: Option<SecretString>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(http: Arc<dyn HttpClient>, config: TelegramConfig) -> Self {
        Self {
            http,
            bot_token: config.bot_token,
            chat_id: config.chat_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }

    /// Deliver one message. Missing credentials are an info-level skip.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let (Some(token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            tracing::info!("telegram credentials not provided; skipping message send");
            return Ok(());
        };

        let url = format!("{API_BASE}/bot{}/sendMessage", token.expose_secret());
        let request = HttpRequest::post(url)
            .with_form(&[("chat_id", chat_id), ("text", text)])
            .with_timeout_ms(SEND_TIMEOUT_MS);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| NotifyError::Transport(error.message().to_owned()))?;

        if !response.is_success() {
            return Err(NotifyError::Api {
                status: response.status,
                body: truncated(&response.body),
            });
        }

        Ok(())
    }
}

fn truncated(body: &str) -> String {
    let mut body = body.trim().to_owned();
    if body.len() > MAX_ERROR_BODY_LEN {
        let cut = (0..=MAX_ERROR_BODY_LEN)
            .rev()
            .find(|index| body.is_char_boundary(*index))
            .unwrap_or(0);
        body.truncate(cut);
    }
    body
}
