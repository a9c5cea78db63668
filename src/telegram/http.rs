//! `reqwest` implementation of the Bot API seam.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::api::{ApiError, BotApi};
use super::types::{
    AccountIdentity, ApiResponse, BotCommandSpec, BotUser, InboundUpdate, OutgoingMessage,
    SetCommandsRequest, SetReactionRequest,
};
use crate::config::{AccountCredential, ApiSettings};

/// Only message events are requested from `getUpdates`.
const ALLOWED_UPDATES: &str = r#"["message"]"#;

/// Bot API client over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpBotApi {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    long_poll_wait: Duration,
    fetch_timeout: Duration,
}

impl HttpBotApi {
    /// Builds a client from API settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            request_timeout: settings.request_timeout,
            long_poll_wait: settings.long_poll_wait,
            fetch_timeout: settings.fetch_timeout,
        })
    }

    fn method_url(&self, credential: &AccountCredential, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, credential.expose(), method)
    }

    async fn post_json<B: serde::Serialize + Sync>(
        &self,
        credential: &AccountCredential,
        method: &'static str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.method_url(credential, method))
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await?;

        decode::<Value>(method, response).await.map(|_| ())
    }
}

/// Unwraps the response envelope.
async fn decode<T: DeserializeOwned>(
    method: &'static str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let body: ApiResponse<T> = response.json().await?;

    if !body.ok {
        return Err(ApiError::Rejected {
            method,
            code: body.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
            description: body.description.unwrap_or_default(),
        });
    }

    body.result
        .ok_or_else(|| ApiError::Decode(format!("{method} response has no result")))
}

#[async_trait]
impl BotApi for HttpBotApi {
    async fn get_me(&self, credential: &AccountCredential) -> Result<AccountIdentity, ApiError> {
        let response = self
            .http
            .get(self.method_url(credential, "getMe"))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let user: BotUser = decode("getMe", response).await?;
        match user.username {
            Some(username) if !username.is_empty() => Ok(AccountIdentity::new(username)),
            _ => Err(ApiError::MissingUsername),
        }
    }

    async fn set_my_commands(
        &self,
        credential: &AccountCredential,
        commands: &[BotCommandSpec],
    ) -> Result<(), ApiError> {
        self.post_json(credential, "setMyCommands", &SetCommandsRequest { commands })
            .await
    }

    async fn get_updates(
        &self,
        credential: &AccountCredential,
        offset: Option<i64>,
    ) -> Result<Vec<InboundUpdate>, ApiError> {
        let mut query = vec![
            ("timeout", self.long_poll_wait.as_secs().to_string()),
            ("allowed_updates", ALLOWED_UPDATES.to_owned()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .http
            .get(self.method_url(credential, "getUpdates"))
            .query(&query)
            .timeout(self.fetch_timeout)
            .send()
            .await?;

        let raw: Vec<Value> = decode("getUpdates", response).await?;
        let total = raw.len();

        let updates: Vec<InboundUpdate> = raw
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<InboundUpdate>(item) {
                Ok(update) => Some(update),
                Err(e) => {
                    warn!("Dropping update without a readable update_id: {}", e);
                    None
                }
            })
            .collect();

        if updates.len() < total {
            debug!("Decoded {} of {} updates", updates.len(), total);
        }

        Ok(updates)
    }

    async fn send_message(
        &self,
        credential: &AccountCredential,
        message: &OutgoingMessage,
    ) -> Result<(), ApiError> {
        self.post_json(credential, "sendMessage", message).await
    }

    async fn set_message_reaction(
        &self,
        credential: &AccountCredential,
        reaction: &SetReactionRequest,
    ) -> Result<(), ApiError> {
        self.post_json(credential, "setMessageReaction", reaction)
            .await
    }
}
