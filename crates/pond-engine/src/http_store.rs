//! HTTP client for the remote pond store.
//!
//! Endpoints, relative to `store.base_url`:
//!
//! - `GET  /players/{player_id}/pond` -- the player's pond (404: none yet)
//! - `POST /ponds/{pond_id}/slots/{slot_id}/actions` -- apply one action
//! - `GET  /market/bonus` -- the current market bonus (204/404: none)
//!
//! A store answering 409 or 422 to an action is refusing it; every other
//! non-success status is reported as [`StoreError::Status`].

use std::time::Duration;

use reqwest::{Response, StatusCode};
use tracing::debug;

use pond_core::config::StoreConfig;
use pond_core::{PondStore, StoreError};
use pond_types::{
    MarketBonusSnapshot, PlayerId, PondId, PondSnapshot, SlotActionKind, SlotActionRequest,
    SlotActionResponse, SlotId,
};

/// A [`PondStore`] reached over HTTP with JSON bodies.
pub struct HttpPondStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPondStore {
    /// Build a client from configuration. `None` when no base URL is set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &StoreConfig) -> Result<Option<Self>, StoreError> {
        let Some(base_url) = config.base_url.as_deref() else {
            return Ok(None);
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| StoreError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Some(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        }))
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}

impl PondStore for HttpPondStore {
    async fn fetch_pond(&self, player_id: PlayerId) -> Result<Option<PondSnapshot>, StoreError> {
        let url = pond_url(&self.base_url, player_id);
        debug!(url = %url, "Fetching pond");
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = require_success(response).await?;
        response.json().await.map(Some).map_err(decode)
    }

    async fn post_slot_action(
        &self,
        pond_id: PondId,
        slot_id: SlotId,
        request: SlotActionRequest,
    ) -> Result<SlotActionResponse, StoreError> {
        let url = action_url(&self.base_url, pond_id, slot_id);
        let action = request.action;
        debug!(url = %url, action = %action, "Posting slot action");
        let response = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(rejected(action, response).await);
        }
        let response = require_success(response).await?;
        response.json().await.map_err(decode)
    }

    async fn fetch_market_bonus(&self) -> Result<Option<MarketBonusSnapshot>, StoreError> {
        let url = bonus_url(&self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = require_success(response).await?;
        response.json().await.map(Some).map_err(decode)
    }
}

fn pond_url(base: &str, player_id: PlayerId) -> String {
    format!("{base}/players/{player_id}/pond")
}

fn action_url(base: &str, pond_id: PondId, slot_id: SlotId) -> String {
    format!("{base}/ponds/{pond_id}/slots/{slot_id}/actions")
}

fn bonus_url(base: &str) -> String {
    format!("{base}/market/bonus")
}

async fn require_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_owned());
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn rejected(action: SlotActionKind, response: Response) -> StoreError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| json.get("error").and_then(serde_json::Value::as_str).map(ToOwned::to_owned))
        .unwrap_or(body);
    StoreError::Rejected { action, message }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport {
        message: e.to_string(),
    }
}

fn decode(e: reqwest::Error) -> StoreError {
    StoreError::Decode {
        message: e.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn no_base_url_means_no_store() {
        let store = HttpPondStore::from_config(&StoreConfig::default()).unwrap();
        assert!(store.is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = StoreConfig {
            base_url: Some(String::from("https://pond.example/api/")),
            ..StoreConfig::default()
        };
        let store = HttpPondStore::from_config(&config).unwrap().unwrap();
        assert_eq!(store.base_url(), "https://pond.example/api");
    }

    #[test]
    fn endpoints_embed_ids() {
        let pond_id = PondId::new();
        let slot_id = SlotId::new();
        let url = action_url("https://pond.example", pond_id, slot_id);
        assert_eq!(
            url,
            format!("https://pond.example/ponds/{pond_id}/slots/{slot_id}/actions")
        );
        assert_eq!(bonus_url("http://x"), "http://x/market/bonus");
        let player = PlayerId::new();
        assert!(pond_url("http://x", player).ends_with(&format!("{player}/pond")));
    }
}
