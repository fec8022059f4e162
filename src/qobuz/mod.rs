//! # Qobuz Integration Module
//!
//! Remote side of the catalog: the [`CatalogApi`] seam the rest of the crate
//! talks to, its reqwest implementation [`QobuzClient`], the login flow and
//! the mutations (playlists, favorites) that invalidate cached responses.
//!
//! ```text
//! Tree Builder / CLI
//!          ↓
//! Catalog (cache + staleness policy)
//!          ↓
//! CatalogApi  ──  QobuzClient (reqwest, JSON)
//!          ↓
//! Qobuz JSON API
//! ```
//!
//! Every call answers `Option<serde_json::Value>`: `None` covers network
//! errors, HTTP errors and empty payloads alike, which the callers treat as
//! "no content". Failures are reported with the `warning!` macro.

pub mod auth;
pub mod favorites;
pub mod playlist;

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::sleep;

use crate::{config, debug, types::Args, warning};

const MAX_ATTEMPTS: u32 = 3;

/// Remote catalog collaborator.
pub trait CatalogApi {
    /// Calls `endpoint` (e.g. `/album/get`) with the given named arguments.
    fn get(&self, endpoint: &str, args: &Args) -> impl Future<Output = Option<Value>>;
}

pub struct QobuzClient {
    client: Client,
    base_url: String,
    app_id: Option<String>,
    user_auth_token: Option<String>,
}

impl QobuzClient {
    pub fn new(base_url: String, app_id: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
            user_auth_token: None,
        }
    }

    /// Client configured from the environment.
    pub fn from_env() -> Self {
        Self::new(config::api_url(), config::app_id())
    }

    pub fn with_user_auth_token(mut self, token: Option<String>) -> Self {
        self.user_auth_token = token;
        self
    }
}

impl CatalogApi for QobuzClient {
    async fn get(&self, endpoint: &str, args: &Args) -> Option<Value> {
        let api_url = format!("{}{}", self.base_url, endpoint);
        let mut query: Vec<(&str, &str)> = args
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(app_id) = &self.app_id {
            query.push(("app_id", app_id.as_str()));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut request = self.client.get(&api_url).query(&query);
            if let Some(app_id) = &self.app_id {
                request = request.header("X-App-Id", app_id.as_str());
            }
            if let Some(token) = &self.user_auth_token {
                request = request.header("X-User-Auth-Token", token.as_str());
            }

            let response = match request.send().await {
                Ok(resp) => match resp.error_for_status() {
                    Ok(valid_response) => valid_response,
                    Err(err) => {
                        if err.status() == Some(StatusCode::BAD_GATEWAY) && attempt < MAX_ATTEMPTS {
                            sleep(Duration::from_secs(2)).await;
                            continue; // retry
                        }
                        warning!("Request {} failed: {}", endpoint, err);
                        return None;
                    }
                },
                Err(err) => {
                    warning!("Request {} failed: {}", endpoint, err);
                    return None;
                } // network or reqwest error
            };

            return match response.json::<Value>().await {
                Ok(json) if !is_empty_payload(&json) => {
                    debug!("Fetched {} from remote", endpoint);
                    Some(json)
                }
                Ok(_) => None,
                Err(err) => {
                    warning!("Cannot decode response of {}: {}", endpoint, err);
                    None
                }
            };
        }
    }
}

/// `null`, `false`, `{}` and `[]` carry no content.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
