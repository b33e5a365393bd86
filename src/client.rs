// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model-control client for a Triton-style inference server
//!
//! Thin wrapper around the server's HTTP model-control API:
//!
//! | Operation          | Endpoint                                  |
//! |--------------------|-------------------------------------------|
//! | `load_model`       | `POST /v2/repository/models/{name}/load`  |
//! | `unload_model`     | `POST /v2/repository/models/{name}/unload`|
//! | `is_server_live`   | `GET /v2/health/live`                     |
//!
//! Failed operations arrive as a non-2xx status with a JSON body
//! `{"error": "<message>"}`; the message is the server's fully propagated
//! error string and is surfaced verbatim in [`ClientError::Server`].

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure: unreachable server, invalid URL, timeout
    #[error("connection to inference server failed: {0}")]
    Connection(String),

    /// The server processed the request and reported an error
    #[error("{message}")]
    Server { message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}

/// Error envelope the server wraps failure messages in
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Connection handle to a running inference server
#[derive(Debug, Clone)]
pub struct InferenceServerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InferenceServerClient {
    /// Build a client for the server at `base_url` (e.g. `http://localhost:8000`).
    ///
    /// Only constructs the transport; reachability is checked per call.
    pub fn connect(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Connection(format!("invalid server URL '{base_url}': {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// Liveness check against `GET /v2/health/live`.
    pub async fn is_server_live(&self) -> Result<bool, ClientError> {
        let url = self.endpoint("v2/health/live")?;
        let resp = self.http.get(url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Request an explicit load of `model_name` from the server's model
    /// repository. Returns the propagated error message on failure.
    pub async fn load_model(&self, model_name: &str) -> Result<(), ClientError> {
        self.repository_action(model_name, "load").await
    }

    /// Request an explicit unload of `model_name`.
    pub async fn unload_model(&self, model_name: &str) -> Result<(), ClientError> {
        self.repository_action(model_name, "unload").await
    }

    async fn repository_action(&self, model_name: &str, action: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("v2/repository/models/{model_name}/{action}"))?;
        debug!(%url, model = model_name, action, "model-control request");

        let resp = self.http.post(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        // Prefer the JSON error envelope, fall back to the raw body
        let body = resp.text().await?;
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(envelope) => envelope.error,
            Err(_) => body,
        };
        debug!(%status, %message, "model-control request failed");
        Err(ClientError::Server { message })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Connection(format!("invalid endpoint path '{path}': {e}")))
    }
}
