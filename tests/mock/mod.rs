// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process mock of a Triton-style model-control API
//!
//! Serves the two endpoints the probe touches on an ephemeral port. Load
//! requests are dispatched on the model name:
//! - names ending in `_autocomplete` fail with the config-autocompletion
//!   error,
//! - other names containing `invalid` fail with the full three-layer
//!   propagated message,
//! - anything else loads "successfully".

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// Three-layer message a real server produces for a malformed plan file.
pub fn layered_error(model: &str) -> String {
    format!(
        "load failed for model '{model}': version 1 is at UNAVAILABLE state: \
         Internal: unable to create TensorRT engine: \
         Error Code 4: Internal Error (Engine deserialization failed. \
         Serialization assertion magicTagRead == kMAGIC_TAG failed. \
         Magic tag does not match)"
    )
}

/// Message produced when config autocompletion reads the malformed plan.
pub fn autocomplete_error(model: &str) -> String {
    format!(
        "failed to load '{model}', failed to poll from model repository: \
         Internal: unable to load plan file to auto complete config: \
         /models/{model}/1/model.plan"
    )
}

pub struct MockInferenceServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockInferenceServer {
    pub async fn spawn() -> Self {
        let app = Router::new()
            .route("/v2/health/live", get(|| async { StatusCode::OK }))
            .route("/v2/repository/models/:model/load", post(load_model))
            .route(
                "/v2/repository/models/:model/unload",
                post(|| async { StatusCode::OK }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock server crashed");
        });

        Self { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for MockInferenceServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn load_model(Path(model): Path<String>) -> impl IntoResponse {
    if model.ends_with("_autocomplete") {
        let body = json!({ "error": autocomplete_error(&model) });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }
    if model.contains("invalid") {
        let body = json!({ "error": layered_error(&model) });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }
    StatusCode::OK.into_response()
}
