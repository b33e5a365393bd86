// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Probe configuration
//!
//! Defaults target a server on localhost; every field can be overridden via
//! environment variables (`TRITON_SERVER_URL`, `PROBE_MODEL_NAME`,
//! `PROBE_TIMEOUT_SECS`) or the CLI flags in the binary.

use std::env;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_MODEL_NAME: &str = "invalid_plan_file";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Base URL of the inference server's HTTP endpoint
    pub server_url: String,
    /// Name of the deliberately invalid model to load
    pub model_name: String,
    /// Per-request timeout applied to the transport
    pub request_timeout: Duration,
    /// Log each request/response pair
    pub verbose: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verbose: false,
        }
    }
}

impl ProbeConfig {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let server_url =
            env::var("TRITON_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let model_name =
            env::var("PROBE_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string());
        let timeout_secs = env::var("PROBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            server_url,
            model_name,
            request_timeout: Duration::from_secs(timeout_secs),
            verbose: false,
        }
    }
}
