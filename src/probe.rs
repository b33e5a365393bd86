// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error-propagation probe scenarios
//!
//! Each scenario issues one load request for a model whose artifact is
//! malformed, expects the load to FAIL, and verifies the returned message
//! against the layered-error contract in [`crate::report`]. A load that
//! succeeds is itself a hard failure. Scenarios are independent; running one
//! never affects the other.

use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ClientError, InferenceServerClient};
use crate::config::ProbeConfig;
use crate::report::{self, VerifyError};

#[derive(Error, Debug)]
pub enum ProbeError {
    /// The load was supposed to fail but the server reported success
    #[error("expected loading model '{model}' to fail, but the server reported success")]
    UnexpectedSuccess { model: String },

    /// The error arrived but its message failed layered verification
    #[error(transparent)]
    Verification(#[from] VerifyError),

    /// Transport failure before any server-side error could be produced
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Probe driving the invalid-model scenarios against a live server
pub struct ErrorPropagationProbe {
    client: InferenceServerClient,
    config: ProbeConfig,
}

impl ErrorPropagationProbe {
    pub fn new(config: ProbeConfig) -> Result<Self, ClientError> {
        let client = InferenceServerClient::connect(&config.server_url, config.request_timeout)?;
        Ok(Self { client, config })
    }

    pub fn client(&self) -> &InferenceServerClient {
        &self.client
    }

    /// Load the invalid model and verify the three-layer error structure:
    /// server fragments before the backend marker, engine fragments after.
    pub async fn run_invalid_model_scenario(&self) -> Result<(), ProbeError> {
        let message = self.trigger_load_error().await?;
        report::verify_layered_error(&message)?;
        info!(model = %self.config.model_name, "layered error message verified");
        Ok(())
    }

    /// Load the invalid model from a config-less repository entry and verify
    /// the server reports the config-autocompletion failure.
    pub async fn run_autocomplete_scenario(&self) -> Result<(), ProbeError> {
        let message = self.trigger_load_error().await?;
        report::verify_autocomplete_error(&message)?;
        info!(model = %self.config.model_name, "autocomplete error message verified");
        Ok(())
    }

    /// Issue the load request and return the server's error message.
    ///
    /// Success and transport failures both abort the scenario; only a
    /// server-reported error is the expected outcome.
    async fn trigger_load_error(&self) -> Result<String, ProbeError> {
        let model = &self.config.model_name;
        if self.config.verbose {
            info!(model, server = %self.config.server_url, "requesting load of invalid model");
        }

        match self.client.load_model(model).await {
            Ok(()) => {
                warn!(model, "server accepted a model that must not load");
                Err(ProbeError::UnexpectedSuccess {
                    model: model.clone(),
                })
            }
            Err(ClientError::Server { message }) => Ok(message),
            Err(err @ ClientError::Connection(_)) => Err(err.into()),
        }
    }
}
