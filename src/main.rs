// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{bail, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use trt_error_probe::{
    config::{DEFAULT_MODEL_NAME, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS},
    ErrorPropagationProbe, ModelRepository, ProbeConfig,
};

/// Probe a running inference server for correct layered error propagation
/// when loading a malformed TensorRT plan.
#[derive(Parser, Debug)]
#[command(name = "trt-error-probe")]
#[command(about = "Verify server/backend/engine error propagation for an invalid model load", long_about = None)]
struct Cli {
    /// Base URL of the inference server's HTTP endpoint
    #[arg(long, env = "TRITON_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    url: String,

    /// Name of the invalid model to load
    #[arg(long, env = "PROBE_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    model: String,

    /// Materialize the invalid-model fixture into this directory before probing
    #[arg(long)]
    repository: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Run the autocomplete scenario instead of the layered-error scenario
    #[arg(long)]
    autocomplete: bool,

    /// Log each request/response pair
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Some(root) = &cli.repository {
        let repo = ModelRepository::create(root, &cli.model).await?;
        repo.add_autocomplete_variant(&format!("{}_autocomplete", cli.model))
            .await?;
    }

    let config = ProbeConfig {
        server_url: cli.url.clone(),
        model_name: cli.model.clone(),
        request_timeout: Duration::from_secs(cli.timeout_secs),
        verbose: cli.verbose,
    };
    let probe = ErrorPropagationProbe::new(config)?;

    if !probe.client().is_server_live().await.unwrap_or(false) {
        bail!("inference server at {} is not live", cli.url);
    }

    let outcome = if cli.autocomplete {
        probe.run_autocomplete_scenario().await
    } else {
        probe.run_invalid_model_scenario().await
    };

    match outcome {
        Ok(()) => {
            info!(model = %cli.model, "error propagation verified");
            Ok(())
        }
        Err(err) => {
            error!(model = %cli.model, %err, "error propagation check failed");
            bail!("{err}");
        }
    }
}
