// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model-repository fixture for the invalid-plan scenarios
//!
//! Materializes the directory layout the server's repository poller expects:
//!
//! ```text
//! <root>/
//!   invalid_plan_file/
//!     config.pbtxt          # declares platform "tensorrt_plan"
//!     1/
//!       model.plan          # placeholder bytes, not a serialized engine
//! ```
//!
//! The autocomplete variant omits `config.pbtxt`, forcing the server to
//! derive the model configuration from the plan file itself (and fail on the
//! same malformed bytes).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Bytes written as `model.plan`. Any byte string that is not a serialized
/// engine works; the engine's deserializer rejects it with an internal error.
pub const INVALID_PLAN_BYTES: &[u8] = b"this is an invalid plan file";

const MODEL_VERSION: &str = "1";

/// On-disk model repository containing deliberately malformed artifacts
#[derive(Debug)]
pub struct ModelRepository {
    root: PathBuf,
}

impl ModelRepository {
    /// Create the repository at `root` with one invalid TensorRT model.
    pub async fn create(root: impl AsRef<Path>, model_name: &str) -> Result<Self> {
        let repo = Self {
            root: root.as_ref().to_path_buf(),
        };
        let model_dir = repo.model_dir(model_name);
        repo.write_plan_file(&model_dir).await?;

        let config_path = model_dir.join("config.pbtxt");
        fs::write(&config_path, Self::plan_model_config(model_name))
            .await
            .with_context(|| format!("failed to write {}", config_path.display()))?;

        info!(model = model_name, root = %repo.root.display(), "created invalid-plan model fixture");
        Ok(repo)
    }

    /// Add a config-less copy of the invalid model under `model_name`, so the
    /// server must attempt config autocompletion from the plan file.
    pub async fn add_autocomplete_variant(&self, model_name: &str) -> Result<()> {
        let model_dir = self.model_dir(model_name);
        self.write_plan_file(&model_dir).await?;
        info!(model = model_name, "created autocomplete variant (no config.pbtxt)");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model_dir(&self, model_name: &str) -> PathBuf {
        self.root.join(model_name)
    }

    async fn write_plan_file(&self, model_dir: &Path) -> Result<()> {
        let version_dir = model_dir.join(MODEL_VERSION);
        fs::create_dir_all(&version_dir)
            .await
            .with_context(|| format!("failed to create {}", version_dir.display()))?;

        let plan_path = version_dir.join("model.plan");
        fs::write(&plan_path, INVALID_PLAN_BYTES)
            .await
            .with_context(|| format!("failed to write {}", plan_path.display()))?;
        Ok(())
    }

    fn plan_model_config(model_name: &str) -> String {
        format!(
            r#"name: "{model_name}"
platform: "tensorrt_plan"
max_batch_size: 1
input [
  {{
    name: "INPUT0"
    data_type: TYPE_FP32
    dims: [ 4 ]
  }}
]
output [
  {{
    name: "OUTPUT0"
    data_type: TYPE_FP32
    dims: [ 4 ]
  }}
]
"#
        )
    }
}
