// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod client;
pub mod config;
pub mod probe;
pub mod report;
pub mod repository;

// Re-export main types
pub use client::{ClientError, InferenceServerClient};
pub use config::ProbeConfig;
pub use probe::{ErrorPropagationProbe, ProbeError};
pub use report::{
    verify_autocomplete_error, verify_layered_error, ErrorReport, ExpectedFragments, VerifyError,
    AUTOCOMPLETE_ERROR_MARKER, BACKEND_ERROR_MARKER, ENGINE_LAYER_FRAGMENTS,
    SERVER_LAYER_FRAGMENTS,
};
pub use repository::ModelRepository;
