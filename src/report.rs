// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Layered error-report parsing and verification
//!
//! An error message propagated out of a failed model load is a single string
//! built from three layers of context:
//!
//! ```text
//! [server message]<backend marker>[engine message]
//! ```
//!
//! The backend marker is the fixed substring the TensorRT backend prepends to
//! the engine error. Splitting the message at its first occurrence yields the
//! server-layer segment (model state, load failure) and the engine-layer
//! segment (error code, internal error description). Each layer must carry
//! its expected fragments; every missing fragment is reported individually,
//! naming the layer it was missing from.

use thiserror::Error;

/// Marker the TensorRT backend inserts between server context and the raw
/// engine error.
pub const BACKEND_ERROR_MARKER: &str = "Internal: unable to create TensorRT engine: ";

/// Marker emitted when the server fails to auto-complete a model config from
/// the plan file itself.
pub const AUTOCOMPLETE_ERROR_MARKER: &str =
    "Internal: unable to load plan file to auto complete config";

/// Fragments that must appear in the server-layer segment.
pub const SERVER_LAYER_FRAGMENTS: [&str; 2] =
    ["load failed for model", "version 1 is at UNAVAILABLE state: "];

/// Fragments that must appear in the engine-layer segment.
pub const ENGINE_LAYER_FRAGMENTS: [&str; 2] = ["Error Code ", "Internal Error "];

/// Verification failures, one variant per missing-fragment class
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VerifyError {
    /// The backend marker is absent, so the message cannot be split into
    /// server and engine segments
    #[error("cannot find the expected TensorRT backend error marker {BACKEND_ERROR_MARKER:?} in error message: {message}")]
    MissingBackendMarker { message: String },

    /// One side of the split carried no text at all
    #[error("the {layer} segment of the error message is empty: {message}")]
    EmptySegment {
        layer: &'static str,
        message: String,
    },

    /// An expected server-layer (Triton) fragment is absent from the segment
    /// before the backend marker
    #[error("cannot find expected Triton server error fragment {fragment:?} in segment: {segment}")]
    MissingServerFragment { fragment: String, segment: String },

    /// An expected engine-layer (TensorRT) fragment is absent from the
    /// segment after the backend marker
    #[error("cannot find expected TensorRT framework error fragment {fragment:?} in segment: {segment}")]
    MissingEngineFragment { fragment: String, segment: String },

    /// The autocomplete failure marker is absent
    #[error("cannot find the expected autocomplete error marker {AUTOCOMPLETE_ERROR_MARKER:?} in error message: {message}")]
    MissingAutocompleteMarker { message: String },
}

/// Fragment groups expected in each segment of a layered error message.
///
/// Order within a group is irrelevant; each fragment only has to appear as a
/// substring of its segment.
#[derive(Debug, Clone)]
pub struct ExpectedFragments {
    pub server: Vec<String>,
    pub engine: Vec<String>,
}

impl Default for ExpectedFragments {
    fn default() -> Self {
        Self {
            server: SERVER_LAYER_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
            engine: ENGINE_LAYER_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// An error message split at the backend marker into its two layer segments
#[derive(Debug, Clone)]
pub struct ErrorReport {
    raw: String,
    server_segment: String,
    engine_segment: String,
}

impl ErrorReport {
    /// Split `message` at the first occurrence of [`BACKEND_ERROR_MARKER`].
    ///
    /// Both resulting segments must be non-empty.
    pub fn parse(message: &str) -> Result<Self, VerifyError> {
        let (server_segment, engine_segment) = message
            .split_once(BACKEND_ERROR_MARKER)
            .ok_or_else(|| VerifyError::MissingBackendMarker {
                message: message.to_string(),
            })?;

        if server_segment.is_empty() {
            return Err(VerifyError::EmptySegment {
                layer: "server",
                message: message.to_string(),
            });
        }
        if engine_segment.is_empty() {
            return Err(VerifyError::EmptySegment {
                layer: "engine",
                message: message.to_string(),
            });
        }

        Ok(Self {
            raw: message.to_string(),
            server_segment: server_segment.to_string(),
            engine_segment: engine_segment.to_string(),
        })
    }

    /// The complete message as received from the server
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Text preceding the backend marker (server/runtime context)
    pub fn server_segment(&self) -> &str {
        &self.server_segment
    }

    /// Text following the backend marker (engine framework context)
    pub fn engine_segment(&self) -> &str {
        &self.engine_segment
    }

    /// Check every expected fragment against its segment, failing on the
    /// first absent one with a message naming the layer.
    pub fn verify(&self, expected: &ExpectedFragments) -> Result<(), VerifyError> {
        for fragment in &expected.server {
            if !self.server_segment.contains(fragment.as_str()) {
                return Err(VerifyError::MissingServerFragment {
                    fragment: fragment.clone(),
                    segment: self.server_segment.clone(),
                });
            }
        }
        for fragment in &expected.engine {
            if !self.engine_segment.contains(fragment.as_str()) {
                return Err(VerifyError::MissingEngineFragment {
                    fragment: fragment.clone(),
                    segment: self.engine_segment.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parse and verify a message against the default fragment set.
pub fn verify_layered_error(message: &str) -> Result<(), VerifyError> {
    ErrorReport::parse(message)?.verify(&ExpectedFragments::default())
}

/// Verify the autocomplete-failure marker is present in a message.
pub fn verify_autocomplete_error(message: &str) -> Result<(), VerifyError> {
    if message.contains(AUTOCOMPLETE_ERROR_MARKER) {
        Ok(())
    } else {
        Err(VerifyError::MissingAutocompleteMarker {
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERED_MESSAGE: &str = "load failed for model 'invalid_plan_file': \
         version 1 is at UNAVAILABLE state: \
         Internal: unable to create TensorRT engine: \
         Error Code 4: Internal Error (Engine deserialization failed. \
         Serialization assertion magicTagRead == kMAGIC_TAG failed. \
         Magic tag does not match)";

    #[test]
    fn parse_splits_into_two_segments() {
        let report = ErrorReport::parse(LAYERED_MESSAGE).expect("parse failed");
        assert!(report.server_segment().contains("load failed for model"));
        assert!(report.engine_segment().starts_with("Error Code 4"));
        assert!(!report.server_segment().contains(BACKEND_ERROR_MARKER));
        assert!(!report.engine_segment().contains(BACKEND_ERROR_MARKER));
    }

    #[test]
    fn parse_splits_at_first_marker_occurrence() {
        let message = format!(
            "top: {}Error Code 1: {}nested",
            BACKEND_ERROR_MARKER, BACKEND_ERROR_MARKER
        );
        let report = ErrorReport::parse(&message).expect("parse failed");
        assert_eq!(report.server_segment(), "top: ");
        assert!(report.engine_segment().contains(BACKEND_ERROR_MARKER));
    }

    #[test]
    fn parse_rejects_message_without_marker() {
        let err = ErrorReport::parse("model not found").unwrap_err();
        assert!(matches!(err, VerifyError::MissingBackendMarker { .. }));
        assert!(err.to_string().contains("TensorRT backend"));
    }

    #[test]
    fn parse_rejects_empty_server_segment() {
        let message = format!("{}Error Code 4: Internal Error", BACKEND_ERROR_MARKER);
        let err = ErrorReport::parse(&message).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::EmptySegment { layer: "server", .. }
        ));
    }

    #[test]
    fn parse_rejects_empty_engine_segment() {
        let message = format!("load failed for model 'm': {}", BACKEND_ERROR_MARKER);
        let err = ErrorReport::parse(&message).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::EmptySegment { layer: "engine", .. }
        ));
    }

    #[test]
    fn verify_accepts_complete_message() {
        verify_layered_error(LAYERED_MESSAGE).expect("verification failed");
    }

    #[test]
    fn verify_reports_missing_server_fragment() {
        // Engine text intact, server text missing the version-state fragment
        let message = format!(
            "load failed for model 'invalid_plan_file': {}Error Code 4: Internal Error (x)",
            BACKEND_ERROR_MARKER
        );
        let err = verify_layered_error(&message).unwrap_err();
        match err {
            VerifyError::MissingServerFragment { fragment, .. } => {
                assert_eq!(fragment, "version 1 is at UNAVAILABLE state: ");
            }
            other => panic!("expected MissingServerFragment, got {other:?}"),
        }
        // Failure text names the server layer
        let rendered = verify_layered_error(&message).unwrap_err().to_string();
        assert!(rendered.contains("Triton server"));
    }

    #[test]
    fn verify_reports_missing_engine_fragment() {
        let message = format!(
            "load failed for model 'm': version 1 is at UNAVAILABLE state: {}something else entirely",
            BACKEND_ERROR_MARKER
        );
        let err = verify_layered_error(&message).unwrap_err();
        match &err {
            VerifyError::MissingEngineFragment { fragment, .. } => {
                assert_eq!(fragment, "Error Code ");
            }
            other => panic!("expected MissingEngineFragment, got {other:?}"),
        }
        assert!(err.to_string().contains("TensorRT framework"));
    }

    #[test]
    fn verify_fragment_order_within_group_is_irrelevant() {
        let message = format!(
            "version 1 is at UNAVAILABLE state: load failed for model 'm': \
             {}Internal Error (x) Error Code 4",
            BACKEND_ERROR_MARKER
        );
        verify_layered_error(&message).expect("verification failed");
    }

    #[test]
    fn autocomplete_marker_detected() {
        let message = "failed to load 'invalid_plan_file': \
             Internal: unable to load plan file to auto complete config: \
             /models/invalid_plan_file/1/model.plan";
        verify_autocomplete_error(message).expect("verification failed");

        let err = verify_autocomplete_error("some unrelated failure").unwrap_err();
        assert!(matches!(err, VerifyError::MissingAutocompleteMarker { .. }));
    }
}
