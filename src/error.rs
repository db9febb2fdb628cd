// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type for the fallible internals of the crate.
//!
//! None of these errors escape a logging call. They travel between the
//! structural serializer and its callers, which recover by switching to the
//! inspection renderer, and out of the few conversion helpers that are
//! fallible by nature.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopelogError {
    #[error("converting circular structure to JSON (at key `{0}`)")]
    Circular(String),

    #[error("getter for `{key}` failed: {reason}")]
    Getter { key: String, reason: String },

    #[error("unknown severity `{0}`")]
    UnknownSeverity(String),

    #[error("value could not be converted: {0}")]
    Conversion(String),
}

impl From<serde_json::Error> for ScopelogError {
    fn from(e: serde_json::Error) -> Self {
        ScopelogError::Conversion(e.to_string())
    }
}
