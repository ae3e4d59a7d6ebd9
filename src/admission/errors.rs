// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Admission error types.

use thiserror::Error;

/// Result type for admission operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// AdmissionError represents everything that can go wrong while mutating an object.
///
/// None of these are retried here. The transport layer fails the admission
/// request so that an unnormalized object is never persisted silently.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// A zone annotation contains a token that is neither an ordinal nor region-qualified.
    #[error("malformed zone token \"{token}\" in \"{value}\"")]
    MalformedToken { token: String, value: String },

    /// The codec has no typed representation for this kind.
    #[error("unsupported kind \"{0}\"")]
    UnsupportedKind(String),

    /// A mutation rule found an invalid combination of fields.
    #[error("mutation failed: {0}")]
    Mutation(String),

    /// BadRequest indicates an object that does not match its declared kind.
    #[error("{0}")]
    BadRequest(String),

    /// The object could not be decoded or encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request was cancelled before all mutators ran.
    #[error("admission cancelled")]
    Cancelled,

    /// Startup configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AdmissionError {
    /// Create a new MalformedToken error.
    pub fn malformed_token(token: impl Into<String>, value: impl Into<String>) -> Self {
        AdmissionError::MalformedToken {
            token: token.into(),
            value: value.into(),
        }
    }

    /// Create a new Mutation error.
    pub fn mutation(msg: impl Into<String>) -> Self {
        AdmissionError::Mutation(msg.into())
    }

    /// Create a new BadRequest error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AdmissionError::BadRequest(msg.into())
    }

    /// Create a new Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        AdmissionError::Config(msg.into())
    }

    /// Build the error for an object whose concrete type does not match `expected`.
    pub fn unexpected_type(expected: &str, got: &str) -> Self {
        AdmissionError::BadRequest(format!("expected {} but got {}", expected, got))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_token_display() {
        let err = AdmissionError::malformed_token("bad token", "2,,bad token");
        assert_eq!(
            err.to_string(),
            "malformed zone token \"bad token\" in \"2,,bad token\""
        );
    }

    #[test]
    fn test_unexpected_type_display() {
        let err = AdmissionError::unexpected_type("Shoot", "Namespace");
        assert!(matches!(err, AdmissionError::BadRequest(_)));
        assert_eq!(err.to_string(), "expected Shoot but got Namespace");
    }

    #[test]
    fn test_serialization_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AdmissionError = json_err.into();
        assert!(err.to_string().starts_with("serialization error:"));
    }
}
