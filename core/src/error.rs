//! Error types for the lessons API client.
//!
//! # Design
//! Every failure reported by the server or the transport collapses into
//! `GatewayError::Remote`, whose message is `Server error (<status>): <body>`.
//! Callers that need to branch can still read the status code. Transport
//! failures with no HTTP response carry status `0`.

use thiserror::Error;

/// Errors returned by `LessonClient` and `LessonGateway`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Non-2xx response or transport failure.
    #[error("Server error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// A 2xx response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Encode(String),
}

impl GatewayError {
    /// HTTP status of a remote failure, `None` for local encode/decode errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The transport could not complete the exchange at all.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);
