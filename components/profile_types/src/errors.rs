// Host call error types
// JSON-RPC 2.0 style error codes for the bridge's call surface

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Call error following the JSON-RPC 2.0 error specification
///
/// Only the host call surface produces these. The samplers themselves never
/// fail: an absent profile is reported as a `null` result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallError {
    /// Error code (JSON-RPC standard codes)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Additional error data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Call error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for CallError {}

impl CallError {
    /// Create a new call error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create error with additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error (-32700)
    /// Invalid JSON was received
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Invalid request (-32600)
    /// The JSON sent is not a valid request object
    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request")
    }

    /// Method not found (-32601)
    /// The method does not exist or its domain is not registered
    pub fn method_not_found(method: impl Into<String>) -> Self {
        let method = method.into();
        Self::with_data(
            -32601,
            "Method not found",
            serde_json::json!({ "method": method }),
        )
    }

    /// Invalid params (-32602)
    pub fn invalid_params(details: impl Into<String>) -> Self {
        let details = details.into();
        Self::with_data(
            -32602,
            "Invalid params",
            serde_json::json!({ "details": details }),
        )
    }

    /// Internal error (-32603)
    pub fn internal_error(details: impl Into<String>) -> Self {
        let details = details.into();
        Self::with_data(
            -32603,
            "Internal error",
            serde_json::json!({ "details": details }),
        )
    }
}

/// Bridge-side protocol errors, converted to a `CallError` at the boundary
#[derive(Error, Debug)]
pub enum BridgeProtocolError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// No domain is registered for the called method
    #[error("Unknown domain in method: {0}")]
    UnknownDomain(String),

    /// Parameters could not be decoded
    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl From<BridgeProtocolError> for CallError {
    fn from(error: BridgeProtocolError) -> Self {
        match error {
            BridgeProtocolError::SerializationError(e) => {
                CallError::internal_error(format!("Failed to serialize result: {}", e))
            }
            BridgeProtocolError::UnknownDomain(method) => CallError::method_not_found(method),
            BridgeProtocolError::InvalidParams(details) => CallError::invalid_params(details),
        }
    }
}
