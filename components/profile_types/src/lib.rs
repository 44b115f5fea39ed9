// Portable profile tree types and host call envelope
//
// This module is part of the autoprofile native bridge.

pub mod errors;
pub mod profile;

// Re-export commonly used types
pub use errors::{BridgeProtocolError, CallError};
pub use profile::{
    AllocationProfileNode, AllocationStats, CpuProfileNode, CpuStats, ProfileNode,
};

use serde::{Deserialize, Serialize};

/// Host request message
/// Represents a call from the hosting application into the bridge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostRequest {
    /// Unique identifier for this request
    pub id: u64,
    /// Method name in format "Domain.method"
    pub method: String,
    /// Optional parameters for the method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// Host response message
/// Represents the bridge's answer to a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostResponse {
    /// Request ID this response corresponds to
    pub id: u64,
    /// Result of the method call (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (if method failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<errors::CallError>,
}
