//! Host call routing and domain registry
//!
//! The hosting application talks to the bridge with small JSON requests of the
//! form `{"id": 1, "method": "Domain.method", "params": {...}}`. This module
//! routes each request to the registered domain handler and serializes the
//! handler's answer back into a response.

use async_trait::async_trait;
use dashmap::DashMap;
use profile_types::{BridgeProtocolError, CallError, HostRequest, HostResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Trait that all domain handlers must implement
///
/// Each handler owns one method namespace (e.g. "CpuSampler") and processes
/// the methods within it.
#[async_trait]
pub trait DomainHandler: Send + Sync {
    /// Returns the name of this domain (e.g., "CpuSampler")
    fn name(&self) -> &str;

    /// Handle a method call for this domain
    ///
    /// # Arguments
    /// * `method` - The method name without domain prefix, e.g. "start"
    /// * `params` - Optional parameters for the method
    async fn handle_method(&self, method: &str, params: Option<Value>) -> Result<Value, CallError>;
}

/// Routes host requests to the appropriate domain handler
pub struct HostBridge {
    /// Registry of domain handlers, keyed by domain name
    domains: Arc<DashMap<String, Arc<dyn DomainHandler>>>,
}

impl HostBridge {
    /// Create a bridge with no domains registered
    ///
    /// # Example
    /// ```
    /// use host_bridge::HostBridge;
    ///
    /// let bridge = HostBridge::new();
    /// assert!(bridge.registered_domains().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            domains: Arc::new(DashMap::new()),
        }
    }

    /// Register a domain handler, replacing any handler with the same name
    pub fn register_domain(&self, handler: Arc<dyn DomainHandler>) {
        let name = handler.name().to_string();
        debug!("Registering domain handler: {}", name);
        self.domains.insert(name, handler);
    }

    /// Unregister a domain handler
    ///
    /// # Returns
    /// The removed handler, if it existed
    pub fn unregister_domain(&self, domain_name: &str) -> Option<Arc<dyn DomainHandler>> {
        debug!("Unregistering domain handler: {}", domain_name);
        self.domains.remove(domain_name).map(|(_, v)| v)
    }

    /// Whether a handler is registered under `domain_name`
    pub fn has_domain(&self, domain_name: &str) -> bool {
        self.domains.contains_key(domain_name)
    }

    /// Names of all registered domains, sorted
    pub fn registered_domains(&self) -> Vec<String> {
        let mut names: Vec<String> = self.domains.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Handle an incoming host message
    ///
    /// Parses the message, routes it to the appropriate domain handler and
    /// returns a JSON-formatted response. Never fails: every problem is
    /// reported as an error response.
    ///
    /// # Example
    /// ```ignore
    /// let response = bridge.handle_message(r#"{"id": 1, "method": "CpuSampler.start"}"#).await;
    /// ```
    pub async fn handle_message(&self, message: &str) -> String {
        let request = match self.parse_request(message) {
            Ok(req) => req,
            Err(error) => {
                return self.create_error_response(None, error);
            }
        };

        let request_id = request.id;

        match self.route_request(&request).await {
            Ok(result) => self.create_success_response(request_id, result),
            Err(error) => self.create_error_response(Some(request_id), error),
        }
    }

    /// Parse a JSON string into a host request
    fn parse_request(&self, message: &str) -> Result<HostRequest, CallError> {
        // Distinguish malformed JSON from well-formed JSON of the wrong shape
        let _json_check: Value = serde_json::from_str(message).map_err(|e| {
            error!("Invalid JSON: {}", e);
            CallError::parse_error()
        })?;

        serde_json::from_str::<HostRequest>(message).map_err(|e| {
            error!("Invalid request structure: {}", e);
            CallError::invalid_request()
        })
    }

    async fn route_request(&self, request: &HostRequest) -> Result<Value, CallError> {
        if request.method.is_empty() {
            warn!("Request missing method field");
            return Err(CallError::invalid_request());
        }

        let (domain_name, method_name) = self.parse_method(&request.method)?;

        debug!(
            "Routing request {} to domain: {}, method: {}",
            request.id, domain_name, method_name
        );

        let handler = self
            .domains
            .get(domain_name)
            .ok_or_else(|| {
                warn!("Domain not found: {}", domain_name);
                BridgeProtocolError::UnknownDomain(request.method.clone())
            })?
            .clone();

        handler
            .handle_method(method_name, request.params.clone())
            .await
    }

    /// Split "Domain.method" into its two halves
    fn parse_method<'a>(&self, method: &'a str) -> Result<(&'a str, &'a str), CallError> {
        match method.split_once('.') {
            Some((domain, name)) if !domain.is_empty() && !name.is_empty() => Ok((domain, name)),
            _ => {
                warn!("Invalid method format (expected Domain.method): {}", method);
                Err(CallError::invalid_request())
            }
        }
    }

    fn create_success_response(&self, id: u64, result: Value) -> String {
        let response = HostResponse {
            id,
            result: Some(result),
            error: None,
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!("Failed to serialize response: {}", e);
            self.create_error_response(
                Some(id),
                CallError::internal_error("Failed to serialize response"),
            )
        })
    }

    fn create_error_response(&self, id: Option<u64>, error: CallError) -> String {
        let response = HostResponse {
            id: id.unwrap_or(0),
            result: None,
            error: Some(error),
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!("Failed to serialize error response: {}", e);
            format!(
                r#"{{"id":{},"error":{{"code":-32603,"message":"Internal error"}}}}"#,
                id.unwrap_or(0)
            )
        })
    }
}

impl Default for HostBridge {
    fn default() -> Self {
        Self::new()
    }
}
