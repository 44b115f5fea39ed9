// Routing tests for the host bridge

use async_trait::async_trait;
use host_bridge::{DomainHandler, HostBridge};
use profile_types::CallError;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Records every call it receives and echoes the params back
struct RecordingDomain {
    name: &'static str,
    calls: AtomicUsize,
}

impl RecordingDomain {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DomainHandler for RecordingDomain {
    fn name(&self) -> &str {
        self.name
    }

    async fn handle_method(&self, method: &str, params: Option<Value>) -> Result<Value, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match method {
            "echo" => Ok(params.unwrap_or(Value::Null)),
            "fail" => Err(CallError::invalid_params("always fails")),
            _ => Err(CallError::method_not_found(format!("{}.{}", self.name, method))),
        }
    }
}

async fn call(bridge: &HostBridge, request: Value) -> Value {
    let response = bridge.handle_message(&request.to_string()).await;
    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
async fn test_routes_by_domain_prefix() {
    let bridge = HostBridge::new();
    let first = Arc::new(RecordingDomain::new("First"));
    let second = Arc::new(RecordingDomain::new("Second"));
    bridge.register_domain(first.clone());
    bridge.register_domain(second.clone());

    let response = call(
        &bridge,
        json!({"id": 10, "method": "Second.echo", "params": {"x": 1}}),
    )
    .await;

    assert_eq!(response["id"], 10);
    assert_eq!(response["result"]["x"], 1);
    assert_eq!(first.calls.load(Ordering::SeqCst), 0);
    assert_eq!(second.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_null_result_is_serialized() {
    let bridge = HostBridge::new();
    bridge.register_domain(Arc::new(RecordingDomain::new("First")));

    let response = call(&bridge, json!({"id": 2, "method": "First.echo"})).await;

    assert_eq!(response["id"], 2);
    assert!(response.get("error").is_none());
    assert_eq!(response["result"], Value::Null);
}

#[tokio::test]
async fn test_handler_error_is_forwarded() {
    let bridge = HostBridge::new();
    bridge.register_domain(Arc::new(RecordingDomain::new("First")));

    let response = call(&bridge, json!({"id": 3, "method": "First.fail"})).await;

    assert_eq!(response["id"], 3);
    assert_eq!(response["error"]["code"], -32602);
    assert_eq!(response["error"]["data"]["details"], "always fails");
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_unknown_domain_is_method_not_found() {
    let bridge = HostBridge::new();

    let response = call(&bridge, json!({"id": 4, "method": "Missing.start"})).await;

    assert_eq!(response["error"]["code"], -32601);
    assert_eq!(response["error"]["data"]["method"], "Missing.start");
}

#[tokio::test]
async fn test_wrong_shape_is_invalid_request() {
    let bridge = HostBridge::new();

    let response = call(&bridge, json!({"method": "First.echo"})).await;
    assert_eq!(response["error"]["code"], -32600);

    let response = call(&bridge, json!({"id": 1, "method": "NoDot"})).await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["error"]["code"], -32600);
}

#[tokio::test]
async fn test_unregistered_domain_stops_routing() {
    let bridge = HostBridge::new();
    bridge.register_domain(Arc::new(RecordingDomain::new("First")));
    bridge.unregister_domain("First");

    let response = call(&bridge, json!({"id": 6, "method": "First.echo"})).await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_concurrent_calls() {
    let bridge = Arc::new(HostBridge::new());
    let domain = Arc::new(RecordingDomain::new("First"));
    bridge.register_domain(domain.clone());

    let mut handles = Vec::new();
    for id in 0..16u64 {
        let bridge = Arc::clone(&bridge);
        handles.push(tokio::spawn(async move {
            let request = json!({"id": id, "method": "First.echo", "params": {"id": id}});
            let response = bridge.handle_message(&request.to_string()).await;
            let response: Value = serde_json::from_str(&response).unwrap();
            assert_eq!(response["id"], id);
            assert_eq!(response["result"]["id"], id);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(domain.calls.load(Ordering::SeqCst), 16);
}
