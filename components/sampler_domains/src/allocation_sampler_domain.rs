//! AllocationSamplerDomain implementation
//!
//! Exposes an [`AllocationSampler`] to the host as the "AllocationSampler" domain.

use async_trait::async_trait;
use host_bridge::DomainHandler;
use profile_types::{BridgeProtocolError, CallError};
use sampling_engine::ProfilingEngine;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::allocation_sampler::AllocationSampler;

/// AllocationSamplerDomain routes host calls to a shared [`AllocationSampler`]
pub struct AllocationSamplerDomain<E: ProfilingEngine> {
    sampler: Arc<AllocationSampler<E>>,
}

impl<E: ProfilingEngine> AllocationSamplerDomain<E> {
    pub fn new(sampler: Arc<AllocationSampler<E>>) -> Self {
        Self { sampler }
    }

    pub fn sampler(&self) -> &Arc<AllocationSampler<E>> {
        &self.sampler
    }

    fn handle_check_availability(&self) -> Result<Value, CallError> {
        debug!("AllocationSampler.checkAvailability called");
        Ok(json!({ "available": self.sampler.check_availability() }))
    }

    fn handle_start(&self) -> Result<Value, CallError> {
        debug!("AllocationSampler.start called");
        self.sampler.start();
        Ok(json!({}))
    }

    fn handle_stop(&self) -> Result<Value, CallError> {
        debug!("AllocationSampler.stop called");
        self.sampler.stop();
        Ok(json!({}))
    }

    fn handle_read(&self) -> Result<Value, CallError> {
        debug!("AllocationSampler.read called");

        let profile = self.sampler.read();
        let profile = serde_json::to_value(&profile).map_err(BridgeProtocolError::from)?;
        Ok(json!({ "profile": profile }))
    }
}

#[async_trait]
impl<E> DomainHandler for AllocationSamplerDomain<E>
where
    E: ProfilingEngine + 'static,
{
    fn name(&self) -> &str {
        "AllocationSampler"
    }

    async fn handle_method(&self, method: &str, _params: Option<Value>) -> Result<Value, CallError> {
        debug!("AllocationSampler domain handling method: {}", method);

        match method {
            "checkAvailability" => self.handle_check_availability(),
            "start" => self.handle_start(),
            "stop" => self.handle_stop(),
            "read" => self.handle_read(),
            _ => {
                warn!("Unknown AllocationSampler method: {}", method);
                Err(CallError::method_not_found(format!(
                    "AllocationSampler.{}",
                    method
                )))
            }
        }
    }
}
