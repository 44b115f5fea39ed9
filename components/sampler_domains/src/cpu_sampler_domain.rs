//! CpuSamplerDomain implementation
//!
//! Exposes a [`CpuSampler`] to the host as the "CpuSampler" domain.

use async_trait::async_trait;
use host_bridge::DomainHandler;
use profile_types::{BridgeProtocolError, CallError};
use sampling_engine::ProfilingEngine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cpu_sampler::CpuSampler;

/// Parameters for `CpuSampler.start`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartParams {
    /// Sampling interval in microseconds
    sampling_interval: Option<u32>,
}

/// CpuSamplerDomain routes host calls to a shared [`CpuSampler`]
pub struct CpuSamplerDomain<E: ProfilingEngine> {
    sampler: Arc<CpuSampler<E>>,
}

impl<E: ProfilingEngine> CpuSamplerDomain<E> {
    /// Create a new CpuSamplerDomain over `sampler`
    pub fn new(sampler: Arc<CpuSampler<E>>) -> Self {
        Self { sampler }
    }

    /// The sampler this domain drives
    pub fn sampler(&self) -> &Arc<CpuSampler<E>> {
        &self.sampler
    }

    fn handle_check_availability(&self) -> Result<Value, CallError> {
        debug!("CpuSampler.checkAvailability called");
        Ok(json!({ "available": self.sampler.check_availability() }))
    }

    fn handle_start(&self, params: Option<Value>) -> Result<Value, CallError> {
        debug!("CpuSampler.start called");

        let params = match params {
            Some(Value::Null) | None => StartParams::default(),
            Some(params) => serde_json::from_value::<StartParams>(params).map_err(|e| {
                warn!("Rejected CpuSampler.start params: {}", e);
                BridgeProtocolError::InvalidParams(format!("samplingInterval: {}", e))
            })?,
        };

        self.sampler.start(params.sampling_interval);
        Ok(json!({}))
    }

    fn handle_stop(&self) -> Result<Value, CallError> {
        debug!("CpuSampler.stop called");

        let profile = self.sampler.stop();
        let profile = serde_json::to_value(&profile).map_err(BridgeProtocolError::from)?;
        Ok(json!({ "profile": profile }))
    }
}

#[async_trait]
impl<E> DomainHandler for CpuSamplerDomain<E>
where
    E: ProfilingEngine + 'static,
{
    fn name(&self) -> &str {
        "CpuSampler"
    }

    async fn handle_method(&self, method: &str, params: Option<Value>) -> Result<Value, CallError> {
        debug!("CpuSampler domain handling method: {}", method);

        match method {
            "checkAvailability" => self.handle_check_availability(),
            "start" => self.handle_start(params),
            "stop" => self.handle_stop(),
            _ => {
                warn!("Unknown CpuSampler method: {}", method);
                Err(CallError::method_not_found(format!("CpuSampler.{}", method)))
            }
        }
    }
}
