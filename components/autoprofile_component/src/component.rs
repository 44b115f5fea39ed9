//! Main auto-profiler component implementation

use crate::{AutoProfilerConfig, Result};
use host_bridge::HostBridge;
use sampler_domains::{AllocationSampler, AllocationSamplerDomain, CpuSampler, CpuSamplerDomain};
use sampling_engine::ProfilingEngine;
use std::sync::Arc;
use tracing::{debug, info};

/// Auto-profiler component that wires both samplers to the host bridge
///
/// This component is responsible for:
/// - Building the CPU and allocation samplers on one shared engine
/// - Registering the domains of the enabled samplers
/// - Routing host messages to those domains
/// - Stopping any running sampler on shutdown
///
/// # Example
///
/// ```
/// use autoprofile_component::{AutoProfilerComponent, AutoProfilerConfig};
/// use sampling_engine::MockEngine;
/// use std::sync::Arc;
///
/// let engine = Arc::new(MockEngine::new());
/// let component = AutoProfilerComponent::new(engine, AutoProfilerConfig::default()).unwrap();
/// assert_eq!(component.registered_domains(), vec!["AllocationSampler", "CpuSampler"]);
/// ```
pub struct AutoProfilerComponent<E: ProfilingEngine + 'static> {
    /// Configuration for this component
    config: AutoProfilerConfig,

    /// Routes host messages to the sampler domains
    bridge: Arc<HostBridge>,

    cpu_sampler: Arc<CpuSampler<E>>,

    allocation_sampler: Arc<AllocationSampler<E>>,
}

impl<E: ProfilingEngine + 'static> AutoProfilerComponent<E> {
    /// Create a new component on `engine`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` does not validate.
    pub fn new(engine: Arc<E>, config: AutoProfilerConfig) -> Result<Self> {
        debug!("Creating AutoProfilerComponent with config: {:?}", config);
        config.validate()?;

        let cpu_sampler = Arc::new(CpuSampler::with_default_interval(
            Arc::clone(&engine),
            config.cpu_sampling_interval_micros(),
        ));
        let allocation_sampler = Arc::new(AllocationSampler::new(engine));

        let bridge = Arc::new(HostBridge::new());
        Self::register_domains(&bridge, &config, &cpu_sampler, &allocation_sampler);

        Ok(Self {
            config,
            bridge,
            cpu_sampler,
            allocation_sampler,
        })
    }

    /// Register the domain of every sampler the configuration leaves enabled
    fn register_domains(
        bridge: &HostBridge,
        config: &AutoProfilerConfig,
        cpu_sampler: &Arc<CpuSampler<E>>,
        allocation_sampler: &Arc<AllocationSampler<E>>,
    ) {
        if config.cpu_profiler_disabled() {
            info!("CPU profiler disabled.");
        } else {
            bridge.register_domain(Arc::new(CpuSamplerDomain::new(Arc::clone(cpu_sampler))));
        }

        if config.allocation_profiler_disabled() {
            info!("Allocation profiler disabled.");
        } else {
            bridge.register_domain(Arc::new(AllocationSamplerDomain::new(Arc::clone(
                allocation_sampler,
            ))));
        }

        info!(
            "Registered {} sampler domain handlers",
            bridge.registered_domains().len()
        );
    }

    /// Get the component configuration
    pub fn config(&self) -> &AutoProfilerConfig {
        &self.config
    }

    /// Names of the domains reachable from the host, sorted
    pub fn registered_domains(&self) -> Vec<String> {
        self.bridge.registered_domains()
    }

    /// The CPU sampler, reachable directly even when its domain is disabled
    pub fn cpu_sampler(&self) -> &Arc<CpuSampler<E>> {
        &self.cpu_sampler
    }

    /// The allocation sampler, reachable directly even when its domain is disabled
    pub fn allocation_sampler(&self) -> &Arc<AllocationSampler<E>> {
        &self.allocation_sampler
    }

    /// Route one host message and return the serialized response
    pub async fn handle_message(&self, message: &str) -> String {
        self.bridge.handle_message(message).await
    }

    /// Stop every running sampler. A pending CPU profile is discarded.
    pub fn shutdown(&self) {
        if self.cpu_sampler.is_sampling() {
            debug!("Discarding CPU profile on shutdown");
            self.cpu_sampler.stop();
        }
        self.allocation_sampler.stop();
        info!("AutoProfilerComponent shut down");
    }
}
