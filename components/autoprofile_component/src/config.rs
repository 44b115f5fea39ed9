//! Configuration for the auto-profiler component

use serde::{Deserialize, Serialize};

use crate::{AutoProfilerError, Result};
use sampler_domains::DEFAULT_SAMPLING_INTERVAL_MICROS;

/// Configuration for the auto-profiler component
///
/// Controls which samplers are exposed to the host and the CPU sampler's
/// default interval. Missing fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoProfilerConfig {
    /// Do not expose the CPU sampler
    cpu_profiler_disabled: bool,

    /// Do not expose the allocation sampler
    allocation_profiler_disabled: bool,

    /// Interval used when `CpuSampler.start` carries none, in microseconds
    cpu_sampling_interval_micros: u32,
}

impl AutoProfilerConfig {
    /// Create a new builder for AutoProfilerConfig
    ///
    /// # Example
    ///
    /// ```
    /// use autoprofile_component::AutoProfilerConfig;
    ///
    /// let config = AutoProfilerConfig::builder()
    ///     .allocation_profiler_disabled(true)
    ///     .build();
    /// assert!(config.allocation_profiler_disabled());
    /// ```
    pub fn builder() -> AutoProfilerConfigBuilder {
        AutoProfilerConfigBuilder::default()
    }

    pub fn cpu_profiler_disabled(&self) -> bool {
        self.cpu_profiler_disabled
    }

    pub fn allocation_profiler_disabled(&self) -> bool {
        self.allocation_profiler_disabled
    }

    pub fn cpu_sampling_interval_micros(&self) -> u32 {
        self.cpu_sampling_interval_micros
    }

    /// Check the configuration before it is applied
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the CPU sampling interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.cpu_sampling_interval_micros == 0 {
            return Err(AutoProfilerError::InvalidConfiguration(
                "cpu_sampling_interval_micros must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AutoProfilerConfig {
    /// Create a default configuration
    ///
    /// Default values:
    /// - cpu_profiler_disabled: false
    /// - allocation_profiler_disabled: false
    /// - cpu_sampling_interval_micros: 10 000
    fn default() -> Self {
        Self {
            cpu_profiler_disabled: false,
            allocation_profiler_disabled: false,
            cpu_sampling_interval_micros: DEFAULT_SAMPLING_INTERVAL_MICROS,
        }
    }
}

/// Builder for AutoProfilerConfig
#[derive(Debug, Clone, Default)]
pub struct AutoProfilerConfigBuilder {
    cpu_profiler_disabled: Option<bool>,
    allocation_profiler_disabled: Option<bool>,
    cpu_sampling_interval_micros: Option<u32>,
}

impl AutoProfilerConfigBuilder {
    /// Disable or enable the CPU sampler
    pub fn cpu_profiler_disabled(mut self, disabled: bool) -> Self {
        self.cpu_profiler_disabled = Some(disabled);
        self
    }

    /// Disable or enable the allocation sampler
    pub fn allocation_profiler_disabled(mut self, disabled: bool) -> Self {
        self.allocation_profiler_disabled = Some(disabled);
        self
    }

    /// Set the CPU sampler's default interval
    ///
    /// # Arguments
    ///
    /// * `micros` - Interval in microseconds, must be non-zero
    pub fn cpu_sampling_interval_micros(mut self, micros: u32) -> Self {
        self.cpu_sampling_interval_micros = Some(micros);
        self
    }

    /// Build the AutoProfilerConfig
    ///
    /// Uses default values for any options not explicitly set. Validation
    /// happens when the config is applied.
    pub fn build(self) -> AutoProfilerConfig {
        let default = AutoProfilerConfig::default();

        AutoProfilerConfig {
            cpu_profiler_disabled: self
                .cpu_profiler_disabled
                .unwrap_or(default.cpu_profiler_disabled),
            allocation_profiler_disabled: self
                .allocation_profiler_disabled
                .unwrap_or(default.allocation_profiler_disabled),
            cpu_sampling_interval_micros: self
                .cpu_sampling_interval_micros
                .unwrap_or(default.cpu_sampling_interval_micros),
        }
    }
}
