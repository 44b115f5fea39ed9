//! Public API for the autoprofile native bridge
//!
//! This module provides a small, ergonomic API for embedding the CPU and
//! allocation samplers into a host application. It wraps the lower-level
//! `autoprofile_component` with a start/destroy lifecycle.
//!
//! # Example
//!
//! ```
//! use autoprofile_api::{AutoProfiler, AutoProfilerConfig};
//! use sampling_engine::MockEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let profiler = AutoProfiler::new(Arc::new(MockEngine::new()), AutoProfilerConfig::default())?;
//!
//!     profiler.start().await?;
//!     profiler
//!         .handle_message(r#"{"id": 1, "method": "CpuSampler.start"}"#)
//!         .await?;
//!
//!     // ... host runs ...
//!
//!     let response = profiler
//!         .handle_message(r#"{"id": 2, "method": "CpuSampler.stop"}"#)
//!         .await?;
//!     assert!(response.contains("\"profile\""));
//!
//!     profiler.destroy().await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

use sampling_engine::ProfilingEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

// Re-export public types from autoprofile_component
pub use autoprofile_component::{
    AutoProfilerConfig, AutoProfilerConfigBuilder, AutoProfilerError, Result,
};

use autoprofile_component::AutoProfilerComponent;

/// Main auto-profiler public API
///
/// The samplers only become reachable once the profiler is started. A
/// destroyed profiler stays destroyed. Dropping a started profiler destroys it.
pub struct AutoProfiler<E: ProfilingEngine + 'static> {
    engine: Arc<E>,
    config: AutoProfilerConfig,
    component: RwLock<Option<AutoProfilerComponent<E>>>,
    destroyed: AtomicBool,
}

impl<E: ProfilingEngine + 'static> AutoProfiler<E> {
    /// Create a new, not yet started profiler on `engine`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` does not validate.
    ///
    /// # Example
    ///
    /// ```
    /// use autoprofile_api::{AutoProfiler, AutoProfilerConfig};
    /// use sampling_engine::MockEngine;
    /// use std::sync::Arc;
    ///
    /// let profiler = AutoProfiler::new(Arc::new(MockEngine::new()), AutoProfilerConfig::default());
    /// assert!(profiler.is_ok());
    /// ```
    pub fn new(engine: Arc<E>, config: AutoProfilerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            engine,
            config,
            component: RwLock::new(None),
            destroyed: AtomicBool::new(false),
        })
    }

    /// Get the configuration the profiler was created with
    pub fn config(&self) -> &AutoProfilerConfig {
        &self.config
    }

    /// Start the profiler. Starting a started profiler does nothing.
    ///
    /// # Errors
    ///
    /// Returns `ProfilerDestroyed` once [`AutoProfiler::destroy`] has run.
    pub async fn start(&self) -> Result<()> {
        let mut component_lock = self.component.write().await;

        if self.destroyed.load(Ordering::SeqCst) {
            info!("Destroyed profiler cannot be started");
            return Err(AutoProfilerError::ProfilerDestroyed);
        }

        if component_lock.is_some() {
            debug!("Profiler already started");
            return Ok(());
        }

        let component = AutoProfilerComponent::new(Arc::clone(&self.engine), self.config.clone())?;
        *component_lock = Some(component);

        info!("Profiler started");
        Ok(())
    }

    /// Destroy the profiler, stopping any running sampler.
    ///
    /// Only a started profiler can be destroyed; other calls are ignored.
    pub async fn destroy(&self) {
        let mut component_lock = self.component.write().await;

        match component_lock.take() {
            Some(component) => {
                component.shutdown();
                self.destroyed.store(true, Ordering::SeqCst);
                info!("Profiler destroyed");
            }
            None if !self.destroyed.load(Ordering::SeqCst) => {
                info!("Profiler has not been started");
            }
            None => {}
        }
    }

    /// Whether the profiler is started and not destroyed
    pub async fn is_started(&self) -> bool {
        self.component.read().await.is_some()
    }

    /// Whether [`AutoProfiler::destroy`] has run on a started profiler
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Domains the host can currently call, sorted; empty unless started
    pub async fn registered_domains(&self) -> Vec<String> {
        match self.component.read().await.as_ref() {
            Some(component) => component.registered_domains(),
            None => Vec::new(),
        }
    }

    /// Route one host message and return the serialized response
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` before [`AutoProfiler::start`] and
    /// `ProfilerDestroyed` after [`AutoProfiler::destroy`].
    pub async fn handle_message(&self, message: &str) -> Result<String> {
        let component_lock = self.component.read().await;

        match component_lock.as_ref() {
            Some(component) => Ok(component.handle_message(message).await),
            None if self.destroyed.load(Ordering::SeqCst) => {
                Err(AutoProfilerError::ProfilerDestroyed)
            }
            None => Err(AutoProfilerError::NotStarted),
        }
    }
}

impl<E: ProfilingEngine + 'static> Drop for AutoProfiler<E> {
    fn drop(&mut self) {
        if let Some(component) = self.component.get_mut().take() {
            component.shutdown();
            debug!("Profiler destroyed on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_engine::MockEngine;

    fn profiler() -> (Arc<MockEngine>, AutoProfiler<MockEngine>) {
        let engine = Arc::new(MockEngine::new());
        let profiler =
            AutoProfiler::new(Arc::clone(&engine), AutoProfilerConfig::default()).unwrap();
        (engine, profiler)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AutoProfilerConfig::builder()
            .cpu_sampling_interval_micros(0)
            .build();

        let result = AutoProfiler::new(Arc::new(MockEngine::new()), config);
        assert!(matches!(
            result.err(),
            Some(AutoProfilerError::InvalidConfiguration(_))
        ));
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (_, profiler) = profiler();

        profiler.start().await.unwrap();
        profiler.start().await.unwrap();

        assert!(profiler.is_started().await);
        assert_eq!(
            profiler.registered_domains().await,
            vec!["AllocationSampler", "CpuSampler"]
        );
    }

    #[tokio::test]
    async fn test_handle_message_before_start() {
        let (_, profiler) = profiler();

        let result = profiler
            .handle_message(r#"{"id": 1, "method": "CpuSampler.start"}"#)
            .await;
        assert_eq!(result, Err(AutoProfilerError::NotStarted));
        assert!(profiler.registered_domains().await.is_empty());
    }

    #[tokio::test]
    async fn test_destroy_before_start_is_ignored() {
        let (_, profiler) = profiler();

        profiler.destroy().await;
        assert!(!profiler.is_destroyed());
        assert!(profiler.start().await.is_ok());
    }

    #[tokio::test]
    async fn test_destroyed_profiler_cannot_start() {
        let (_, profiler) = profiler();

        profiler.start().await.unwrap();
        profiler.destroy().await;
        profiler.destroy().await;

        assert!(profiler.is_destroyed());
        assert!(!profiler.is_started().await);
        assert_eq!(
            profiler.start().await,
            Err(AutoProfilerError::ProfilerDestroyed)
        );
    }

    #[tokio::test]
    async fn test_drop_stops_samplers() {
        let (engine, profiler) = profiler();

        profiler.start().await.unwrap();
        profiler
            .handle_message(r#"{"id": 1, "method": "AllocationSampler.start"}"#)
            .await
            .unwrap();
        assert!(engine.is_heap_sampling());

        drop(profiler);
        assert!(!engine.is_heap_sampling());
    }

    #[test]
    fn test_config_reexport() {
        let _builder: AutoProfilerConfigBuilder = AutoProfilerConfig::builder();
        let _result: Result<()> = Ok(());
    }
}
