//! Auto-profiler orchestration
//!
//! This module provides the AutoProfilerComponent that builds the CPU and
//! allocation samplers on one profiling engine and exposes them to the host
//! through a [`HostBridge`](host_bridge::HostBridge).
//!
//! # Example
//!
//! ```
//! use autoprofile_component::{AutoProfilerComponent, AutoProfilerConfig};
//! use sampling_engine::MockEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AutoProfilerConfig::builder()
//!         .cpu_sampling_interval_micros(1_000)
//!         .build();
//!
//!     let component = AutoProfilerComponent::new(Arc::new(MockEngine::new()), config)?;
//!     let response = component
//!         .handle_message(r#"{"id": 1, "method": "CpuSampler.checkAvailability"}"#)
//!         .await;
//!     assert!(response.contains("\"available\":true"));
//!     Ok(())
//! }
//! ```

mod component;
mod config;
mod error;

pub use component::AutoProfilerComponent;
pub use config::{AutoProfilerConfig, AutoProfilerConfigBuilder};
pub use error::{AutoProfilerError, Result};
