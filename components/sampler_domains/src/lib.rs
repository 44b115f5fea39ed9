//! CPU and allocation samplers
//!
//! This module provides the two sampler controllers, the conversion of engine
//! call trees into portable [`ProfileNode`](profile_types::ProfileNode) trees,
//! and the domain handlers that expose both controllers on the host bridge.
//!
//! # Features
//!
//! - **CpuSampler**: start/stop the engine's CPU profiler, return the call tree
//! - **AllocationSampler**: start/stop/read the engine's sampling heap profiler
//! - **CpuSamplerDomain** / **AllocationSamplerDomain**: host-callable methods
//!
//! Both controllers tolerate repeated and out-of-order calls: a second start is
//! ignored, a stop or read while idle yields nothing.

mod allocation_sampler;
mod allocation_sampler_domain;
mod cpu_sampler;
mod cpu_sampler_domain;
mod tree;

pub use allocation_sampler::{AllocationSampler, SAMPLING_INTERVAL_BYTES};
pub use allocation_sampler_domain::AllocationSamplerDomain;
pub use cpu_sampler::{CpuSampler, CPU_PROFILE_TITLE, DEFAULT_SAMPLING_INTERVAL_MICROS};
pub use cpu_sampler_domain::CpuSamplerDomain;
pub use tree::{convert_allocation_tree, convert_cpu_tree, MAX_DEPTH};
