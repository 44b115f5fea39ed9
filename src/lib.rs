//! Native bridge to an embedded script engine's CPU and allocation samplers
//!
//! The host starts an [`AutoProfiler`], then drives the `CpuSampler` and
//! `AllocationSampler` domains with JSON messages. Finished profiles come back
//! as [`ProfileNode`] trees.
//!
//! Engine bindings implement [`ProfilingEngine`]; [`MockEngine`] is an
//! in-memory implementation for tests and demos.

pub use autoprofile_api::{
    AutoProfiler, AutoProfilerConfig, AutoProfilerConfigBuilder, AutoProfilerError, Result,
};
pub use profile_types::{
    AllocationProfileNode, AllocationStats, CpuProfileNode, CpuStats, ProfileNode,
};
pub use sampling_engine::{MockEngine, ProfilingEngine};
