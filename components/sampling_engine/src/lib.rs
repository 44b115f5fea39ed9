//! Profiling engine collaborator
//!
//! The embedded script engine owns the actual sampling machinery: background
//! stack walking for the CPU profiler and allocation interception for the
//! sampling heap profiler. This crate describes the slice of that engine the
//! samplers drive, as a set of traits, so the samplers can run against any
//! engine binding.
//!
//! # Architecture
//!
//! - [`ProfilingEngine`]: capability probes, CPU session factory and the
//!   session-less heap sampler
//! - [`CpuProfilingSession`]: one CPU profiler instance; must be disposed
//! - [`CpuProfile`]: a finished CPU profile; must be deleted
//! - [`AllocationProfile`]: a heap-sampling snapshot; released when dropped
//! - [`CallTreeNode`], [`CpuProfileNode`], [`AllocationNode`]: node accessors
//!
//! For testing, [`MockEngine`] implements all of the above in memory.

mod mock_engine;

pub use mock_engine::{
    MockAllocationProfile, MockCounters, MockCpuOutcome, MockCpuProfile, MockCpuSession, MockEngine,
    MockNode,
};

/// One coalesced allocation bucket observed at a call-tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Size of each sampled object in bytes
    pub size: u64,
    /// Number of sampled objects of that size
    pub count: u32,
}

/// Accessors shared by every engine call-tree node
pub trait CallTreeNode {
    /// Function name, e.g. "(root)", "(program)" or "" for anonymous functions
    fn function_name(&self) -> &str;

    /// Script or resource name the frame belongs to
    fn script_resource_name(&self) -> &str;

    /// Line number, or the engine's "no line info" sentinel
    fn line_number(&self) -> i32;

    /// Column number, or the engine's "no column info" sentinel
    fn column_number(&self) -> i32;

    /// Number of direct children
    fn children_count(&self) -> usize;

    /// Child at `index`, `None` when out of range
    fn child(&self, index: usize) -> Option<&Self>;
}

/// A node of a CPU profile's top-down call tree
pub trait CpuProfileNode: CallTreeNode {
    /// Samples attributed to exactly this node
    fn hit_count(&self) -> u32;
}

/// A node of a sampling heap profile's call tree
pub trait AllocationNode: CallTreeNode {
    /// Allocation buckets attributed to exactly this node
    fn allocations(&self) -> &[Allocation];
}

/// A finished CPU profile handed back by the engine
pub trait CpuProfile {
    /// Node type of the call tree
    type Node: CpuProfileNode;

    /// Root of the top-down call tree, if the profile has one
    fn top_down_root(&self) -> Option<&Self::Node>;

    /// Release the profile inside the engine
    fn delete(self);
}

/// A CPU profiler instance
pub trait CpuProfilingSession: Send {
    /// Profile type returned by [`CpuProfilingSession::stop_profiling`]
    type Profile: CpuProfile;

    /// Set the sampling interval in microseconds; applies to the next start
    fn set_sampling_interval(&mut self, micros: u32);

    /// Begin profiling under `title`
    fn start_profiling(&mut self, title: &str);

    /// Finish profiling `title` and return the collected profile
    fn stop_profiling(&mut self, title: &str) -> Option<Self::Profile>;

    /// Release the profiler instance inside the engine
    fn dispose(self);
}

/// A heap-sampling snapshot. Dropping it releases it.
pub trait AllocationProfile {
    /// Node type of the call tree
    type Node: AllocationNode;

    /// Root of the allocation call tree
    fn root(&self) -> &Self::Node;
}

/// The embedded engine's profiling facilities
pub trait ProfilingEngine: Send + Sync {
    /// CPU profiler instance type
    type CpuSession: CpuProfilingSession;
    /// Heap-sampling snapshot type
    type AllocationProfile: AllocationProfile;

    /// Whether the engine exposes a CPU profiler at all
    fn has_cpu_profiler(&self) -> bool;

    /// Whether the engine supports sampling heap profiling
    fn has_sampling_heap_profiler(&self) -> bool;

    /// Acquire a new CPU profiler instance
    fn new_cpu_session(&self) -> Self::CpuSession;

    /// Start the engine-wide sampling heap profiler
    ///
    /// `sample_interval` is the average number of bytes between samples,
    /// `stack_depth` the maximum number of frames recorded per sample.
    fn start_sampling_heap_profiler(&self, sample_interval: u64, stack_depth: usize);

    /// Stop the engine-wide sampling heap profiler
    fn stop_sampling_heap_profiler(&self);

    /// Snapshot of the allocations sampled so far, if any
    fn allocation_profile(&self) -> Option<Self::AllocationProfile>;
}
