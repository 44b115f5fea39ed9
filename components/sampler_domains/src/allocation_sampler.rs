//! Allocation sampler controller
//!
//! Runs the engine's sampling heap profiler and snapshots the allocation call
//! tree on demand.

use parking_lot::Mutex;
use profile_types::AllocationProfileNode;
use sampling_engine::{AllocationProfile, ProfilingEngine};
use std::sync::Arc;
use tracing::{debug, info};

use crate::tree::{convert_allocation_tree, MAX_DEPTH};

/// Average number of bytes between two sampled allocations
pub const SAMPLING_INTERVAL_BYTES: u64 = 1 << 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AllocationSamplerState {
    Idle,
    Sampling,
}

/// Allocation sampler state and functionality
pub struct AllocationSampler<E: ProfilingEngine> {
    engine: Arc<E>,
    state: Mutex<AllocationSamplerState>,
}

impl<E: ProfilingEngine> AllocationSampler<E> {
    /// Create an idle sampler on `engine`
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            state: Mutex::new(AllocationSamplerState::Idle),
        }
    }

    /// Whether the engine supports sampling heap profiling
    pub fn check_availability(&self) -> bool {
        self.engine.has_sampling_heap_profiler()
    }

    pub fn is_sampling(&self) -> bool {
        *self.state.lock() == AllocationSamplerState::Sampling
    }

    /// Start the heap sampler; ignored while already sampling
    pub fn start(&self) {
        let mut state = self.state.lock();
        if *state == AllocationSamplerState::Sampling {
            debug!("Allocation sampler already running, start ignored");
            return;
        }

        self.engine
            .start_sampling_heap_profiler(SAMPLING_INTERVAL_BYTES, MAX_DEPTH);
        *state = AllocationSamplerState::Sampling;
        info!("Allocation sampler started");
    }

    /// Stop the heap sampler; ignored while idle
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == AllocationSamplerState::Idle {
            debug!("Allocation sampler not running, stop ignored");
            return;
        }

        self.engine.stop_sampling_heap_profiler();
        *state = AllocationSamplerState::Idle;
        info!("Allocation sampler stopped");
    }

    /// Snapshot the allocations sampled so far.
    ///
    /// Sampling continues afterwards, so this can be called repeatedly.
    /// Returns `None` when idle or when the engine has no snapshot.
    pub fn read(&self) -> Option<AllocationProfileNode> {
        let state = self.state.lock();
        if *state == AllocationSamplerState::Idle {
            debug!("Allocation sampler not running, read ignored");
            return None;
        }

        let Some(snapshot) = self.engine.allocation_profile() else {
            debug!("Engine has no allocation profile yet");
            return None;
        };
        let tree = convert_allocation_tree(snapshot.root());
        drop(snapshot);

        Some(tree)
    }
}
