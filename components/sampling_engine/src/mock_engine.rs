//! Mock profiling engine for testing the samplers
//!
//! This provides an in-memory engine whose profiles are scripted call trees.
//! In production, this would be replaced with a binding to the embedded
//! engine's real profiler.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::{
    Allocation, AllocationNode, AllocationProfile, CallTreeNode, CpuProfile, CpuProfileNode,
    CpuProfilingSession, ProfilingEngine,
};

/// A scripted call-tree node, usable for both CPU and allocation profiles
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    pub function_name: String,
    pub script_name: String,
    pub line_number: i32,
    pub column_number: i32,
    pub hit_count: u32,
    pub allocations: Vec<Allocation>,
    pub children: Vec<MockNode>,
}

impl MockNode {
    /// Create a node with no samples and no children
    pub fn new(
        function_name: impl Into<String>,
        script_name: impl Into<String>,
        line_number: i32,
        column_number: i32,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            script_name: script_name.into(),
            line_number,
            column_number,
            hit_count: 0,
            allocations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The synthetic root frame engines put on top of every tree
    pub fn root() -> Self {
        Self::new("(root)", "", 0, 0)
    }

    pub fn with_hit_count(mut self, hit_count: u32) -> Self {
        self.hit_count = hit_count;
        self
    }

    pub fn with_allocation(mut self, count: u32, size: u64) -> Self {
        self.allocations.push(Allocation { size, count });
        self
    }

    pub fn with_child(mut self, child: MockNode) -> Self {
        self.children.push(child);
        self
    }

    /// A linear call chain `depth` levels deep (at least one level).
    ///
    /// Level `n` is named `frame{n}`, sits on line `n + 1` of `chain.js`, has
    /// one hit and one 8-byte allocation.
    pub fn chain(depth: usize) -> Self {
        let depth = depth.max(1);
        let frame = |level: usize| {
            MockNode::new(format!("frame{}", level), "chain.js", level as i32 + 1, 1)
                .with_hit_count(1)
                .with_allocation(1, 8)
        };

        let mut node = frame(depth - 1);
        for level in (0..depth - 1).rev() {
            node = frame(level).with_child(node);
        }
        node
    }
}

impl CallTreeNode for MockNode {
    fn function_name(&self) -> &str {
        &self.function_name
    }

    fn script_resource_name(&self) -> &str {
        &self.script_name
    }

    fn line_number(&self) -> i32 {
        self.line_number
    }

    fn column_number(&self) -> i32 {
        self.column_number
    }

    fn children_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }
}

impl CpuProfileNode for MockNode {
    fn hit_count(&self) -> u32 {
        self.hit_count
    }
}

impl AllocationNode for MockNode {
    fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }
}

/// What the mock returns when a CPU session is stopped
#[derive(Debug, Clone, PartialEq)]
pub enum MockCpuOutcome {
    /// A profile whose top-down root is the given tree
    Profile(MockNode),
    /// A profile object that has no root node
    ProfileWithoutRoot,
    /// No profile object at all
    NoProfile,
}

/// Call and release accounting for the mock engine
#[derive(Debug, Default)]
pub struct MockCounters {
    sessions_created: AtomicUsize,
    sessions_disposed: AtomicUsize,
    profiles_started: AtomicUsize,
    profiles_stopped: AtomicUsize,
    profiles_deleted: AtomicUsize,
    heap_sampler_starts: AtomicUsize,
    heap_sampler_stops: AtomicUsize,
    snapshots_taken: AtomicUsize,
    snapshots_released: AtomicUsize,
    last_sampling_interval: AtomicU32,
    last_heap_sample_interval: AtomicU64,
    last_heap_stack_depth: AtomicUsize,
    last_title: RwLock<Option<String>>,
}

impl MockCounters {
    pub fn sessions_created(&self) -> usize {
        self.sessions_created.load(Ordering::SeqCst)
    }

    pub fn sessions_disposed(&self) -> usize {
        self.sessions_disposed.load(Ordering::SeqCst)
    }

    pub fn profiles_started(&self) -> usize {
        self.profiles_started.load(Ordering::SeqCst)
    }

    pub fn profiles_stopped(&self) -> usize {
        self.profiles_stopped.load(Ordering::SeqCst)
    }

    pub fn profiles_deleted(&self) -> usize {
        self.profiles_deleted.load(Ordering::SeqCst)
    }

    pub fn heap_sampler_starts(&self) -> usize {
        self.heap_sampler_starts.load(Ordering::SeqCst)
    }

    pub fn heap_sampler_stops(&self) -> usize {
        self.heap_sampler_stops.load(Ordering::SeqCst)
    }

    pub fn snapshots_taken(&self) -> usize {
        self.snapshots_taken.load(Ordering::SeqCst)
    }

    pub fn snapshots_released(&self) -> usize {
        self.snapshots_released.load(Ordering::SeqCst)
    }

    /// Interval passed to the most recent `set_sampling_interval`, in microseconds
    pub fn last_sampling_interval(&self) -> u32 {
        self.last_sampling_interval.load(Ordering::SeqCst)
    }

    /// Parameters of the most recent heap sampler start
    pub fn last_heap_sampling_params(&self) -> (u64, usize) {
        (
            self.last_heap_sample_interval.load(Ordering::SeqCst),
            self.last_heap_stack_depth.load(Ordering::SeqCst),
        )
    }

    /// Title of the most recently started CPU profile
    pub fn last_title(&self) -> Option<String> {
        self.last_title.read().clone()
    }
}

#[derive(Debug)]
struct Shared {
    cpu_profiler_available: AtomicBool,
    heap_profiler_available: AtomicBool,
    cpu_outcome: RwLock<MockCpuOutcome>,
    allocation_tree: RwLock<Option<MockNode>>,
    heap_sampling: AtomicBool,
    counters: MockCounters,
}

/// Mock engine for testing
///
/// Both facilities are available by default; stopping a CPU session yields a
/// root-only profile and heap snapshots contain a root-only tree.
#[derive(Debug, Clone)]
pub struct MockEngine {
    shared: Arc<Shared>,
}

impl MockEngine {
    /// Create a new mock engine
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                cpu_profiler_available: AtomicBool::new(true),
                heap_profiler_available: AtomicBool::new(true),
                cpu_outcome: RwLock::new(MockCpuOutcome::Profile(MockNode::root())),
                allocation_tree: RwLock::new(Some(MockNode::root())),
                heap_sampling: AtomicBool::new(false),
                counters: MockCounters::default(),
            }),
        }
    }

    pub fn set_cpu_profiler_available(&self, available: bool) {
        self.shared
            .cpu_profiler_available
            .store(available, Ordering::SeqCst);
    }

    pub fn set_heap_profiler_available(&self, available: bool) {
        self.shared
            .heap_profiler_available
            .store(available, Ordering::SeqCst);
    }

    /// Script the result of the next CPU session stop
    pub fn set_cpu_outcome(&self, outcome: MockCpuOutcome) {
        *self.shared.cpu_outcome.write() = outcome;
    }

    /// Script the tree returned by heap snapshots; `None` means no snapshot
    pub fn set_allocation_tree(&self, tree: Option<MockNode>) {
        *self.shared.allocation_tree.write() = tree;
    }

    /// Whether the engine-wide heap sampler is running
    pub fn is_heap_sampling(&self) -> bool {
        self.shared.heap_sampling.load(Ordering::SeqCst)
    }

    pub fn counters(&self) -> &MockCounters {
        &self.shared.counters
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfilingEngine for MockEngine {
    type CpuSession = MockCpuSession;
    type AllocationProfile = MockAllocationProfile;

    fn has_cpu_profiler(&self) -> bool {
        self.shared.cpu_profiler_available.load(Ordering::SeqCst)
    }

    fn has_sampling_heap_profiler(&self) -> bool {
        self.shared.heap_profiler_available.load(Ordering::SeqCst)
    }

    fn new_cpu_session(&self) -> MockCpuSession {
        self.shared
            .counters
            .sessions_created
            .fetch_add(1, Ordering::SeqCst);
        MockCpuSession {
            shared: Arc::clone(&self.shared),
            title: None,
        }
    }

    fn start_sampling_heap_profiler(&self, sample_interval: u64, stack_depth: usize) {
        debug!(
            "Mock heap sampler started (interval {} bytes, depth {})",
            sample_interval, stack_depth
        );
        let counters = &self.shared.counters;
        counters.heap_sampler_starts.fetch_add(1, Ordering::SeqCst);
        counters
            .last_heap_sample_interval
            .store(sample_interval, Ordering::SeqCst);
        counters
            .last_heap_stack_depth
            .store(stack_depth, Ordering::SeqCst);
        self.shared.heap_sampling.store(true, Ordering::SeqCst);
    }

    fn stop_sampling_heap_profiler(&self) {
        debug!("Mock heap sampler stopped");
        self.shared
            .counters
            .heap_sampler_stops
            .fetch_add(1, Ordering::SeqCst);
        self.shared.heap_sampling.store(false, Ordering::SeqCst);
    }

    fn allocation_profile(&self) -> Option<MockAllocationProfile> {
        // The engine has nothing to report unless its sampler is running
        if !self.is_heap_sampling() {
            return None;
        }

        let root = self.shared.allocation_tree.read().clone()?;
        self.shared
            .counters
            .snapshots_taken
            .fetch_add(1, Ordering::SeqCst);

        Some(MockAllocationProfile {
            root,
            shared: Arc::clone(&self.shared),
        })
    }
}

/// Mock CPU profiler instance
#[derive(Debug)]
pub struct MockCpuSession {
    shared: Arc<Shared>,
    title: Option<String>,
}

impl CpuProfilingSession for MockCpuSession {
    type Profile = MockCpuProfile;

    fn set_sampling_interval(&mut self, micros: u32) {
        self.shared
            .counters
            .last_sampling_interval
            .store(micros, Ordering::SeqCst);
    }

    fn start_profiling(&mut self, title: &str) {
        debug!("Mock CPU profile started: {}", title);
        self.shared
            .counters
            .profiles_started
            .fetch_add(1, Ordering::SeqCst);
        *self.shared.counters.last_title.write() = Some(title.to_string());
        self.title = Some(title.to_string());
    }

    fn stop_profiling(&mut self, title: &str) -> Option<MockCpuProfile> {
        // Profiles are looked up by title, like the real engine does
        if self.title.as_deref() != Some(title) {
            return None;
        }
        self.title = None;
        self.shared
            .counters
            .profiles_stopped
            .fetch_add(1, Ordering::SeqCst);

        let root = match &*self.shared.cpu_outcome.read() {
            MockCpuOutcome::Profile(tree) => Some(tree.clone()),
            MockCpuOutcome::ProfileWithoutRoot => None,
            MockCpuOutcome::NoProfile => return None,
        };

        Some(MockCpuProfile {
            root,
            shared: Arc::clone(&self.shared),
        })
    }

    fn dispose(self) {
        self.shared
            .counters
            .sessions_disposed
            .fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock finished CPU profile
#[derive(Debug)]
pub struct MockCpuProfile {
    root: Option<MockNode>,
    shared: Arc<Shared>,
}

impl CpuProfile for MockCpuProfile {
    type Node = MockNode;

    fn top_down_root(&self) -> Option<&MockNode> {
        self.root.as_ref()
    }

    fn delete(self) {
        self.shared
            .counters
            .profiles_deleted
            .fetch_add(1, Ordering::SeqCst);
    }
}

/// Mock heap-sampling snapshot
#[derive(Debug)]
pub struct MockAllocationProfile {
    root: MockNode,
    shared: Arc<Shared>,
}

impl AllocationProfile for MockAllocationProfile {
    type Node = MockNode;

    fn root(&self) -> &MockNode {
        &self.root
    }
}

impl Drop for MockAllocationProfile {
    fn drop(&mut self) {
        self.shared
            .counters
            .snapshots_released
            .fetch_add(1, Ordering::SeqCst);
    }
}
