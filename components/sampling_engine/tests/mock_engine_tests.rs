// Tests for the in-memory profiling engine

use sampling_engine::{
    AllocationNode, AllocationProfile, CallTreeNode, CpuProfile, CpuProfileNode,
    CpuProfilingSession, MockCpuOutcome, MockEngine, MockNode, ProfilingEngine,
};

#[test]
fn test_engine_availability_flags() {
    let engine = MockEngine::new();
    assert!(engine.has_cpu_profiler());
    assert!(engine.has_sampling_heap_profiler());

    engine.set_cpu_profiler_available(false);
    engine.set_heap_profiler_available(false);
    assert!(!engine.has_cpu_profiler());
    assert!(!engine.has_sampling_heap_profiler());
}

#[test]
fn test_cpu_session_lifecycle_is_counted() {
    let engine = MockEngine::new();
    let tree = MockNode::root().with_child(MockNode::new("work", "app.js", 4, 2).with_hit_count(9));
    engine.set_cpu_outcome(MockCpuOutcome::Profile(tree));

    let mut session = engine.new_cpu_session();
    session.set_sampling_interval(250);
    session.start_profiling("profile");

    let profile = session.stop_profiling("profile").unwrap();
    let root = profile.top_down_root().unwrap();
    assert_eq!(root.function_name(), "(root)");
    assert_eq!(root.children_count(), 1);

    let child = root.child(0).unwrap();
    assert_eq!(child.function_name(), "work");
    assert_eq!(child.script_resource_name(), "app.js");
    assert_eq!(child.line_number(), 4);
    assert_eq!(child.column_number(), 2);
    assert_eq!(child.hit_count(), 9);
    assert!(root.child(1).is_none());

    profile.delete();
    session.dispose();

    let counters = engine.counters();
    assert_eq!(counters.sessions_created(), 1);
    assert_eq!(counters.sessions_disposed(), 1);
    assert_eq!(counters.profiles_started(), 1);
    assert_eq!(counters.profiles_stopped(), 1);
    assert_eq!(counters.profiles_deleted(), 1);
    assert_eq!(counters.last_sampling_interval(), 250);
    assert_eq!(counters.last_title().as_deref(), Some("profile"));
}

#[test]
fn test_no_profile_outcome() {
    let engine = MockEngine::new();
    engine.set_cpu_outcome(MockCpuOutcome::NoProfile);

    let mut session = engine.new_cpu_session();
    session.start_profiling("profile");
    assert!(session.stop_profiling("profile").is_none());
    session.dispose();

    assert_eq!(engine.counters().profiles_deleted(), 0);
    assert_eq!(engine.counters().sessions_disposed(), 1);
}

#[test]
fn test_heap_sampler_snapshots() {
    let engine = MockEngine::new();
    let tree = MockNode::root().with_child(
        MockNode::new("alloc", "heap.js", 1, 1)
            .with_allocation(3, 16)
            .with_allocation(2, 100),
    );
    engine.set_allocation_tree(Some(tree));

    engine.start_sampling_heap_profiler(1 << 19, 25);
    assert!(engine.is_heap_sampling());
    assert_eq!(engine.counters().last_heap_sampling_params(), (1 << 19, 25));

    {
        let snapshot = engine.allocation_profile().unwrap();
        let alloc = snapshot.root().child(0).unwrap();
        assert_eq!(alloc.allocations().len(), 2);
        assert_eq!(alloc.allocations()[1].size, 100);
        assert_eq!(alloc.allocations()[1].count, 2);
    }

    engine.set_allocation_tree(None);
    assert!(engine.allocation_profile().is_none());

    engine.stop_sampling_heap_profiler();
    assert!(!engine.is_heap_sampling());

    let counters = engine.counters();
    assert_eq!(counters.heap_sampler_starts(), 1);
    assert_eq!(counters.heap_sampler_stops(), 1);
    assert_eq!(counters.snapshots_taken(), 1);
    assert_eq!(counters.snapshots_released(), 1);
}

#[test]
fn test_clones_share_state() {
    let engine = MockEngine::new();
    let observer = engine.clone();

    engine.start_sampling_heap_profiler(1024, 4);
    assert!(observer.is_heap_sampling());
    assert_eq!(observer.counters().heap_sampler_starts(), 1);
}
