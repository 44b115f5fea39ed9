//! CPU sampler controller
//!
//! Drives one engine CPU profiling session at a time and turns the finished
//! profile into a [`CpuProfileNode`] tree.

use parking_lot::Mutex;
use profile_types::CpuProfileNode;
use sampling_engine::{CpuProfile, CpuProfilingSession, ProfilingEngine};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::tree::convert_cpu_tree;

/// Sampling interval used when `start` is given none, in microseconds
pub const DEFAULT_SAMPLING_INTERVAL_MICROS: u32 = 10_000;

/// Title every CPU profile is recorded under
pub const CPU_PROFILE_TITLE: &str = "autoprofile-cpu";

enum CpuSamplerState<S> {
    Idle,
    /// Owns the engine session until the matching stop
    Sampling(S),
}

/// CPU sampler state and functionality
pub struct CpuSampler<E: ProfilingEngine> {
    engine: Arc<E>,
    /// Interval applied when `start` is called without one
    default_interval: u32,
    state: Mutex<CpuSamplerState<E::CpuSession>>,
}

impl<E: ProfilingEngine> CpuSampler<E> {
    /// Create an idle sampler on `engine`
    pub fn new(engine: Arc<E>) -> Self {
        Self::with_default_interval(engine, DEFAULT_SAMPLING_INTERVAL_MICROS)
    }

    /// Create an idle sampler whose default interval is `micros`
    pub fn with_default_interval(engine: Arc<E>, micros: u32) -> Self {
        Self {
            engine,
            default_interval: micros,
            state: Mutex::new(CpuSamplerState::Idle),
        }
    }

    pub fn default_interval(&self) -> u32 {
        self.default_interval
    }

    /// Whether the engine has a CPU profiler
    pub fn check_availability(&self) -> bool {
        self.engine.has_cpu_profiler()
    }

    /// Whether a session is currently running
    pub fn is_sampling(&self) -> bool {
        matches!(*self.state.lock(), CpuSamplerState::Sampling(_))
    }

    /// Start sampling. Ignored while a session is already running, in which
    /// case that session keeps its first interval.
    pub fn start(&self, sampling_interval_micros: Option<u32>) {
        let mut state = self.state.lock();
        if matches!(*state, CpuSamplerState::Sampling(_)) {
            debug!("CPU sampler already running, start ignored");
            return;
        }

        let interval = sampling_interval_micros.unwrap_or(self.default_interval);
        let mut session = self.engine.new_cpu_session();
        session.set_sampling_interval(interval);
        session.start_profiling(CPU_PROFILE_TITLE);

        info!("CPU sampler started ({} us interval)", interval);
        *state = CpuSamplerState::Sampling(session);
    }

    /// Stop sampling and return the collected call tree.
    ///
    /// Returns `None` when idle or when the engine produced no usable profile.
    /// The engine profile and session are released before returning.
    pub fn stop(&self) -> Option<CpuProfileNode> {
        let mut state = self.state.lock();
        let mut session = match std::mem::replace(&mut *state, CpuSamplerState::Idle) {
            CpuSamplerState::Idle => {
                debug!("CPU sampler not running, stop ignored");
                return None;
            }
            CpuSamplerState::Sampling(session) => session,
        };

        let tree = match session.stop_profiling(CPU_PROFILE_TITLE) {
            Some(profile) => {
                let tree = profile.top_down_root().map(convert_cpu_tree);
                if tree.is_none() {
                    warn!("CPU profile has no root node");
                }
                profile.delete();
                tree
            }
            None => {
                warn!("Engine returned no CPU profile");
                None
            }
        };
        session.dispose();

        info!("CPU sampler stopped");
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampling_engine::{MockCpuOutcome, MockEngine, MockNode};

    fn sampler() -> (Arc<MockEngine>, CpuSampler<MockEngine>) {
        let engine = Arc::new(MockEngine::new());
        (Arc::clone(&engine), CpuSampler::new(engine))
    }

    #[test]
    fn test_new_is_idle() {
        let (_, sampler) = sampler();
        assert!(!sampler.is_sampling());
        assert_eq!(sampler.default_interval(), DEFAULT_SAMPLING_INTERVAL_MICROS);
    }

    #[test]
    fn test_start_uses_default_interval_and_title() {
        let (engine, sampler) = sampler();
        sampler.start(None);

        assert!(sampler.is_sampling());
        assert_eq!(engine.counters().last_sampling_interval(), 10_000);
        assert_eq!(
            engine.counters().last_title().as_deref(),
            Some(CPU_PROFILE_TITLE)
        );
    }

    #[test]
    fn test_configured_default_interval() {
        let engine = Arc::new(MockEngine::new());
        let sampler = CpuSampler::with_default_interval(Arc::clone(&engine), 500);
        sampler.start(None);
        assert_eq!(engine.counters().last_sampling_interval(), 500);
    }

    #[test]
    fn test_stop_returns_tree() {
        let (engine, sampler) = sampler();
        engine.set_cpu_outcome(MockCpuOutcome::Profile(
            MockNode::root().with_child(MockNode::new("main", "app.js", 1, 1).with_hit_count(3)),
        ));

        sampler.start(Some(100));
        let tree = sampler.stop().unwrap();

        assert_eq!(tree.func_name, "(root)");
        assert_eq!(tree.children[0].stats.hit_count, 3);
        assert!(!sampler.is_sampling());
    }

    #[test]
    fn test_profile_without_root_is_released() {
        let (engine, sampler) = sampler();
        engine.set_cpu_outcome(MockCpuOutcome::ProfileWithoutRoot);

        sampler.start(None);
        assert!(sampler.stop().is_none());
        assert_eq!(engine.counters().profiles_deleted(), 1);
        assert_eq!(engine.counters().sessions_disposed(), 1);
    }
}
