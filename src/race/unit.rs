//! Timed unit of work
//!
//! One algorithm invocation on its own OS thread. The timed region contains
//! the algorithm call and nothing else: sorting units copy the shared input
//! before the clock starts, and a unit has no way to report intermediate
//! progress at all. Observers only see the [`UnitWatch`] phase signal.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::algorithms::{Algorithm, AlgorithmKind, Complexity, SearchFn, SortFn};
use crate::constants::UNIT_THREAD_PREFIX;
use crate::error::{RaceError, RaceResult};
use crate::models::AlgorithmOutput;

use super::lock;

/// Receives a unit's normal completion, on the unit's own thread
pub trait CompletionHook: Send + Sync {
    fn on_unit_complete(&self, name: &'static str, elapsed: Duration);
}

/// Externally visible lifecycle of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UnitPhase {
    Pending = 0,
    Running = 1,
    Completed = 2,
    Faulted = 3,
}

impl UnitPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Faulted,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Faulted)
    }
}

/// What the unit's thread runs; a search cannot exist without its target
#[derive(Debug, Clone, Copy)]
enum Job {
    Sort(SortFn),
    Search(SearchFn, i64),
}

#[derive(Debug)]
enum UnitState {
    Pending,
    Running,
    Completed {
        elapsed: Duration,
        output: AlgorithmOutput,
    },
    Faulted {
        message: String,
    },
}

impl UnitState {
    fn outcome(&self) -> Option<Result<Duration, String>> {
        match self {
            Self::Completed { elapsed, .. } => Some(Ok(*elapsed)),
            Self::Faulted { message } => Some(Err(message.clone())),
            Self::Pending | Self::Running => None,
        }
    }
}

/// State slot shared between the unit handle and its thread
#[derive(Debug)]
struct UnitSlot {
    state: Mutex<UnitState>,
    finished: Condvar,
    phase: Arc<AtomicU8>,
}

impl UnitSlot {
    fn set(&self, state: UnitState, phase: UnitPhase) {
        let mut guard = lock(&self.state);
        *guard = state;
        self.phase.store(phase as u8, Ordering::Release);
        drop(guard);
        self.finished.notify_all();
    }

    fn wait_outcome(&self) -> Result<Duration, String> {
        let mut guard = lock(&self.state);
        loop {
            if let Some(outcome) = guard.outcome() {
                return outcome;
            }
            guard = self
                .finished
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Read-only view of a unit for observers such as the progress estimator
#[derive(Debug, Clone)]
pub struct UnitWatch {
    name: &'static str,
    complexity: Complexity,
    cost_factor: f64,
    input_len: usize,
    phase: Arc<AtomicU8>,
}

impl UnitWatch {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> UnitPhase {
        UnitPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Heuristic duration of the whole run, from complexity and cost factor
    pub fn expected_duration(&self, nanos_per_op: f64) -> Duration {
        let nanos = self.complexity.operations(self.input_len) * self.cost_factor * nanos_per_op;
        Duration::try_from_secs_f64(nanos / 1e9).unwrap_or(Duration::MAX)
    }
}

/// One algorithm racing on its own thread
pub struct TimedUnit {
    name: &'static str,
    algorithm: Algorithm,
    job: Job,
    input: Arc<[i64]>,
    on_complete: Arc<dyn CompletionHook>,
    slot: Arc<UnitSlot>,
    handle: Mutex<Option<JoinHandle<()>>>,
    joined: AtomicBool,
}

impl TimedUnit {
    /// Store everything the unit needs; nothing runs yet.
    ///
    /// `input` is the view this algorithm works on (the original order, or
    /// the race's shared sorted copy). Search algorithms require `target`.
    pub fn configure(
        algorithm: Algorithm,
        input: Arc<[i64]>,
        target: Option<i64>,
        on_complete: Arc<dyn CompletionHook>,
    ) -> RaceResult<Self> {
        let job = match (algorithm.kind(), target) {
            (AlgorithmKind::Sort(run), _) => Job::Sort(run),
            (AlgorithmKind::Search { run, .. }, Some(target)) => Job::Search(run, target),
            (AlgorithmKind::Search { .. }, None) => {
                return Err(RaceError::InvalidConfiguration(format!(
                    "'{}' needs a search target",
                    algorithm.name()
                )));
            }
        };

        Ok(Self {
            name: algorithm.name(),
            algorithm,
            job,
            input,
            on_complete,
            slot: Arc::new(UnitSlot {
                state: Mutex::new(UnitState::Pending),
                finished: Condvar::new(),
                phase: Arc::new(AtomicU8::new(UnitPhase::Pending as u8)),
            }),
            handle: Mutex::new(None),
            joined: AtomicBool::new(false),
        })
    }

    /// Launch the algorithm on its own thread and return immediately.
    ///
    /// Calling this on a unit that already started is a no-op. If the OS
    /// refuses the thread the unit is marked faulted, so `join` never hangs.
    pub fn start(&self) -> RaceResult<()> {
        let mut handle = lock(&self.handle);
        if handle.is_some() || self.phase() != UnitPhase::Pending {
            return Ok(());
        }
        self.slot.set(UnitState::Running, UnitPhase::Running);

        let name = self.name;
        let job = self.job;
        let input = Arc::clone(&self.input);
        let slot = Arc::clone(&self.slot);
        let on_complete = Arc::clone(&self.on_complete);

        let spawned = thread::Builder::new()
            .name(thread_name(name))
            .spawn(move || {
                let measured = panic::catch_unwind(AssertUnwindSafe(|| measure(job, &input)));
                match measured {
                    Ok((elapsed, output)) => {
                        debug!(algorithm = name, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Unit completed");
                        slot.set(UnitState::Completed { elapsed, output }, UnitPhase::Completed);
                        on_complete.on_unit_complete(name, elapsed);
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!(algorithm = name, error = %message, "Unit faulted");
                        slot.set(UnitState::Faulted { message }, UnitPhase::Faulted);
                    }
                }
            });

        match spawned {
            Ok(join_handle) => {
                debug!(algorithm = name, "Unit started");
                *handle = Some(join_handle);
                Ok(())
            }
            Err(source) => {
                self.slot.set(
                    UnitState::Faulted {
                        message: format!("thread spawn failed: {}", source),
                    },
                    UnitPhase::Faulted,
                );
                Err(RaceError::Spawn {
                    what: thread_name(name),
                    source,
                })
            }
        }
    }

    /// Block until the unit is finished and its thread is reaped.
    ///
    /// Idempotent. `start()` must have been called first, otherwise this
    /// blocks until some other caller starts the unit. Only the caller that
    /// reaps the thread is guaranteed the completion hook has returned.
    pub fn join(&self) -> RaceResult<Duration> {
        let handle = lock(&self.handle).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(algorithm = self.name, "Completion hook panicked");
            }
        }

        let outcome = self.slot.wait_outcome();
        self.joined.store(true, Ordering::Release);
        outcome.map_err(|message| RaceError::AlgorithmFault {
            name: self.name,
            message,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> UnitPhase {
        UnitPhase::from_u8(self.slot.phase.load(Ordering::Acquire))
    }

    pub fn is_joined(&self) -> bool {
        self.joined.load(Ordering::Acquire)
    }

    /// Measured time, once completed
    pub fn elapsed(&self) -> Option<Duration> {
        match &*lock(&self.slot.state) {
            UnitState::Completed { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }

    /// Algorithm result, once completed
    pub fn output(&self) -> Option<AlgorithmOutput> {
        match &*lock(&self.slot.state) {
            UnitState::Completed { output, .. } => Some(output.clone()),
            _ => None,
        }
    }

    pub fn watch(&self) -> UnitWatch {
        UnitWatch {
            name: self.name,
            complexity: self.algorithm.complexity(),
            cost_factor: self.algorithm.cost_factor(),
            input_len: self.input.len(),
            phase: Arc::clone(&self.slot.phase),
        }
    }
}

impl std::fmt::Debug for TimedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedUnit")
            .field("name", &self.name)
            .field("phase", &self.phase())
            .field("input_len", &self.input.len())
            .finish()
    }
}

/// Run the job, timing only the algorithm call
fn measure(job: Job, input: &[i64]) -> (Duration, AlgorithmOutput) {
    match job {
        Job::Sort(run) => {
            let mut work = input.to_vec();
            let clock = Instant::now();
            run(&mut work);
            let elapsed = clock.elapsed();
            (elapsed, AlgorithmOutput::Sorted(work))
        }
        Job::Search(run, target) => {
            let clock = Instant::now();
            let found = run(input, target);
            let elapsed = clock.elapsed();
            (elapsed, AlgorithmOutput::Found(found))
        }
    }
}

fn thread_name(name: &str) -> String {
    format!(
        "{}-{}",
        UNIT_THREAD_PREFIX,
        name.to_ascii_lowercase().replace(' ', "-")
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "algorithm panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::algorithms::{binary_search, quick_sort, sequential_search};

    #[derive(Default)]
    struct CountingHook {
        calls: AtomicUsize,
        last: Mutex<Option<(&'static str, Duration)>>,
    }

    impl CompletionHook for CountingHook {
        fn on_unit_complete(&self, name: &'static str, elapsed: Duration) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((name, elapsed));
        }
    }

    fn exploding_sort(_: &mut [i64]) {
        panic!("comparator exploded");
    }

    #[test]
    fn test_sort_unit_completes_on_private_copy() {
        let input: Arc<[i64]> = Arc::from(vec![5, 3, 8, 1, 9, 2]);
        let hook = Arc::new(CountingHook::default());
        let unit =
            TimedUnit::configure(quick_sort::descriptor(), input.clone(), None, hook.clone())
                .unwrap();
        assert_eq!(unit.phase(), UnitPhase::Pending);

        unit.start().unwrap();
        let elapsed = unit.join().unwrap();

        assert_eq!(unit.phase(), UnitPhase::Completed);
        assert!(unit.is_joined());
        assert_eq!(unit.elapsed(), Some(elapsed));
        assert_eq!(
            unit.output(),
            Some(AlgorithmOutput::Sorted(vec![1, 2, 3, 5, 8, 9]))
        );
        // The shared input is untouched
        assert_eq!(&*input, &[5, 3, 8, 1, 9, 2]);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*hook.last.lock().unwrap(), Some(("Quick Sort", elapsed)));
    }

    #[test]
    fn test_join_and_start_are_idempotent() {
        let input: Arc<[i64]> = Arc::from(vec![10, 20, 30, 40, 50]);
        let hook = Arc::new(CountingHook::default());
        let unit = TimedUnit::configure(
            sequential_search::descriptor(),
            input,
            Some(30),
            hook.clone(),
        )
        .unwrap();

        unit.start().unwrap();
        unit.start().unwrap();
        let first = unit.join().unwrap();
        let second = unit.join().unwrap();

        assert_eq!(first, second);
        assert_eq!(unit.output(), Some(AlgorithmOutput::Found(Some(2))));
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_search_without_target_is_rejected() {
        let input: Arc<[i64]> = Arc::from(vec![1, 2, 3]);
        let hook = Arc::new(CountingHook::default());
        let err = TimedUnit::configure(binary_search::descriptor(), input, None, hook)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
    }

    #[test]
    fn test_panicking_algorithm_faults_without_completion() {
        let input: Arc<[i64]> = Arc::from(vec![3, 2, 1]);
        let hook = Arc::new(CountingHook::default());
        let faulty = Algorithm::sort("Exploding Sort", exploding_sort, Complexity::Linear);
        let unit = TimedUnit::configure(faulty, input, None, hook.clone()).unwrap();

        unit.start().unwrap();
        let err = unit.join().unwrap_err();

        match err {
            RaceError::AlgorithmFault { name, message } => {
                assert_eq!(name, "Exploding Sort");
                assert_eq!(message, "comparator exploded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(unit.phase(), UnitPhase::Faulted);
        assert_eq!(unit.output(), None);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_watch_reflects_phase() {
        let input: Arc<[i64]> = Arc::from(vec![4, 1]);
        let hook = Arc::new(CountingHook::default());
        let unit =
            TimedUnit::configure(quick_sort::descriptor(), input, None, hook).unwrap();
        let watch = unit.watch();
        assert_eq!(watch.phase(), UnitPhase::Pending);
        assert_eq!(watch.name(), "Quick Sort");

        unit.start().unwrap();
        unit.join().unwrap();
        assert_eq!(watch.phase(), UnitPhase::Completed);
        assert!(watch.phase().is_terminal());
    }

    #[test]
    fn test_expected_duration_scales_with_complexity() {
        let hook: Arc<dyn CompletionHook> = Arc::new(CountingHook::default());
        let input: Arc<[i64]> = Arc::from(vec![0; 1000]);
        let slow = Algorithm::sort("Slow", exploding_sort, Complexity::Quadratic);
        let fast = Algorithm::sort("Fast", exploding_sort, Complexity::Linear);
        let slow = TimedUnit::configure(slow, input.clone(), None, hook.clone()).unwrap();
        let fast = TimedUnit::configure(fast, input, None, hook).unwrap();

        let fast = fast.watch().expected_duration(1.0).as_nanos();
        let slow = slow.watch().expected_duration(1.0).as_nanos();
        assert!(fast.abs_diff(1_000) <= 1);
        assert!(slow.abs_diff(1_000_000) <= 1);
    }
}
