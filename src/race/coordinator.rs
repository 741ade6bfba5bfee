//! Race coordinator - Prepares, starts and monitors a race

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::algorithms::{Algorithm, AlgorithmRegistry};
use crate::config::ProgressConfig;
use crate::constants::MONITOR_THREAD_NAME;
use crate::error::{RaceError, RaceResult};
use crate::models::{AlgorithmOutput, RaceMode, RaceReport, RankEntry, UnitFault};
use crate::utils::memory::{MemoryProbe, ProcessMemory, memory_delta_mb};

use super::events::{RaceCompleteSink, UnitProgressSink, VisualProgressSink};
use super::lock;
use super::metrics::ResultMap;
use super::progress::ProgressEstimator;
use super::unit::{CompletionHook, TimedUnit, UnitPhase};

/// Result of calling [`RaceCoordinator::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// The prepared race is still running; nothing was started
    AlreadyRunning,
    /// The prepared race already ran; prepare a new one first
    AlreadyFinished,
    /// No race has been prepared
    NotPrepared,
}

impl StartOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

#[derive(Debug)]
enum RaceStatus {
    Prepared,
    Running,
    Finished(Box<RaceReport>),
}

/// State shared by the coordinator, the units' completion hooks and the monitor
struct RaceShared {
    race_id: Uuid,
    order: HashMap<&'static str, usize>,
    results: Mutex<ResultMap>,
    status: Mutex<RaceStatus>,
    finished: Condvar,
    running: Arc<AtomicBool>,
    unit_sink: Option<Arc<dyn UnitProgressSink>>,
}

impl CompletionHook for RaceShared {
    fn on_unit_complete(&self, name: &'static str, elapsed: Duration) {
        let order = self.order.get(name).copied().unwrap_or(usize::MAX);
        let completed = lock(&self.results).record(order, name, elapsed);
        debug!(
            race_id = %self.race_id,
            algorithm = name,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            completed,
            "Result recorded"
        );

        if let Some(sink) = &self.unit_sink {
            sink.on_unit_progress(name, elapsed, completed);
        }
    }
}

/// One prepared race
struct Race {
    mode: RaceMode,
    target: Option<i64>,
    input_len: usize,
    units: Vec<Arc<TimedUnit>>,
    shared: Arc<RaceShared>,
}

impl Race {
    fn is_running(&self) -> bool {
        matches!(*lock(&self.shared.status), RaceStatus::Running)
    }
}

/// Joins every unit and publishes the final report
struct Monitor {
    units: Vec<Arc<TimedUnit>>,
    shared: Arc<RaceShared>,
    memory: Arc<dyn MemoryProbe>,
    memory_before: f64,
    complete_sink: Option<Arc<dyn RaceCompleteSink>>,
    mode: RaceMode,
    target: Option<i64>,
    input_len: usize,
    started_at: DateTime<Utc>,
}

impl Monitor {
    fn run(&self) {
        let race_id = self.shared.race_id;
        let mut faults = Vec::new();

        for unit in &self.units {
            match unit.join() {
                Ok(_) => {}
                Err(RaceError::AlgorithmFault { name, message }) => {
                    warn!(race_id = %race_id, algorithm = name, error = %message, "Algorithm did not complete");
                    faults.push(UnitFault { name, message });
                }
                Err(e) => {
                    warn!(race_id = %race_id, algorithm = unit.name(), error = %e, "Algorithm did not complete");
                    faults.push(UnitFault {
                        name: unit.name(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let memory_after = self.memory.current_memory_mb();
        let memory_delta = memory_delta_mb(self.memory_before, memory_after);
        self.shared.running.store(false, Ordering::Release);

        let ranking = lock(&self.shared.results).ranking();
        let report = RaceReport {
            race_id,
            mode: self.mode,
            input_len: self.input_len,
            target: self.target,
            started_at: self.started_at,
            finished_at: Utc::now(),
            ranking,
            faults,
            memory_delta_mb: memory_delta,
        };

        info!(
            race_id = %race_id,
            winner = report.winner().map(|w| w.name).unwrap_or("none"),
            completed = report.ranking.len(),
            faults = report.faults.len(),
            memory_delta_mb = memory_delta,
            "Race finished"
        );

        if let Some(sink) = &self.complete_sink {
            // A panicking sink must not keep the race in Running forever
            let delivered = panic::catch_unwind(AssertUnwindSafe(|| sink.on_race_complete(&report)));
            if delivered.is_err() {
                warn!(race_id = %race_id, "Race-complete callback panicked");
            }
        }

        *lock(&self.shared.status) = RaceStatus::Finished(Box::new(report));
        self.shared.finished.notify_all();
    }
}

/// Runs algorithm races over a shared input
pub struct RaceCoordinator {
    registry: AlgorithmRegistry,
    input: Option<Arc<[i64]>>,
    progress: ProgressConfig,
    memory: Arc<dyn MemoryProbe>,
    unit_sink: Option<Arc<dyn UnitProgressSink>>,
    complete_sink: Option<Arc<dyn RaceCompleteSink>>,
    visual_sink: Option<Arc<dyn VisualProgressSink>>,
    race: Option<Race>,
}

impl Default for RaceCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceCoordinator {
    /// Coordinator over the standard algorithms
    pub fn new() -> Self {
        Self::with_registry(AlgorithmRegistry::standard())
    }

    pub fn with_registry(registry: AlgorithmRegistry) -> Self {
        Self {
            registry,
            input: None,
            progress: ProgressConfig::default(),
            memory: Arc::new(ProcessMemory),
            unit_sink: None,
            complete_sink: None,
            visual_sink: None,
            race: None,
        }
    }

    pub fn with_memory_probe(mut self, probe: impl MemoryProbe + 'static) -> Self {
        self.memory = Arc::new(probe);
        self
    }

    pub fn with_progress_config(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    /// Called on the finishing unit's thread, in true finish order
    pub fn on_unit_progress(mut self, sink: impl UnitProgressSink + 'static) -> Self {
        self.unit_sink = Some(Arc::new(sink));
        self
    }

    /// Called once per race on the monitor thread
    pub fn on_race_complete(mut self, sink: impl RaceCompleteSink + 'static) -> Self {
        self.complete_sink = Some(Arc::new(sink));
        self
    }

    /// Installing a visual sink enables the progress estimator
    pub fn on_visual_progress(mut self, sink: impl VisualProgressSink + 'static) -> Self {
        self.visual_sink = Some(Arc::new(sink));
        self
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// Load the input array races are prepared over
    pub fn set_input(&mut self, values: impl Into<Arc<[i64]>>) -> RaceResult<()> {
        if self.is_running() {
            return Err(RaceError::RaceInProgress);
        }
        self.input = Some(values.into());
        Ok(())
    }

    pub fn input(&self) -> Option<&[i64]> {
        self.input.as_deref()
    }

    /// Configure a new race, discarding the previous one
    pub fn prepare(&mut self, mode: RaceMode, target: Option<i64>) -> RaceResult<()> {
        if self.is_running() {
            return Err(RaceError::RaceInProgress);
        }

        let input = match &self.input {
            Some(input) if !input.is_empty() => Arc::clone(input),
            _ => return Err(RaceError::NoInput),
        };

        if mode.requires_target() && target.is_none() {
            return Err(RaceError::InvalidConfiguration(format!(
                "Race mode '{}' requires a search target",
                mode
            )));
        }
        let target = target.filter(|_| mode.includes_searches());

        let selected: Vec<Algorithm> = self
            .registry
            .all()
            .iter()
            .filter(|a| {
                (a.is_sort() && mode.includes_sorts()) || (a.is_search() && mode.includes_searches())
            })
            .copied()
            .collect();
        if selected.is_empty() {
            return Err(RaceError::InvalidConfiguration(format!(
                "No algorithms registered for race mode '{}'",
                mode
            )));
        }

        // One sorted view shared by every search that needs it, built outside all timed regions
        let sorted_view: Option<Arc<[i64]>> =
            selected.iter().any(|a| a.requires_sorted()).then(|| {
                let mut sorted = input.to_vec();
                sorted.sort_unstable();
                Arc::from(sorted)
            });

        let race_id = Uuid::new_v4();
        let shared = Arc::new(RaceShared {
            race_id,
            order: selected
                .iter()
                .enumerate()
                .map(|(index, a)| (a.name(), index))
                .collect(),
            results: Mutex::new(ResultMap::new()),
            status: Mutex::new(RaceStatus::Prepared),
            finished: Condvar::new(),
            running: Arc::new(AtomicBool::new(false)),
            unit_sink: self.unit_sink.clone(),
        });

        let mut units = Vec::with_capacity(selected.len());
        for algorithm in selected {
            let view = match &sorted_view {
                Some(sorted) if algorithm.requires_sorted() => Arc::clone(sorted),
                _ => Arc::clone(&input),
            };
            let unit_target = if algorithm.is_search() { target } else { None };
            let hook: Arc<dyn CompletionHook> = shared.clone();
            units.push(Arc::new(TimedUnit::configure(
                algorithm,
                view,
                unit_target,
                hook,
            )?));
        }

        debug!(
            race_id = %race_id,
            mode = %mode,
            units = units.len(),
            input_len = input.len(),
            "Race prepared"
        );

        self.race = Some(Race {
            mode,
            target,
            input_len: input.len(),
            units,
            shared,
        });
        Ok(())
    }

    /// Start the prepared race and return immediately.
    ///
    /// A prepared race runs at most once; further calls report why nothing
    /// was started.
    pub fn start(&self) -> StartOutcome {
        let Some(race) = &self.race else {
            warn!("No race prepared; load an input array and prepare a race first");
            return StartOutcome::NotPrepared;
        };
        let race_id = race.shared.race_id;

        {
            let mut status = lock(&race.shared.status);
            match *status {
                RaceStatus::Prepared => {}
                RaceStatus::Running => {
                    warn!(race_id = %race_id, "Race already running");
                    return StartOutcome::AlreadyRunning;
                }
                RaceStatus::Finished(_) => {
                    warn!(race_id = %race_id, "Race already finished; prepare a new one");
                    return StartOutcome::AlreadyFinished;
                }
            }
            *status = RaceStatus::Running;
            race.shared.running.store(true, Ordering::Release);
        }

        let memory_before = self.memory.current_memory_mb();
        let started_at = Utc::now();
        let race_started = Instant::now();

        info!(
            race_id = %race_id,
            mode = %race.mode,
            units = race.units.len(),
            input_len = race.input_len,
            "Race started"
        );

        for unit in &race.units {
            if let Err(e) = unit.start() {
                error!(race_id = %race_id, algorithm = unit.name(), error = %e, "Failed to start unit");
            }
        }

        if let Some(sink) = &self.visual_sink {
            let estimator = ProgressEstimator::new(
                race.units.iter().map(|u| u.watch()).collect(),
                Arc::clone(&race.shared.running),
                race_started,
                self.progress.clone(),
                Arc::clone(sink),
            );
            if let Err(e) = estimator.spawn() {
                warn!(race_id = %race_id, error = %e, "Progress estimator unavailable");
            }
        }

        let monitor = Arc::new(Monitor {
            units: race.units.clone(),
            shared: Arc::clone(&race.shared),
            memory: Arc::clone(&self.memory),
            memory_before,
            complete_sink: self.complete_sink.clone(),
            mode: race.mode,
            target: race.target,
            input_len: race.input_len,
            started_at,
        });

        let worker = Arc::clone(&monitor);
        if let Err(e) = thread::Builder::new()
            .name(MONITOR_THREAD_NAME.to_string())
            .spawn(move || worker.run())
        {
            error!(race_id = %race_id, error = %e, "Failed to spawn monitor; joining inline");
            monitor.run();
        }

        StartOutcome::Started
    }

    pub fn is_running(&self) -> bool {
        self.race.as_ref().is_some_and(Race::is_running)
    }

    pub fn race_id(&self) -> Option<Uuid> {
        self.race.as_ref().map(|r| r.shared.race_id)
    }

    /// Fastest completion so far
    pub fn winner(&self) -> Option<RankEntry> {
        self.race
            .as_ref()
            .and_then(|r| lock(&r.shared.results).winner())
    }

    /// Partial ranking while running, final ranking once finished
    pub fn ranking(&self) -> Vec<RankEntry> {
        self.race
            .as_ref()
            .map(|r| lock(&r.shared.results).ranking())
            .unwrap_or_default()
    }

    /// Final report, once the monitor has published it
    pub fn report(&self) -> Option<RaceReport> {
        let race = self.race.as_ref()?;
        match &*lock(&race.shared.status) {
            RaceStatus::Finished(report) => Some(report.as_ref().clone()),
            _ => None,
        }
    }

    /// Block until the running race finishes and return its report.
    ///
    /// Returns `None` right away when no race was prepared or it was never
    /// started.
    pub fn wait_for_completion(&self) -> Option<RaceReport> {
        let race = self.race.as_ref()?;
        let mut status = lock(&race.shared.status);
        loop {
            match &*status {
                RaceStatus::Prepared => return None,
                RaceStatus::Finished(report) => return Some(report.as_ref().clone()),
                RaceStatus::Running => {
                    status = race
                        .shared
                        .finished
                        .wait(status)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Output of a completed algorithm in the current race
    pub fn unit_output(&self, name: &str) -> Option<AlgorithmOutput> {
        self.race
            .as_ref()?
            .units
            .iter()
            .find(|u| u.name() == name)
            .and_then(|u| u.output())
    }

    /// Phase of every unit in the current race, in registration order
    pub fn unit_phases(&self) -> Vec<(&'static str, UnitPhase)> {
        self.race
            .as_ref()
            .map(|r| r.units.iter().map(|u| (u.name(), u.phase())).collect())
            .unwrap_or_default()
    }
}
