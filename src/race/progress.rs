//! Visual progress estimator
//!
//! Purely cosmetic. Percentages are derived from the wall clock and each
//! algorithm's cost heuristic, never from the algorithms themselves, so the
//! estimator cannot perturb a measurement.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ProgressConfig;
use crate::constants::{COMPLETE_PERCENT, ESTIMATOR_THREAD_NAME};
use crate::error::{RaceError, RaceResult};

use super::events::VisualProgressSink;
use super::unit::{UnitPhase, UnitWatch};

/// Estimated completion percentage, clamped to `[0, cap]`
pub fn estimate_percent(elapsed: Duration, expected: Duration, cap: f64) -> f64 {
    if expected.is_zero() {
        return cap;
    }
    let percent = elapsed.as_secs_f64() / expected.as_secs_f64() * COMPLETE_PERCENT;
    percent.clamp(0.0, cap)
}

struct Tracked {
    watch: UnitWatch,
    expected: Duration,
    done: bool,
}

/// Polls unit phase signals and reports estimated percentages
pub struct ProgressEstimator {
    units: Vec<Tracked>,
    running: Arc<AtomicBool>,
    race_started: Instant,
    settings: ProgressConfig,
    sink: Arc<dyn VisualProgressSink>,
}

impl ProgressEstimator {
    pub fn new(
        watches: Vec<UnitWatch>,
        running: Arc<AtomicBool>,
        race_started: Instant,
        settings: ProgressConfig,
        sink: Arc<dyn VisualProgressSink>,
    ) -> Self {
        let units = watches
            .into_iter()
            .map(|watch| Tracked {
                expected: watch.expected_duration(settings.nanos_per_op),
                watch,
                done: false,
            })
            .collect();

        Self {
            units,
            running,
            race_started,
            settings,
            sink,
        }
    }

    /// Run the estimator on its own thread
    pub fn spawn(self) -> RaceResult<JoinHandle<()>> {
        thread::Builder::new()
            .name(ESTIMATOR_THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(|source| RaceError::Spawn {
                what: ESTIMATOR_THREAD_NAME.to_string(),
                source,
            })
    }

    /// Poll until the running flag clears, then flush final completions
    pub fn run(mut self) {
        debug!(units = self.units.len(), "Progress estimator started");
        while self.running.load(Ordering::Acquire) {
            self.poll();
            if self.units.iter().all(|u| u.done) {
                break;
            }
            thread::sleep(self.settings.poll_interval);
        }
        self.poll();
        debug!("Progress estimator stopped");
    }

    fn poll(&mut self) {
        let elapsed = self.race_started.elapsed();
        for unit in self.units.iter_mut().filter(|u| !u.done) {
            match unit.watch.phase() {
                UnitPhase::Completed => {
                    unit.done = true;
                    self.sink
                        .on_visual_progress(unit.watch.name(), COMPLETE_PERCENT);
                }
                UnitPhase::Faulted => unit.done = true,
                UnitPhase::Pending | UnitPhase::Running => {
                    let percent =
                        estimate_percent(elapsed, unit.expected, self.settings.cap_percent);
                    self.sink.on_visual_progress(unit.watch.name(), percent);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::algorithms::{Algorithm, Complexity, quick_sort};
    use crate::race::unit::{CompletionHook, TimedUnit};

    struct NoopHook;

    impl CompletionHook for NoopHook {
        fn on_unit_complete(&self, _: &'static str, _: Duration) {}
    }

    fn fast_settings() -> ProgressConfig {
        ProgressConfig {
            poll_interval: Duration::from_millis(2),
            ..ProgressConfig::default()
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<(&'static str, f64)>>>, Arc<dyn VisualProgressSink>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: Arc<dyn VisualProgressSink> =
            Arc::new(move |name: &'static str, percent: f64| {
                sink_seen.lock().unwrap().push((name, percent));
            });
        (seen, sink)
    }

    fn panicking_sort(_: &mut [i64]) {
        panic!("broken");
    }

    #[test]
    fn test_estimate_percent_is_capped() {
        let expected = Duration::from_millis(100);
        assert_eq!(estimate_percent(Duration::ZERO, expected, 95.0), 0.0);
        assert!((estimate_percent(Duration::from_millis(50), expected, 95.0) - 50.0).abs() < 1e-9);
        assert_eq!(estimate_percent(Duration::from_secs(10), expected, 95.0), 95.0);
        assert_eq!(estimate_percent(Duration::from_millis(1), Duration::ZERO, 95.0), 95.0);
    }

    #[test]
    fn test_completed_unit_reports_hundred_once() {
        let input: Arc<[i64]> = Arc::from(vec![3, 1, 2]);
        let unit =
            TimedUnit::configure(quick_sort::descriptor(), input, None, Arc::new(NoopHook))
                .unwrap();
        unit.start().unwrap();
        unit.join().unwrap();

        let (seen, sink) = recorder();
        let running = Arc::new(AtomicBool::new(false));
        ProgressEstimator::new(vec![unit.watch()], running, Instant::now(), fast_settings(), sink)
            .run();

        let seen = seen.lock().unwrap();
        let hundreds = seen.iter().filter(|(_, p)| *p == COMPLETE_PERCENT).count();
        assert_eq!(hundreds, 1);
    }

    #[test]
    fn test_faulted_unit_gets_no_updates() {
        let input: Arc<[i64]> = Arc::from(vec![3, 1, 2]);
        let faulty = Algorithm::sort("Broken Sort", panicking_sort, Complexity::Linear);
        let unit = TimedUnit::configure(faulty, input, None, Arc::new(NoopHook)).unwrap();
        unit.start().unwrap();
        assert!(unit.join().is_err());

        let (seen, sink) = recorder();
        let running = Arc::new(AtomicBool::new(true));
        ProgressEstimator::new(vec![unit.watch()], running, Instant::now(), fast_settings(), sink)
            .run();

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_estimator_stops_when_running_clears() {
        let input: Arc<[i64]> = Arc::from(vec![0; 64]);
        let unit = TimedUnit::configure(
            Algorithm::sort("Idle Sort", panicking_sort, Complexity::Quadratic),
            input,
            None,
            Arc::new(NoopHook),
        )
        .unwrap();

        let (seen, sink) = recorder();
        let running = Arc::new(AtomicBool::new(true));
        let handle = ProgressEstimator::new(
            vec![unit.watch()],
            Arc::clone(&running),
            Instant::now(),
            fast_settings(),
            sink,
        )
        .spawn()
        .unwrap();

        thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Release);
        handle.join().unwrap();

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|(_, p)| *p <= 95.0));
    }
}
