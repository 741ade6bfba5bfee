//! Callback slots and the channel bridge used by front ends
//!
//! Each slot is a one-method trait. Closures with the matching signature
//! implement them directly; [`ChannelSink`] implements all three by
//! forwarding [`RaceEvent`]s to a tokio channel so an async front end can
//! consume them without ever blocking an engine thread.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::models::RaceReport;

/// Notified on the finishing unit's thread, in true finish order
pub trait UnitProgressSink: Send + Sync {
    fn on_unit_progress(&self, name: &'static str, elapsed: Duration, completed: usize);
}

/// Notified once per race, on the monitor thread
pub trait RaceCompleteSink: Send + Sync {
    fn on_race_complete(&self, report: &RaceReport);
}

/// Notified by the progress estimator; purely cosmetic
pub trait VisualProgressSink: Send + Sync {
    fn on_visual_progress(&self, name: &'static str, percent: f64);
}

impl<F> UnitProgressSink for F
where
    F: Fn(&'static str, Duration, usize) + Send + Sync,
{
    fn on_unit_progress(&self, name: &'static str, elapsed: Duration, completed: usize) {
        self(name, elapsed, completed)
    }
}

impl<F> RaceCompleteSink for F
where
    F: Fn(&RaceReport) + Send + Sync,
{
    fn on_race_complete(&self, report: &RaceReport) {
        self(report)
    }
}

impl<F> VisualProgressSink for F
where
    F: Fn(&'static str, f64) + Send + Sync,
{
    fn on_visual_progress(&self, name: &'static str, percent: f64) {
        self(name, percent)
    }
}

/// Everything a front end can observe during a race
#[derive(Debug, Clone)]
pub enum RaceEvent {
    UnitFinished {
        name: &'static str,
        elapsed: Duration,
        completed: usize,
    },
    VisualProgress {
        name: &'static str,
        percent: f64,
    },
    RaceFinished(Box<RaceReport>),
}

/// Forwards every callback into an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<RaceEvent>,
}

impl ChannelSink {
    /// Create a sink together with the receiving end
    pub fn channel() -> (Self, UnboundedReceiver<RaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: RaceEvent) {
        // A closed receiver means the front end went away; the race still runs.
        if self.tx.send(event).is_err() {
            tracing::trace!("Race event dropped, receiver closed");
        }
    }
}

impl UnitProgressSink for ChannelSink {
    fn on_unit_progress(&self, name: &'static str, elapsed: Duration, completed: usize) {
        self.send(RaceEvent::UnitFinished {
            name,
            elapsed,
            completed,
        });
    }
}

impl RaceCompleteSink for ChannelSink {
    fn on_race_complete(&self, report: &RaceReport) {
        self.send(RaceEvent::RaceFinished(Box::new(report.clone())));
    }
}

impl VisualProgressSink for ChannelSink {
    fn on_visual_progress(&self, name: &'static str, percent: f64) {
        self.send(RaceEvent::VisualProgress { name, percent });
    }
}
