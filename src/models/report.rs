//! Ranking and final report models

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::RaceMode;

/// One ranking position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub name: &'static str,
    /// Wall-clock time of the algorithm call alone
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// An algorithm that did not complete normally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFault {
    pub name: &'static str,
    pub message: String,
}

/// Outcome of one finished race
#[derive(Debug, Clone, Serialize)]
pub struct RaceReport {
    pub race_id: Uuid,
    pub mode: RaceMode,
    pub input_len: usize,
    pub target: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Completed algorithms, fastest first
    pub ranking: Vec<RankEntry>,
    pub faults: Vec<UnitFault>,
    /// Resident memory after the race minus before, in megabytes
    pub memory_delta_mb: f64,
}

impl RaceReport {
    /// Fastest completed algorithm
    pub fn winner(&self) -> Option<&RankEntry> {
        self.ranking.first()
    }

    /// 1-based ranking position of an algorithm
    pub fn position(&self, name: &str) -> Option<usize> {
        self.ranking
            .iter()
            .position(|entry| entry.name == name)
            .map(|index| index + 1)
    }

    /// Whether every algorithm completed normally
    pub fn is_complete(&self) -> bool {
        self.faults.is_empty()
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_nanos() as f64 / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RaceReport {
        RaceReport {
            race_id: Uuid::new_v4(),
            mode: RaceMode::SortAll,
            input_len: 6,
            target: None,
            started_at: Utc::now(),
            finished_at: Utc::now(),
            ranking: vec![
                RankEntry {
                    name: "Quick Sort",
                    elapsed: Duration::from_micros(1500),
                },
                RankEntry {
                    name: "Bubble Sort",
                    elapsed: Duration::from_millis(3),
                },
            ],
            faults: vec![],
            memory_delta_mb: 0.25,
        }
    }

    #[test]
    fn test_winner_and_position() {
        let report = sample_report();
        assert_eq!(report.winner().map(|e| e.name), Some("Quick Sort"));
        assert_eq!(report.position("Bubble Sort"), Some(2));
        assert_eq!(report.position("Insertion Sort"), None);
        assert!(report.is_complete());
    }

    #[test]
    fn test_report_serialization() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["mode"], "sort_all");
        assert_eq!(json["ranking"][0]["name"], "Quick Sort");
        assert_eq!(json["ranking"][0]["elapsed_ms"], 1.5);
        assert_eq!(json["memory_delta_mb"], 0.25);
        assert!(json["target"].is_null());
    }
}
