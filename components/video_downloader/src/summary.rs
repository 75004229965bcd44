// components/video_downloader/src/summary.rs
use crate::types::Item;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded { path: PathBuf },
    /// Already recorded in the download archive
    Skipped,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub item: Item,
    pub status: OutcomeStatus,
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

/// Result of one batch, one outcome per requested item in request order
#[derive(Debug, Clone)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Summary {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            outcomes: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn record(&mut self, item: Item, status: OutcomeStatus) {
        self.outcomes.push(Outcome { item, status });
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Succeeded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Failed { .. }))
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    fn count(&self, predicate: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_status() {
        let mut summary = Summary::start();
        summary.record(
            Item::youtube("a", "https://youtu.be/a", "A"),
            OutcomeStatus::Succeeded {
                path: PathBuf::from("/videos/A.mp4"),
            },
        );
        summary.record(Item::youtube("b", "https://youtu.be/b", "B"), OutcomeStatus::Skipped);
        summary.record(
            Item::youtube("c", "https://youtu.be/c", "C"),
            OutcomeStatus::Failed {
                reason: "format unavailable".to_string(),
            },
        );
        let summary = summary.finish();

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_success());
        assert_eq!(summary.failures().next().unwrap().item.id, "c");
        assert!(summary.finished_at >= summary.started_at);
    }
}
