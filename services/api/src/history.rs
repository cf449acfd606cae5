use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::views::{round2, PredictionView};

/// One served prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct HistoryEntry {
    pub(crate) recorded_at: DateTime<Utc>,
    pub(crate) prediction: PredictionView,
}

/// Aggregates over the retained entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct HistoryStats {
    pub(crate) total: usize,
    pub(crate) approved: usize,
    pub(crate) rejected: usize,
    /// Percentage of retained predictions that were approved.
    pub(crate) approval_rate: f64,
    pub(crate) average_risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct HistoryView {
    pub(crate) stats: HistoryStats,
    /// Newest first.
    pub(crate) entries: Vec<HistoryEntry>,
}

/// Rolling window of the most recent predictions served by this process.
#[derive(Debug)]
pub(crate) struct PredictionHistory {
    limit: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl PredictionHistory {
    pub(crate) fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            entries: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    pub(crate) fn record(&self, prediction: &PredictionView) {
        self.record_at(Utc::now(), prediction);
    }

    pub(crate) fn record_at(&self, recorded_at: DateTime<Utc>, prediction: &PredictionView) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(HistoryEntry {
            recorded_at,
            prediction: prediction.clone(),
        });
        entries.truncate(self.limit);
    }

    pub(crate) fn snapshot(&self) -> HistoryView {
        let entries: Vec<HistoryEntry> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();

        HistoryView {
            stats: stats(&entries),
            entries,
        }
    }
}

fn stats(entries: &[HistoryEntry]) -> HistoryStats {
    let total = entries.len();
    let approved = entries
        .iter()
        .filter(|entry| entry.prediction.eligible)
        .count();

    let (approval_rate, average_risk_score) = if total == 0 {
        (0.0, 0.0)
    } else {
        let risk_sum: f64 = entries
            .iter()
            .map(|entry| entry.prediction.risk_score)
            .sum();
        (
            round2(approved as f64 / total as f64 * 100.0),
            round2(risk_sum / total as f64),
        )
    };

    HistoryStats {
        total,
        approved,
        rejected: total - approved,
        approval_rate,
        average_risk_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn prediction(eligible: bool, risk_score: f64) -> PredictionView {
        PredictionView {
            eligible,
            confidence: 70.0,
            risk_score,
            risk_category: "Low Risk".to_string(),
            monthly_emi: 1_000.0,
            disposable_income: 5_000.0,
            debt_to_income: 30.0,
            tips: vec!["tip".to_string()],
            recommendations: Vec::new(),
            decline_reasons: Vec::new(),
        }
    }

    #[test]
    fn empty_history_reports_zeroes() {
        let view = PredictionHistory::new(5).snapshot();

        assert!(view.entries.is_empty());
        assert_eq!(view.stats.total, 0);
        assert_eq!(view.stats.approval_rate, 0.0);
    }

    #[test]
    fn history_keeps_newest_entries_up_to_limit() {
        let history = PredictionHistory::new(2);
        for (minute, risk) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
            let at = Utc
                .with_ymd_and_hms(2025, 3, 1, 9, minute, 0)
                .single()
                .expect("valid timestamp");
            history.record_at(at, &prediction(true, risk));
        }

        let view = history.snapshot();

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].prediction.risk_score, 30.0);
        assert_eq!(view.entries[1].prediction.risk_score, 20.0);
    }

    #[test]
    fn stats_summarize_approval_rate() {
        let history = PredictionHistory::new(10);
        history.record(&prediction(true, 20.0));
        history.record(&prediction(false, 80.0));
        history.record(&prediction(true, 35.0));

        let stats = history.snapshot().stats;

        assert_eq!(stats.total, 3);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.approval_rate, 66.67);
        assert_eq!(stats.average_risk_score, 45.0);
    }
}
