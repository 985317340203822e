use chrono::{DateTime, Local};
use serde::Serialize;

/// Result of typing a single verse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub verse_number: u32,
    pub elapsed_secs: u64,
    pub matched: bool,
}

/// Running totals for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTotals {
    pub total_verses: u32,
    pub successes: u32,
    pub total_secs: u64,
    pub successful_secs: u64,
}

impl SessionTotals {
    fn record(&mut self, attempt: &Attempt) {
        self.total_verses += 1;
        self.total_secs += attempt.elapsed_secs;
        if attempt.matched {
            self.successes += 1;
            self.successful_secs += attempt.elapsed_secs;
        }
    }
}

/// Folds attempts into chapter totals, in the order they are delivered
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    totals: SessionTotals,
    started_at: DateTime<Local>,
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self {
            totals: SessionTotals::default(),
            started_at: Local::now(),
        }
    }

    pub fn record(&mut self, attempt: &Attempt) {
        self.totals.record(attempt);
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    /// Freeze the totals into a report.
    /// `completed` is false when input ended before the last verse.
    pub fn finish(self, verses_in_chapter: usize, completed: bool) -> SessionReport {
        SessionReport {
            totals: self.totals,
            verses_in_chapter,
            completed,
            started_at: self.started_at,
            passage: None,
        }
    }
}

/// Final, read-only summary of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    #[serde(flatten)]
    pub totals: SessionTotals,
    pub verses_in_chapter: usize,
    pub completed: bool,
    pub started_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
}

impl SessionReport {
    pub fn with_passage(mut self, passage: impl Into<String>) -> Self {
        self.passage = Some(passage.into());
        self
    }

    /// Share of attempted verses typed exactly, as a rounded percentage
    pub fn accuracy(&self) -> f64 {
        if self.totals.total_verses == 0 {
            return 0.0;
        }
        ((self.totals.successes as f64 / self.totals.total_verses as f64) * 100.0).round()
    }

    pub fn average_secs(&self) -> Option<f64> {
        match self.totals.total_verses {
            0 => None,
            n => Some(self.totals.total_secs as f64 / n as f64),
        }
    }
}
