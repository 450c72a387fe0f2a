//! Completed work-interval records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Binary classification of a completed work interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusVerdict {
    Focused,
    Unfocused,
}

impl FocusVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusVerdict::Focused => "focused",
            FocusVerdict::Unfocused => "unfocused",
        }
    }

    /// Unweighted coin flip, used when no classifier verdict is available.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            FocusVerdict::Focused
        } else {
            FocusVerdict::Unfocused
        }
    }
}

impl fmt::Display for FocusVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FocusVerdict {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focused" => Ok(FocusVerdict::Focused),
            "unfocused" => Ok(FocusVerdict::Unfocused),
            other => Err(ValidationError::InvalidValue {
                field: "result".into(),
                message: format!("expected 'focused' or 'unfocused', got '{other}'"),
            }),
        }
    }
}

/// One completed work interval. Never edited once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub result: FocusVerdict,
    pub duration_secs: u64,
    pub timestamp: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(result: FocusVerdict, duration_secs: u64) -> Self {
        Self {
            result,
            duration_secs,
            timestamp: Utc::now(),
        }
    }
}

/// Aggregate figures over a session history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total_sessions: u64,
    pub focused_sessions: u64,
    /// `focused_sessions / total_sessions`, 0.0 for an empty history.
    pub focus_ratio: f64,
    pub total_focus_min: f64,
}

impl HistoryStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        let total_sessions = records.len() as u64;
        let focused_sessions = records
            .iter()
            .filter(|r| r.result == FocusVerdict::Focused)
            .count() as u64;
        let total_secs: u64 = records.iter().map(|r| r.duration_secs).sum();
        let focus_ratio = if total_sessions == 0 {
            0.0
        } else {
            focused_sessions as f64 / total_sessions as f64
        };
        Self {
            total_sessions,
            focused_sessions,
            focus_ratio,
            total_focus_min: total_secs as f64 / 60.0,
        }
    }
}
