use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::FocusVerdict;
use crate::settings::DurationSettings;
use crate::timer::{TimerMode, TimerState};

/// Where a work interval's verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictSource {
    Classifier,
    /// Classifier failed; the verdict is a coin flip.
    Fallback,
}

/// Every state change of the timer produces an Event.
/// Hosts drain them after each command; presentation renders from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero while running.
    TimerExpired {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: TimerMode,
        to: TimerMode,
        manual: bool,
        running: bool,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    DurationsUpdated {
        settings: DurationSettings,
        at: DateTime<Utc>,
    },
    /// End-of-interval sequence finished for `mode`.
    IntervalCompleted {
        mode: TimerMode,
        duration_secs: u64,
        verdict: Option<FocusVerdict>,
        verdict_source: Option<VerdictSource>,
        at: DateTime<Utc>,
    },
    DurationsAdapted {
        focused: usize,
        total: usize,
        ratio: f64,
        settings: DurationSettings,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        settings: DurationSettings,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::TimerExpired {
            mode: TimerMode::ShortBreak,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerExpired");
        assert_eq!(json["mode"], "short_break");
    }
}
