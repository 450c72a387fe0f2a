//! Duration adaptation from cumulative focus history.
//!
//! The work length moves linearly with the share of focused sessions across
//! the *entire* history: 50% focused keeps the 25 minute baseline, each
//! percentage point above or below shifts it by 0.2 minutes, clamped to
//! 15..=35. Breaks are derived from the work length (1/5 and 3/5). Because
//! every record ever written counts, the estimate converges slowly rather
//! than tracking a recent window.

use serde::{Deserialize, Serialize};

use crate::session::{FocusVerdict, SessionRecord};
use crate::settings::DurationSettings;

pub const BASELINE_WORK_MINUTES: f64 = 25.0;
/// Minutes of swing between an all-unfocused and an all-focused history.
pub const SENSITIVITY_MINUTES: f64 = 20.0;
pub const MIN_WORK_MINUTES: f64 = 15.0;
pub const MAX_WORK_MINUTES: f64 = 35.0;

/// Outcome of a successful adaptation, with the figures it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adaptation {
    pub focused: usize,
    pub total: usize,
    pub ratio: f64,
    pub settings: DurationSettings,
}

/// Recompute interval lengths from `history`.
///
/// Returns `None` for an empty history; the caller keeps what it has.
pub fn adapt(history: &[SessionRecord]) -> Option<Adaptation> {
    let total = history.len();
    if total == 0 {
        return None;
    }
    let focused = history
        .iter()
        .filter(|r| r.result == FocusVerdict::Focused)
        .count();
    let ratio = focused as f64 / total as f64;

    let raw_work = round2(BASELINE_WORK_MINUTES + (ratio - 0.5) * SENSITIVITY_MINUTES);
    let work = raw_work.clamp(MIN_WORK_MINUTES, MAX_WORK_MINUTES);

    Some(Adaptation {
        focused,
        total,
        ratio,
        settings: derive_from_work(work),
    })
}

/// Break lengths implied by a work length.
pub fn derive_from_work(work_minutes: f64) -> DurationSettings {
    DurationSettings {
        work_minutes,
        short_break_minutes: round2(work_minutes / 5.0),
        long_break_minutes: round2(work_minutes * 3.0 / 5.0),
    }
}

/// Round to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn history(focused: usize, unfocused: usize) -> Vec<SessionRecord> {
        let mut records = Vec::with_capacity(focused + unfocused);
        records.extend((0..focused).map(|_| SessionRecord::new(FocusVerdict::Focused, 1500)));
        records.extend((0..unfocused).map(|_| SessionRecord::new(FocusVerdict::Unfocused, 1500)));
        records
    }

    #[test]
    fn empty_history_is_no_change() {
        assert!(adapt(&[]).is_none());
    }

    #[test]
    fn all_focused_hits_the_ceiling() {
        let a = adapt(&history(4, 0)).unwrap();
        assert_eq!(a.settings, DurationSettings::new(35.0, 7.0, 21.0));
        assert_eq!(a.ratio, 1.0);
    }

    #[test]
    fn all_unfocused_hits_the_floor() {
        let a = adapt(&history(0, 3)).unwrap();
        assert_eq!(a.settings, DurationSettings::new(15.0, 3.0, 9.0));
    }

    #[test]
    fn even_split_keeps_the_baseline() {
        let a = adapt(&history(2, 2)).unwrap();
        assert_eq!(a.settings, DurationSettings::default());
        assert_eq!((a.focused, a.total), (2, 4));
    }

    #[test]
    fn thirds_round_to_two_decimals() {
        // 25 + (1/3 - 0.5) * 20 = 21.666..
        let a = adapt(&history(1, 2)).unwrap();
        assert_eq!(a.settings.work_minutes, 21.67);
        assert_eq!(a.settings.short_break_minutes, 4.33);
        assert_eq!(a.settings.long_break_minutes, 13.0);
    }

    #[test]
    fn order_of_history_does_not_matter() {
        let mut records = history(3, 5);
        let forward = adapt(&records).unwrap();
        records.reverse();
        assert_eq!(adapt(&records).unwrap(), forward);
    }

    proptest! {
        #[test]
        fn work_stays_within_bounds(focused in 0usize..200, unfocused in 0usize..200) {
            prop_assume!(focused + unfocused > 0);
            let a = adapt(&history(focused, unfocused)).unwrap();
            prop_assert!(a.settings.work_minutes >= MIN_WORK_MINUTES);
            prop_assert!(a.settings.work_minutes <= MAX_WORK_MINUTES);
        }

        #[test]
        fn breaks_are_derived_from_work(focused in 0usize..200, unfocused in 0usize..200) {
            prop_assume!(focused + unfocused > 0);
            let s = adapt(&history(focused, unfocused)).unwrap().settings;
            prop_assert_eq!(s.short_break_minutes, round2(s.work_minutes / 5.0));
            prop_assert_eq!(s.long_break_minutes, round2(s.work_minutes * 3.0 / 5.0));
            prop_assert!(s.short_break_minutes < s.long_break_minutes);
        }

        #[test]
        fn more_focus_never_shortens_work(focused in 0usize..100, unfocused in 1usize..100) {
            let before = adapt(&history(focused, unfocused)).unwrap().settings.work_minutes;
            let after = adapt(&history(focused + 1, unfocused - 1)).unwrap().settings.work_minutes;
            prop_assert!(after >= before);
        }
    }
}
