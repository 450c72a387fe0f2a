//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads or read the clock: the host calls `tick()` once per elapsed second
//! while the timer runs.
//!
//! ## State Transitions
//!
//! ```text
//! Work ──expire──> ShortBreak (short >= long) | LongBreak (otherwise)
//! ShortBreak ──expire──> Work
//! LongBreak  ──expire──> Work
//! ```
//!
//! Each mode is either running or paused. Expiry itself (classification,
//! persistence, adaptation) is orchestrated by [`super::FocusTimer`]; this
//! type only owns the countdown and reports `TimerExpired`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::TimerMode;
use crate::events::Event;
use crate::settings::{DurationSettings, Preferences};

/// Externally observable timer state. A copy, never a live reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub running: bool,
    /// Remaining fraction of the current interval, 1.0 when freshly loaded.
    pub progress: f64,
}

impl TimerState {
    /// `MM:SS` rendering of the remaining time.
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

/// Core countdown state machine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    mode: TimerMode,
    settings: DurationSettings,
    preferences: Preferences,
    remaining_secs: u64,
    running: bool,
}

impl TimerEngine {
    /// Create an engine in Work mode, paused, with the full work duration
    /// loaded.
    pub fn new(settings: DurationSettings, preferences: Preferences) -> Self {
        Self {
            mode: TimerMode::Work,
            remaining_secs: settings.duration_secs(TimerMode::Work),
            settings,
            preferences,
            running: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn settings(&self) -> &DurationSettings {
        &self.settings
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Full length of the current mode in seconds.
    pub fn full_secs(&self) -> u64 {
        self.settings.duration_secs(self.mode)
    }

    pub fn progress(&self) -> f64 {
        let full = self.full_secs();
        if full == 0 {
            return 0.0;
        }
        (self.remaining_secs as f64 / full as f64).clamp(0.0, 1.0)
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            running: self.running,
            progress: self.progress(),
        }
    }

    /// Mode the cycle moves to after the current one expires.
    ///
    /// Work always goes to ShortBreak when the short break is at least as
    /// long as the long break, LongBreak otherwise; the count of completed
    /// work intervals plays no part.
    pub fn next_mode(&self) -> TimerMode {
        match self.mode {
            TimerMode::Work => {
                if self.settings.short_break_minutes >= self.settings.long_break_minutes {
                    TimerMode::ShortBreak
                } else {
                    TimerMode::LongBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            settings: self.settings,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Reload the full duration of the current mode and pause.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.reload();
        Event::TimerReset {
            mode: self.mode,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::TimerExpired)` on the tick that leaves the
    /// running timer at zero (or on any tick while a running timer already
    /// sits at zero). The engine stays running until the caller pauses it.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        if self.remaining_secs == 0 {
            return Some(Event::TimerExpired {
                mode: self.mode,
                at: Utc::now(),
            });
        }
        None
    }

    /// Switch mode and load its full duration.
    ///
    /// A manual switch always leaves the timer paused. An automatic switch
    /// (the cycle advancing) runs the new interval if the matching
    /// auto-start preference is on.
    pub fn set_mode(&mut self, mode: TimerMode, manual: bool) -> Event {
        let from = self.mode;
        self.mode = mode;
        self.reload();
        self.running = if manual {
            false
        } else {
            match mode {
                TimerMode::Work => self.preferences.auto_start_pomodoros,
                TimerMode::ShortBreak | TimerMode::LongBreak => self.preferences.auto_start_breaks,
            }
        };
        Event::ModeChanged {
            from,
            to: mode,
            manual,
            running: self.running,
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Replace interval lengths. Always pauses and reloads the current mode.
    pub fn update_durations(&mut self, settings: DurationSettings) -> Event {
        self.settings = settings;
        self.running = false;
        self.reload();
        Event::DurationsUpdated {
            settings,
            at: Utc::now(),
        }
    }

    /// Install adapted lengths and reload the current mode without touching
    /// the run state.
    pub(crate) fn apply_adapted(&mut self, settings: DurationSettings) {
        self.settings = settings;
        self.reload();
    }

    pub(crate) fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reload(&mut self) {
        self.remaining_secs = self.full_secs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TimerEngine {
        TimerEngine::new(DurationSettings::default(), Preferences::default())
    }

    fn tiny() -> DurationSettings {
        // 3s / 1s / 2s
        DurationSettings::new(0.05, 1.0 / 60.0, 2.0 / 60.0)
    }

    #[test]
    fn starts_paused_in_work_with_full_duration() {
        let e = engine();
        let s = e.state();
        assert_eq!(s.mode, TimerMode::Work);
        assert_eq!(s.remaining_secs, 25 * 60);
        assert!(!s.running);
        assert_eq!(s.progress, 1.0);
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut e = engine();
        assert!(e.start().is_some());
        assert!(e.start().is_none());
        assert!(e.is_running());
        assert!(e.pause().is_some());
        assert!(e.pause().is_none());
        assert!(!e.is_running());
    }

    #[test]
    fn tick_does_nothing_while_paused() {
        let mut e = engine();
        assert!(e.tick().is_none());
        assert_eq!(e.remaining_secs(), 25 * 60);
    }

    #[test]
    fn tick_decrements_and_updates_progress() {
        let mut e = TimerEngine::new(DurationSettings::new(0.1, 1.0, 1.0), Preferences::default());
        e.start();
        e.tick();
        e.tick();
        e.tick();
        let s = e.state();
        assert_eq!(s.remaining_secs, 3);
        assert!((s.progress - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expiry_fires_on_the_last_tick_only() {
        let mut e = TimerEngine::new(tiny(), Preferences::default());
        e.start();
        assert!(e.tick().is_none());
        assert!(e.tick().is_none());
        assert!(matches!(
            e.tick(),
            Some(Event::TimerExpired { mode: TimerMode::Work, .. })
        ));
        assert_eq!(e.remaining_secs(), 0);
        assert_eq!(e.progress(), 0.0);
    }

    #[test]
    fn reset_reloads_without_changing_mode() {
        let mut e = engine();
        e.set_mode(TimerMode::LongBreak, true);
        e.start();
        e.tick();
        e.reset();
        let s = e.state();
        assert_eq!(s.mode, TimerMode::LongBreak);
        assert_eq!(s.remaining_secs, 15 * 60);
        assert!(!s.running);
    }

    #[test]
    fn manual_mode_switch_is_always_paused() {
        let prefs = Preferences {
            auto_start_breaks: true,
            auto_start_pomodoros: true,
            ..Preferences::default()
        };
        let mut e = TimerEngine::new(DurationSettings::default(), prefs);
        e.start();
        for mode in TimerMode::ALL {
            e.set_mode(mode, true);
            assert!(!e.is_running());
            assert_eq!(e.remaining_secs(), DurationSettings::default().duration_secs(mode));
        }
    }

    #[test]
    fn automatic_mode_switch_follows_auto_start_flags() {
        let prefs = Preferences {
            auto_start_breaks: true,
            auto_start_pomodoros: false,
            ..Preferences::default()
        };
        let mut e = TimerEngine::new(DurationSettings::default(), prefs);
        e.set_mode(TimerMode::ShortBreak, false);
        assert!(e.is_running());
        e.set_mode(TimerMode::LongBreak, false);
        assert!(e.is_running());
        e.set_mode(TimerMode::Work, false);
        assert!(!e.is_running());
    }

    #[test]
    fn next_mode_after_work_compares_break_lengths() {
        let mut e = engine();
        assert_eq!(e.next_mode(), TimerMode::LongBreak);

        e.update_durations(DurationSettings::new(25.0, 10.0, 10.0));
        assert_eq!(e.next_mode(), TimerMode::ShortBreak);

        e.set_mode(TimerMode::ShortBreak, true);
        assert_eq!(e.next_mode(), TimerMode::Work);
        e.set_mode(TimerMode::LongBreak, true);
        assert_eq!(e.next_mode(), TimerMode::Work);
    }

    #[test]
    fn update_durations_pauses_and_reloads() {
        let mut e = engine();
        e.start();
        e.tick();
        e.update_durations(DurationSettings::new(30.0, 6.0, 18.0));
        assert!(!e.is_running());
        assert_eq!(e.remaining_secs(), 30 * 60);
        assert_eq!(e.progress(), 1.0);
    }

    #[test]
    fn format_remaining_pads() {
        let state = TimerState {
            mode: TimerMode::Work,
            remaining_secs: 9 * 60 + 5,
            running: false,
            progress: 1.0,
        };
        assert_eq!(state.format_remaining(), "09:05");
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let e = engine();
        match e.snapshot() {
            Event::StateSnapshot { state, settings, .. } => {
                assert_eq!(state.mode, TimerMode::Work);
                assert_eq!(state.remaining_secs, 25 * 60);
                assert_eq!(settings, DurationSettings::default());
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
