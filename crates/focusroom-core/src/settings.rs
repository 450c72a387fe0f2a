//! Interval lengths and user behaviour preferences.
//!
//! [`StoredPreferences`] is the loose, partially-populated shape the
//! preference store hands back. [`DurationSettings`] and [`Preferences`] are
//! the resolved values the engine works with, with documented defaults
//! substituted for anything missing or malformed.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerMode;

pub const DEFAULT_WORK_MINUTES: f64 = 25.0;
pub const DEFAULT_SHORT_BREAK_MINUTES: f64 = 5.0;
pub const DEFAULT_LONG_BREAK_MINUTES: f64 = 15.0;

/// Interval lengths in (possibly fractional) minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationSettings {
    pub work_minutes: f64,
    pub short_break_minutes: f64,
    pub long_break_minutes: f64,
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
        }
    }
}

impl DurationSettings {
    pub fn new(work_minutes: f64, short_break_minutes: f64, long_break_minutes: f64) -> Self {
        Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
        }
    }

    pub fn minutes(&self, mode: TimerMode) -> f64 {
        match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Full length of an interval in whole seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        let secs = (self.minutes(mode) * 60.0).round();
        if secs.is_finite() && secs > 0.0 {
            secs as u64
        } else {
            0
        }
    }

    /// Reject lengths that do not amount to at least one whole second.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, mode) in [
            ("work_minutes", TimerMode::Work),
            ("short_break_minutes", TimerMode::ShortBreak),
            ("long_break_minutes", TimerMode::LongBreak),
        ] {
            if self.duration_secs(mode) == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: format!(
                        "must be at least one second, got {} minutes",
                        self.minutes(mode)
                    ),
                });
            }
        }
        Ok(())
    }

    /// Human label such as `"21 min 36 sec"`.
    pub fn describe(&self, mode: TimerMode) -> String {
        let minutes = self.minutes(mode);
        let whole = minutes.floor();
        let secs = ((minutes - whole) * 60.0).round();
        format!("{} min {} sec", whole as u64, secs as u64)
    }
}

/// Behaviour flags owned by the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub notifications: bool,
    pub sound_effects: bool,
}

impl Preferences {
    pub const NAMES: [&'static str; 4] = [
        "auto_start_breaks",
        "auto_start_pomodoros",
        "notifications",
        "sound_effects",
    ];

    /// Set a flag by name.
    ///
    /// # Errors
    /// Returns an error if `name` is not one of [`Preferences::NAMES`].
    pub fn set(&mut self, name: &str, value: bool) -> Result<(), ValidationError> {
        match name {
            "auto_start_breaks" => self.auto_start_breaks = value,
            "auto_start_pomodoros" => self.auto_start_pomodoros = value,
            "notifications" => self.notifications = value,
            "sound_effects" => self.sound_effects = value,
            other => return Err(ValidationError::UnknownPreference(other.to_string())),
        }
        Ok(())
    }
}

/// Preferences as persisted by the preference store.
///
/// Every field is optional: reads may come back partially populated and
/// updates only carry the fields being changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_breaks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_pomodoros: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_effects: Option<bool>,
}

impl StoredPreferences {
    /// A partial update carrying only interval lengths.
    pub fn from_durations(settings: &DurationSettings) -> Self {
        Self {
            focus_duration: Some(settings.work_minutes),
            short_break_duration: Some(settings.short_break_minutes),
            long_break_duration: Some(settings.long_break_minutes),
            ..Self::default()
        }
    }

    /// A partial update carrying only behaviour flags.
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            auto_start_breaks: Some(prefs.auto_start_breaks),
            auto_start_pomodoros: Some(prefs.auto_start_pomodoros),
            notifications: Some(prefs.notifications),
            sound_effects: Some(prefs.sound_effects),
            ..Self::default()
        }
    }

    /// Overlay the populated fields of `update` onto `self`.
    pub fn merge(&mut self, update: StoredPreferences) {
        overlay(&mut self.focus_duration, update.focus_duration);
        overlay(&mut self.short_break_duration, update.short_break_duration);
        overlay(&mut self.long_break_duration, update.long_break_duration);
        overlay(&mut self.auto_start_breaks, update.auto_start_breaks);
        overlay(&mut self.auto_start_pomodoros, update.auto_start_pomodoros);
        overlay(&mut self.notifications, update.notifications);
        overlay(&mut self.sound_effects, update.sound_effects);
    }

    /// Resolved interval lengths; missing or malformed fields take defaults.
    pub fn durations(&self) -> DurationSettings {
        DurationSettings {
            work_minutes: usable_minutes(self.focus_duration, DEFAULT_WORK_MINUTES),
            short_break_minutes: usable_minutes(
                self.short_break_duration,
                DEFAULT_SHORT_BREAK_MINUTES,
            ),
            long_break_minutes: usable_minutes(
                self.long_break_duration,
                DEFAULT_LONG_BREAK_MINUTES,
            ),
        }
    }

    /// Resolved behaviour flags; missing flags are off.
    pub fn behavior(&self) -> Preferences {
        Preferences {
            auto_start_breaks: self.auto_start_breaks.unwrap_or(false),
            auto_start_pomodoros: self.auto_start_pomodoros.unwrap_or(false),
            notifications: self.notifications.unwrap_or(false),
            sound_effects: self.sound_effects.unwrap_or(false),
        }
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn usable_minutes(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && (v * 60.0).round() >= 1.0 => v,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_25_5_15() {
        let s = DurationSettings::default();
        assert_eq!(s.duration_secs(TimerMode::Work), 25 * 60);
        assert_eq!(s.duration_secs(TimerMode::ShortBreak), 5 * 60);
        assert_eq!(s.duration_secs(TimerMode::LongBreak), 15 * 60);
    }

    #[test]
    fn fractional_minutes_round_to_whole_seconds() {
        let s = DurationSettings::new(25.01, 5.0, 15.0);
        assert_eq!(s.duration_secs(TimerMode::Work), 1501);
    }

    #[test]
    fn describe_splits_minutes_and_seconds() {
        let s = DurationSettings::new(21.6, 4.32, 12.96);
        assert_eq!(s.describe(TimerMode::Work), "21 min 36 sec");
        assert_eq!(s.describe(TimerMode::ShortBreak), "4 min 19 sec");
    }

    #[test]
    fn validate_rejects_zero_and_nan() {
        assert!(DurationSettings::new(0.0, 5.0, 15.0).validate().is_err());
        assert!(DurationSettings::new(25.0, f64::NAN, 15.0).validate().is_err());
        assert!(DurationSettings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_lengths_under_one_second() {
        let s = DurationSettings::new(0.001, 0.001, 0.001);
        assert_eq!(s.duration_secs(TimerMode::Work), 0);
        assert!(matches!(
            s.validate(),
            Err(ValidationError::InvalidValue { ref field, .. }) if field == "work_minutes"
        ));
        assert!(DurationSettings::new(25.0, 5.0, 0.008).validate().is_err());
        // 0.6 s rounds up to one second.
        assert!(DurationSettings::new(25.0, 5.0, 0.01).validate().is_ok());
    }

    #[test]
    fn sub_second_stored_lengths_fall_back() {
        let stored = StoredPreferences {
            focus_duration: Some(0.001),
            ..StoredPreferences::default()
        };
        assert_eq!(stored.durations().work_minutes, DEFAULT_WORK_MINUTES);
    }

    #[test]
    fn stored_durations_fall_back_per_field() {
        let stored = StoredPreferences {
            focus_duration: Some(30.0),
            short_break_duration: Some(0.0),
            ..StoredPreferences::default()
        };
        let s = stored.durations();
        assert_eq!(s.work_minutes, 30.0);
        assert_eq!(s.short_break_minutes, DEFAULT_SHORT_BREAK_MINUTES);
        assert_eq!(s.long_break_minutes, DEFAULT_LONG_BREAK_MINUTES);
    }

    #[test]
    fn merge_keeps_fields_the_update_does_not_carry() {
        let mut stored = StoredPreferences {
            notifications: Some(true),
            focus_duration: Some(20.0),
            ..StoredPreferences::default()
        };
        stored.merge(StoredPreferences::from_durations(&DurationSettings::new(
            31.0, 6.2, 18.6,
        )));
        assert_eq!(stored.notifications, Some(true));
        assert_eq!(stored.focus_duration, Some(31.0));
        assert_eq!(stored.long_break_duration, Some(18.6));
    }

    #[test]
    fn partial_json_deserializes() {
        let stored: StoredPreferences =
            serde_json::from_str(r#"{"auto_start_breaks": true}"#).unwrap();
        assert!(stored.behavior().auto_start_breaks);
        assert!(!stored.behavior().notifications);
        assert_eq!(stored.durations(), DurationSettings::default());
    }

    #[test]
    fn set_rejects_unknown_names() {
        let mut prefs = Preferences::default();
        prefs.set("notifications", true).unwrap();
        assert!(prefs.notifications);
        assert!(prefs.set("dark_mode", true).is_err());
    }
}
