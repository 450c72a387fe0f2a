//! Adaptive focus timer: the countdown engine wired to its collaborators.
//!
//! [`FocusTimer`] owns a [`TimerEngine`] and runs the end-of-interval
//! sequence when a work interval expires:
//!
//! 1. pause
//! 2. classify a sample window (coin flip if the classifier fails)
//! 3. append the session record
//! 4. adapt durations from the full history and persist them
//! 5. reload the current mode's duration
//! 6. notify, if the user asked for notifications
//! 7. advance the cycle
//!
//! The break that follows a work interval is picked from the lengths that
//! interval ran with, so adaptation in step 4 cannot change it.
//!
//! Break expiry jumps straight to step 7. Every step is attempted once; a
//! failing collaborator is logged and the sequence carries on, so an
//! interval always completes and the mode always advances.
//!
//! `tick()` takes `&mut self`, so expiry sequences can never overlap.

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info, warn};

use super::engine::{TimerEngine, TimerState};
use super::mode::TimerMode;
use crate::adapt::adapt;
use crate::events::{Event, VerdictSource};
use crate::ports::{Adapters, Permission};
use crate::session::FocusVerdict;
use crate::settings::{DurationSettings, Preferences, StoredPreferences};
use crate::signal::SignalWindow;

pub const NOTIFICATION_TITLE: &str = "Pomodoro done";

/// Result of one completed interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalOutcome {
    pub completed: TimerMode,
    /// Set for work intervals only.
    pub verdict: Option<FocusVerdict>,
    pub next: TimerMode,
}

pub struct FocusTimer {
    engine: TimerEngine,
    adapters: Adapters,
    rng: Mcg128Xsl64,
    events: Vec<Event>,
}

impl FocusTimer {
    /// Load preferences and history and build a paused Work timer.
    ///
    /// With an empty history the stored durations are ignored and the
    /// 25/5/15 defaults apply, so adapted values never outlive a cleared
    /// history. Fetch failures fall back to defaults.
    pub async fn initialize(adapters: Adapters) -> Self {
        Self::initialize_with_seed(adapters, None).await
    }

    /// Like [`FocusTimer::initialize`], with a fixed seed for the fallback
    /// verdict and the synthetic sample window.
    pub async fn initialize_with_seed(adapters: Adapters, seed: Option<u64>) -> Self {
        let (stored, history) = tokio::join!(
            adapters.preferences.fetch_preferences(),
            adapters.sessions.fetch_history()
        );

        let history_len = match history {
            Ok(h) => h.len(),
            Err(e) => {
                warn!(error = %e, "session history unavailable, treating as empty");
                0
            }
        };

        let (settings, preferences) = match stored {
            Ok(stored) => {
                let settings = if history_len > 0 {
                    stored.durations()
                } else {
                    DurationSettings::default()
                };
                (settings, stored.behavior())
            }
            Err(e) => {
                warn!(error = %e, "preferences unavailable, using defaults");
                (DurationSettings::default(), Preferences::default())
            }
        };

        debug!(
            history_len,
            work_minutes = settings.work_minutes,
            short_break_minutes = settings.short_break_minutes,
            long_break_minutes = settings.long_break_minutes,
            "timer initialized"
        );

        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };

        Self {
            engine: TimerEngine::new(settings, preferences),
            adapters,
            rng,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn settings(&self) -> DurationSettings {
        *self.engine.settings()
    }

    pub fn preferences(&self) -> Preferences {
        *self.engine.preferences()
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) {
        let event = self.engine.start();
        self.push_opt(event);
    }

    pub fn pause(&mut self) {
        let event = self.engine.pause();
        self.push_opt(event);
    }

    pub fn toggle(&mut self) {
        let event = self.engine.toggle();
        self.push_opt(event);
    }

    pub fn reset(&mut self) {
        let event = self.engine.reset();
        self.push(event);
    }

    pub fn set_mode(&mut self, mode: TimerMode, manual: bool) {
        let event = self.engine.set_mode(mode, manual);
        self.push(event);
    }

    /// Replace interval lengths in memory. Pauses the timer.
    ///
    /// Persisting them is the caller's business.
    pub fn update_durations(&mut self, settings: DurationSettings) {
        let event = self.engine.update_durations(settings);
        self.push(event);
    }

    /// Apply new behaviour flags and write them to the preference store.
    ///
    /// The in-memory flags apply even if the write fails.
    pub async fn update_preferences(&mut self, preferences: Preferences) {
        self.engine.set_preferences(preferences);
        if let Err(e) = self
            .adapters
            .preferences
            .update_preferences(StoredPreferences::from_preferences(&preferences))
            .await
        {
            warn!(error = %e, "failed to persist preferences");
        }
    }

    /// Advance one second. Runs the end-of-interval sequence when the
    /// countdown expires and reports what was completed.
    pub async fn tick(&mut self) -> Option<IntervalOutcome> {
        let expired = self.engine.tick()?;
        self.push(expired);
        Some(self.on_expire().await)
    }

    // ── End of interval ──────────────────────────────────────────────

    async fn on_expire(&mut self) -> IntervalOutcome {
        let completed = self.engine.mode();
        let elapsed_secs = self.engine.full_secs();
        // Chosen from the lengths the interval ran with, before adaptation.
        let next = self.engine.next_mode();
        self.pause();

        let mut verdict = None;
        let mut verdict_source = None;
        if completed == TimerMode::Work {
            let (v, source) = self.classify().await;
            verdict = Some(v);
            verdict_source = Some(source);

            if let Err(e) = self.adapters.sessions.append_session(v, elapsed_secs).await {
                warn!(error = %e, "failed to record session");
            }

            self.adapt_durations().await;
            self.notify_completion(v).await;
        }

        info!(
            mode = %completed,
            duration_secs = elapsed_secs,
            verdict = verdict.map(|v| v.as_str()).unwrap_or("-"),
            "interval completed"
        );
        self.push(Event::IntervalCompleted {
            mode: completed,
            duration_secs: elapsed_secs,
            verdict,
            verdict_source,
            at: chrono::Utc::now(),
        });

        let event = self.engine.set_mode(next, false);
        self.push(event);

        IntervalOutcome {
            completed,
            verdict,
            next,
        }
    }

    async fn classify(&mut self) -> (FocusVerdict, VerdictSource) {
        let sample = SignalWindow::synthetic(&mut self.rng);
        match self.adapters.classifier.classify(&sample).await {
            Ok(verdict) => (verdict, VerdictSource::Classifier),
            Err(e) => {
                let verdict = FocusVerdict::random(&mut self.rng);
                warn!(error = %e, %verdict, "focus classifier failed, using random verdict");
                (verdict, VerdictSource::Fallback)
            }
        }
    }

    async fn adapt_durations(&mut self) {
        let history = match self.adapters.sessions.fetch_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "session history unavailable, keeping durations");
                return;
            }
        };
        let Some(adaptation) = adapt(&history) else {
            debug!("empty history, keeping durations");
            return;
        };

        let settings = adaptation.settings;
        info!(
            focused = adaptation.focused,
            total = adaptation.total,
            ratio = adaptation.ratio,
            work_minutes = settings.work_minutes,
            short_break_minutes = settings.short_break_minutes,
            long_break_minutes = settings.long_break_minutes,
            "durations adapted"
        );
        self.engine.apply_adapted(settings);
        self.push(Event::DurationsAdapted {
            focused: adaptation.focused,
            total: adaptation.total,
            ratio: adaptation.ratio,
            settings,
            at: chrono::Utc::now(),
        });

        if let Err(e) = self
            .adapters
            .preferences
            .update_preferences(StoredPreferences::from_durations(&settings))
            .await
        {
            warn!(error = %e, "failed to persist adapted durations, keeping them for this run");
        }
    }

    async fn notify_completion(&self, verdict: FocusVerdict) {
        if !self.engine.preferences().notifications {
            return;
        }
        let notifier = &self.adapters.notifier;
        let permission = match notifier.permission() {
            Permission::Granted => Permission::Granted,
            _ => notifier.request_permission().await,
        };
        if permission != Permission::Granted {
            debug!(?permission, "notification permission not granted");
            return;
        }
        let body = format!("You were {verdict}");
        if let Err(e) = notifier.notify(NOTIFICATION_TITLE, &body).await {
            warn!(error = %e, "notification failed");
        }
    }

    fn push(&mut self, event: Event) {
        debug!(?event, "timer event");
        self.events.push(event);
    }

    fn push_opt(&mut self, event: Option<Event>) {
        if let Some(event) = event {
            self.push(event);
        }
    }
}
