//! # Focusroom Core Library
//!
//! This library provides the core logic of the Focusroom adaptive focus
//! timer. The CLI is a thin host over the same library: it drives the
//! countdown and renders the events it produces.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine cycling Work, Short Break
//!   and Long Break; the caller invokes `tick()` once per elapsed second
//! - **Focus Timer**: The engine wired to its collaborators; runs the
//!   end-of-interval sequence (classify, record, adapt, notify, advance)
//! - **Duration Adapter**: Pure recomputation of interval lengths from the
//!   cumulative share of focused sessions
//! - **Ports**: Async traits for the preference store, session log, focus
//!   classifier and notifier
//! - **Storage**: SQLite-backed session log and preference store, TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: Adaptive timer with fallbacks for every collaborator
//! - [`TimerEngine`]: Core countdown state machine
//! - [`adapt()`]: Duration adaptation
//! - [`Database`]: Local session log and preference store
//! - [`Config`]: Application configuration management

pub mod adapt;
pub mod classifier;
pub mod error;
pub mod events;
pub mod ports;
pub mod session;
pub mod settings;
pub mod signal;
pub mod storage;
pub mod timer;

pub use adapt::{adapt, Adaptation};
pub use error::{AdapterError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, VerdictSource};
pub use ports::{Adapters, FocusClassifier, Notifier, Permission, PreferenceStore, SessionLog};
pub use session::{FocusVerdict, HistoryStats, SessionRecord};
pub use settings::{DurationSettings, Preferences, StoredPreferences};
pub use signal::SignalWindow;
pub use storage::{Config, Database};
pub use timer::{FocusTimer, IntervalOutcome, TimerEngine, TimerMode, TimerState};
