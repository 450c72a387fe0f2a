//! Ports to the external collaborators the timer depends on.
//!
//! Transport and storage mechanics live behind these traits. Every call may
//! fail; the timer treats each failure as transient and falls back.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::session::{FocusVerdict, SessionRecord};
use crate::settings::StoredPreferences;
use crate::signal::SignalWindow;

/// User-level duration and behaviour preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn fetch_preferences(&self) -> Result<StoredPreferences, AdapterError>;

    /// Write the populated fields of `update`, leaving the rest as stored.
    async fn update_preferences(&self, update: StoredPreferences) -> Result<(), AdapterError>;
}

/// Append-only log of completed work intervals.
#[async_trait]
pub trait SessionLog: Send + Sync {
    async fn fetch_history(&self) -> Result<Vec<SessionRecord>, AdapterError>;

    async fn append_session(
        &self,
        result: FocusVerdict,
        duration_secs: u64,
    ) -> Result<(), AdapterError>;
}

/// Binary focus classification of a sample window.
#[async_trait]
pub trait FocusClassifier: Send + Sync {
    async fn classify(&self, sample: &SignalWindow) -> Result<FocusVerdict, AdapterError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; asking may still grant it.
    Default,
}

/// User-facing notifications. Best-effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    /// Ask the user once. Returns the permission after the prompt.
    ///
    /// The timer calls this on every completed work interval while permission
    /// is not granted. Hosts should return a stored denial without prompting
    /// again.
    async fn request_permission(&self) -> Permission {
        self.permission()
    }

    async fn notify(&self, title: &str, body: &str) -> Result<(), AdapterError>;
}

/// The collaborators a [`crate::timer::FocusTimer`] talks to.
#[derive(Clone)]
pub struct Adapters {
    pub preferences: Arc<dyn PreferenceStore>,
    pub sessions: Arc<dyn SessionLog>,
    pub classifier: Arc<dyn FocusClassifier>,
    pub notifier: Arc<dyn Notifier>,
}
