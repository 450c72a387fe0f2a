//! Terminal notifier.

use async_trait::async_trait;
use focusroom_core::{AdapterError, Notifier, Permission};

/// Prints notifications to stderr, next to the log output.
///
/// `notifications.enabled = false` in the config denies permission, which
/// silences the notifier even when the user preference asks for it.
pub struct ConsoleNotifier {
    enabled: bool,
}

impl ConsoleNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn notify(&self, title: &str, body: &str) -> Result<(), AdapterError> {
        eprintln!("\x07[{title}] {body}");
        Ok(())
    }
}
