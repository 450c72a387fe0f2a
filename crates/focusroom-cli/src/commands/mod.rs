pub mod config;
pub mod durations;
pub mod prefs;
pub mod sessions;
pub mod stats;
pub mod timer;

use std::sync::Arc;

use focusroom_core::{classifier, Adapters, Config, Database, FocusTimer};

use crate::notify::ConsoleNotifier;

/// Single-threaded runtime for commands that talk to the async ports.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// Wire the local database, the configured classifier and the console
/// notifier into a set of adapters.
pub(crate) fn adapters(
    config: &Config,
    db: Arc<Database>,
) -> Result<Adapters, Box<dyn std::error::Error>> {
    Ok(Adapters {
        preferences: db.clone(),
        sessions: db,
        classifier: classifier::from_config(&config.classifier)?,
        notifier: Arc::new(ConsoleNotifier::new(config.notifications.enabled)),
    })
}

/// Open the database and initialize a timer the way `timer run` would.
pub(crate) fn load_timer(seed: Option<u64>) -> Result<FocusTimer, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Arc::new(Database::open()?);
    let adapters = adapters(&config, db)?;
    Ok(runtime()?.block_on(FocusTimer::initialize_with_seed(adapters, seed)))
}
