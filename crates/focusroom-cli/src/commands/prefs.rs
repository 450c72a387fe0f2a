use clap::Subcommand;
use focusroom_core::{Database, StoredPreferences};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the behaviour flags as JSON
    Show,
    /// Set one flag
    Set {
        /// auto_start_breaks, auto_start_pomodoros, notifications or sound_effects
        key: String,
        /// true or false
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PrefsAction::Show => {
            let prefs = db.load_preferences()?.behavior();
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        PrefsAction::Set { key, value } => {
            let mut prefs = db.load_preferences()?.behavior();
            prefs.set(&key, value)?;
            db.merge_preferences(StoredPreferences::from_preferences(&prefs))?;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
    }
    Ok(())
}
