use clap::Subcommand;
use focusroom_core::{adapt, Database, DurationSettings, StoredPreferences, TimerMode};
use serde::Serialize;

use super::load_timer;

#[derive(Subcommand)]
pub enum DurationsAction {
    /// Print the interval lengths the timer starts with
    Show,
    /// Store new interval lengths in minutes
    Set {
        work: f64,
        short_break: f64,
        long_break: f64,
    },
    /// Preview what the adapter derives from the recorded history
    Adapt,
}

#[derive(Serialize)]
struct DurationsView {
    #[serde(flatten)]
    settings: DurationSettings,
    work: String,
    short_break: String,
    long_break: String,
}

impl From<DurationSettings> for DurationsView {
    fn from(settings: DurationSettings) -> Self {
        Self {
            settings,
            work: settings.describe(TimerMode::Work),
            short_break: settings.describe(TimerMode::ShortBreak),
            long_break: settings.describe(TimerMode::LongBreak),
        }
    }
}

pub fn run(action: DurationsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DurationsAction::Show => {
            let timer = load_timer(None)?;
            let view = DurationsView::from(timer.settings());
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        DurationsAction::Set {
            work,
            short_break,
            long_break,
        } => {
            let settings = DurationSettings::new(work, short_break, long_break);
            settings.validate()?;

            let db = Database::open()?;
            db.merge_preferences(StoredPreferences::from_durations(&settings))?;
            if db.sessions()?.is_empty() {
                eprintln!("note: no sessions recorded yet, the timer keeps the defaults until one completes");
            }
            println!("{}", serde_json::to_string_pretty(&DurationsView::from(settings))?);
        }
        DurationsAction::Adapt => {
            let db = Database::open()?;
            match adapt(&db.sessions()?) {
                Some(adaptation) => println!("{}", serde_json::to_string_pretty(&adaptation)?),
                None => println!("no sessions recorded, durations stay as they are"),
            }
        }
    }
    Ok(())
}
