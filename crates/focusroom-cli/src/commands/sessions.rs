use clap::Subcommand;
use focusroom_core::Database;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List completed work sessions, oldest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the whole session history
    Clear,
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SessionsAction::List { json } => {
            let sessions = db.sessions()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("No sessions recorded.");
            } else {
                for s in &sessions {
                    println!(
                        "{}  {:<9}  {:02}:{:02}",
                        s.timestamp.format("%Y-%m-%d %H:%M"),
                        s.result.as_str(),
                        s.duration_secs / 60,
                        s.duration_secs % 60
                    );
                }
            }
        }
        SessionsAction::Clear => {
            let removed = db.clear_sessions()?;
            println!("removed {removed} sessions");
        }
    }
    Ok(())
}
