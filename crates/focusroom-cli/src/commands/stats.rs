use focusroom_core::{Database, HistoryStats};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let stats = HistoryStats::from_records(&db.sessions()?);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
