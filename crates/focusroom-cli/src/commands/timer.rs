use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use focusroom_core::{Config, Database, Event, FocusTimer, TimerMode};
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::{adapters, load_timer, runtime};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, printing one JSON event per line
    ///
    /// Stops once the timer comes to rest (an interval ends and the next one
    /// does not auto-start) or after --max-intervals completed intervals.
    Run {
        /// Tick period in milliseconds (defaults to timer.tick_interval_ms)
        #[arg(long)]
        tick_ms: Option<u64>,
        /// Stop after this many completed intervals
        #[arg(long)]
        max_intervals: Option<u32>,
        /// Start in this mode instead of work (work, short-break, long-break)
        #[arg(long)]
        mode: Option<TimerMode>,
        /// Seed for the fallback verdict and the sample window
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the state a freshly started timer would have, as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            tick_ms,
            max_intervals,
            mode,
            seed,
        } => {
            let config = Config::load_or_default();
            let tick_ms = tick_ms.unwrap_or(config.timer.tick_interval_ms).max(1);
            let period = Duration::from_millis(tick_ms);
            let db = Arc::new(Database::open()?);
            let adapters = adapters(&config, db)?;

            runtime()?.block_on(async {
                let mut timer = FocusTimer::initialize_with_seed(adapters, seed).await;
                if let Some(mode) = mode {
                    timer.set_mode(mode, true);
                }
                drive(&mut timer, period, max_intervals).await
            })
        }
        TimerAction::Status => {
            let timer = load_timer(None)?;
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            Ok(())
        }
    }
}

async fn drive(
    timer: &mut FocusTimer,
    period: Duration,
    max_intervals: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    timer.start();
    emit(&timer.snapshot())?;
    flush(timer)?;

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let mut completed = 0u32;
    loop {
        ticker.tick().await;
        let outcome = timer.tick().await;
        flush(timer)?;

        let Some(outcome) = outcome else {
            continue;
        };
        completed += 1;
        info!(
            completed,
            mode = %outcome.completed,
            next = %outcome.next,
            next_length = %timer.settings().describe(outcome.next),
            "interval done"
        );

        if max_intervals.is_some_and(|max| completed >= max) {
            break;
        }
        if !timer.state().running {
            break;
        }
    }

    emit(&timer.snapshot())?;
    Ok(())
}

fn flush(timer: &mut FocusTimer) -> Result<(), serde_json::Error> {
    for event in timer.drain_events() {
        emit(&event)?;
    }
    Ok(())
}

fn emit(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
