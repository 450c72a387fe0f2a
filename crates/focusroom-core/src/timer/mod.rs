mod engine;
mod focus_timer;
mod mode;

pub use engine::{TimerEngine, TimerState};
pub use focus_timer::{FocusTimer, IntervalOutcome, NOTIFICATION_TITLE};
pub use mode::TimerMode;
