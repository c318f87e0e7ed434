//! Run orchestration: wires the scheduler, collector, progress log, and
//! final report together.
mod progress;
mod runner;

pub use progress::spawn_progress_task;
pub use runner::{RunReport, run};
