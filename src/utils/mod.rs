//! Shared utilities

mod logger;
mod timer;

pub use logger::init_logger;
pub use timer::Timer;
