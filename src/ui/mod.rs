//! Terminal interaction: logging, progress bars and the confirmation prompt

pub mod logging;
pub mod progress;
pub mod prompt;
