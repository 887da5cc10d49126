//! Diagnostic logging setup
//!
//! Status lines go to stdout via `println!`; tracing events go to stderr and
//! are filtered by `RELEASE_ME_LOG` (EnvFilter syntax).

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "RELEASE_ME_LOG";

/// Install the global subscriber; only the first call takes effect
pub fn init_tracing(verbose: bool) {
  let level = if verbose { Level::DEBUG } else { Level::WARN };
  let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .try_init()
    .ok();
}
