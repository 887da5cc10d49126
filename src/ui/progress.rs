//! Progress indicator for the manifest scan
//!
//! Uses `linya` for allocation-free progress bars. Nothing is drawn when
//! stderr is not a terminal (CI logs, captured test output).

use linya::{Bar, Progress};
use std::io::IsTerminal;

/// Progress bar over a fixed number of files
pub struct FileProgress {
  inner: Option<(Progress, Bar)>,
}

impl FileProgress {
  /// Create a new progress bar for `total` files
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let inner = (total > 0 && std::io::stderr().is_terminal()).then(|| {
      let mut progress = Progress::new();
      let bar = progress.bar(total, label.into());
      (progress, bar)
    });
    Self { inner }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    if let Some((progress, bar)) = self.inner.as_mut() {
      progress.inc_and_draw(bar, 1);
    }
  }
}
