//! Operator confirmation

use std::io::{self, BufRead, Write};

/// A single yes/no question to the operator
pub trait Confirm {
  /// Block until the operator answers; true only on an explicit yes
  fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Reads the answer from stdin, no timeout
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
  fn confirm(&self, question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let stdin = io::stdin();
    read_answer(&mut stdin.lock())
  }
}

/// Read one line; end of input declines
pub fn read_answer(input: &mut impl BufRead) -> io::Result<bool> {
  let mut line = String::new();
  if input.read_line(&mut line)? == 0 {
    return Ok(false);
  }
  Ok(is_yes(&line))
}

pub fn is_yes(answer: &str) -> bool {
  matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
