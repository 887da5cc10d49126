mod changelog;
mod commands;
mod core;
mod node;
mod release;
mod ui;

use clap::Parser;
use crate::core::context::RunContext;
use crate::core::error::{ReleaseError, print_error};
use crate::core::vcs::SystemGit;
use crate::release::ReleaseTarget;

/// Release an npm package: bump, propagate, changelog, tag, publish, push
#[derive(Parser)]
#[command(name = "release-me")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Release target: major, minor, patch, draft or v<version> (e.g. v1.2.3)
  target: ReleaseTarget,

  /// Permissive mode: tolerate a drifted version macro and out-of-sync dependents
  #[arg(long)]
  dev: bool,

  /// Debug logging on stderr (overridden by RELEASE_ME_LOG)
  #[arg(short, long)]
  verbose: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  ui::logging::init_tracing(cli.verbose);

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let git = match SystemGit::open(&root) {
    Ok(git) => git,
    Err(e) => handle_error(e),
  };

  let ctx = match RunContext::build(&root, git.work_tree(), cli.dev) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  if let Err(err) = commands::run_release(&ctx, &git, cli.target) {
    handle_error(err);
  }
}

fn handle_error(err: ReleaseError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
