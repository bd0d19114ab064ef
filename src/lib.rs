//! Testaustime command-line client library.
//!
//! The client turns a flat argument vector into one call against the
//! Testaustime API. The pipeline runs in one direction:
//!
//! - `args` - tokenizes the process arguments into a [`args::ParsedInvocation`]
//! - `grammar` - the static command tree
//! - `resolver` - matches the invocation against the tree and derives the
//!   time filter, top flag and highlighted column
//! - `dispatcher` - runs the handler for a resolved route, or prints usage
//!
//! The collaborators the dispatcher talks to live in `api`, `config` and
//! `prompt`; `render` and `output` format what ends up on the terminal.

pub mod api;
pub mod args;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod grammar;
pub mod output;
pub mod prompt;
pub mod render;
pub mod resolver;
pub mod secret;
pub mod stats;
pub mod types;
pub mod utils;

/// Result type used by the dispatcher and the binary.
pub type Res<T> = std::result::Result<T, error::CliError>;

/// Prints an informational message with a blue bullet point.
///
/// The first argument is the [`output::Printer`] deciding about colors, the
/// rest is passed on like to `println!`.
///
/// # Example
///
/// ```
/// info!(out, "GET /users/@me took {} ms", elapsed);
/// ```
#[macro_export]
macro_rules! info {
  ($out:expr, $($arg:tt)*) => ({
    $out.line($crate::output::Level::Info, std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($out:expr, $($arg:tt)*) => ({
    $out.line($crate::output::Level::Success, std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($out:expr, $($arg:tt)*) => ({
    $out.line($crate::output::Level::Warning, std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark.
///
/// Unlike a fatal exit this only prints; the caller decides whether the run
/// goes on.
#[macro_export]
macro_rules! failure {
  ($out:expr, $($arg:tt)*) => ({
    $out.line($crate::output::Level::Failure, std::format_args!($($arg)*));
  })
}
