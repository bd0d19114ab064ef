//! Splits the process arguments into a command, a sub-command and the
//! remaining positional tokens.
//!
//! Global flags may appear anywhere on the command line. They are stripped by
//! clap before the positional stream is assigned, so
//! `testaustime friends --disable-colors pastWeek` and
//! `testaustime --disable-colors friends pastWeek` tokenize the same way.

use std::path::PathBuf;

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use crate::utils;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = "testaustime",
  bin_name = "testaustime",
  about = env!("CARGO_PKG_DESCRIPTION"),
  styles = styles(),
)]
pub struct Cli {
    /// Print without ANSI colors
    #[clap(long)]
    pub disable_colors: bool,

    /// Print how long each API request took
    #[clap(long)]
    pub measure_requests: bool,

    /// Use an alternate configuration file
    #[clap(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Command, sub-command and their arguments
    #[clap(value_name = "ARGS")]
    pub positionals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    pub disable_colors: bool,
    pub measure_requests: bool,
    pub alternate_config_file: Option<PathBuf>,
}

/// One run's worth of input, fixed after tokenization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub command: String,
    pub sub_command: String,
    pub residual: Vec<String>,
    pub flags: Flags,
    positionals: Vec<String>,
}

impl ParsedInvocation {
    pub fn new(positionals: Vec<String>, flags: Flags) -> Self {
        Self {
            command: utils::nth_element(&positionals, 0).to_string(),
            sub_command: utils::nth_element(&positionals, 1).to_string(),
            residual: positionals.iter().skip(2).cloned().collect(),
            flags,
            positionals,
        }
    }

    /// Tokenizes a raw argument vector, program name excluded.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let argv = std::iter::once("testaustime".to_string())
            .chain(args.into_iter().map(Into::into));
        Cli::try_parse_from(argv).map(Self::from)
    }

    /// Positional token at `index`, counting the command as 0. Empty when
    /// absent.
    pub fn nth(&self, index: usize) -> &str {
        utils::nth_element(&self.positionals, index)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Salvages what it can from an argument vector clap rejected. The
    /// boolean flags are kept wherever they appear, the positionals are
    /// dropped so the invocation resolves to top-level usage.
    pub fn lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut flags = Flags::default();
        for arg in args {
            match arg.as_ref() {
                "--disable-colors" => flags.disable_colors = true,
                "--measure-requests" => flags.measure_requests = true,
                _ => {}
            }
        }
        Self::new(Vec::new(), flags)
    }
}

impl From<Cli> for ParsedInvocation {
    fn from(cli: Cli) -> Self {
        let flags = Flags {
            disable_colors: cli.disable_colors,
            measure_requests: cli.measure_requests,
            alternate_config_file: cli.config_file,
        };
        Self::new(cli.positionals, flags)
    }
}
