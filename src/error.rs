use thiserror::Error;

use crate::{api::ApiError, config::ConfigError, grammar::GrammarError};

/// Failures that end the run with a non-zero exit status. Usage mismatches
/// and requests the API turns down are handled before they get here.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid command grammar: {0}")]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read input: {0}")]
    Prompt(#[from] std::io::Error),
}
