use std::io::{self, BufRead, Write};

use crate::secret::SecretString;

/// Interactive input for values not given on the command line.
pub trait Prompt {
    fn ask_text(&mut self, label: &str) -> io::Result<String>;

    /// Reads a value without echoing it.
    fn ask_secret(&mut self, label: &str) -> io::Result<SecretString>;
}

#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask_text(&mut self, label: &str) -> io::Result<String> {
        print!("{}: ", label);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<SecretString> {
        let label = if label.is_empty() { "Password" } else { label };
        rpassword::prompt_password(format!("{}: ", label)).map(SecretString::new)
    }
}
