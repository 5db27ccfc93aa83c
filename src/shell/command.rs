//! Shell command parsing.

use std::str::FromStr;
use thiserror::Error;

/// Errors raised by the stepping shell
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Invalid command __{0}__ try again")]
    Invalid(String),

    #[error("Shell I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One line of shell input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// `s`: execute one state.
    Step,
    /// `q`: leave the shell.
    Quit,
    /// An integer: run until the step counter reaches it.
    RunToStep(usize),
    /// `+payload`: hand the payload to the machine's inject hook.
    Inject(String),
}

impl FromStr for ShellCommand {
    type Err = ShellError;

    /// Commands are case-insensitive; inject payloads are kept verbatim.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if let Some(payload) = line.strip_prefix('+') {
            return Ok(ShellCommand::Inject(payload.to_string()));
        }

        match line.to_lowercase().as_str() {
            "s" => Ok(ShellCommand::Step),
            "q" => Ok(ShellCommand::Quit),
            other => other
                .parse::<usize>()
                .map(ShellCommand::RunToStep)
                .map_err(|_| ShellError::Invalid(line.to_string())),
        }
    }
}
