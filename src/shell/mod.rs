//! Interactive stepping shell.
//!
//! A line protocol for driving a machine by hand:
//!
//! | input      | effect                                 |
//! |------------|----------------------------------------|
//! | `s`        | execute one state                      |
//! | `q`        | quit                                   |
//! | `17`       | run until the step counter reaches 17  |
//! | `+payload` | pass `payload` to `Machine::inject`    |
//!
//! Before each prompt the shell prints the current state, the step count
//! and the machine's diagnostic lines.

mod command;

pub use command::{ShellCommand, ShellError};

use crate::runtime::{Machine, MachineInstance, RuntimeError};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Command [(S)tep, # for stepcount, (Q)uit, +(...)] : ";

/// What the shell does after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Shell bound to one machine instance.
pub struct Shell<'a, M: Machine> {
    instance: &'a mut MachineInstance<M>,
}

impl<'a, M: Machine> Shell<'a, M> {
    pub fn new(instance: &'a mut MachineInstance<M>) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &MachineInstance<M> {
        self.instance
    }

    /// Current state and step count, then tab-indented diagnostics.
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Current state is {}, step count is {}",
            self.instance.state_name(),
            self.instance.step_count()
        )];
        lines.extend(
            self.instance
                .diagnostics()
                .into_iter()
                .map(|line| format!("\t{line}")),
        );
        lines
    }

    /// Apply one command to the instance.
    pub fn execute(&mut self, command: &ShellCommand) -> Result<Flow, RuntimeError> {
        match command {
            ShellCommand::Step => {
                self.instance.step()?;
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::RunToStep(count) => self.instance.run_to_step_count(*count)?,
            ShellCommand::Inject(payload) => self.instance.inject(payload)?,
        }
        Ok(Flow::Continue)
    }

    /// Read commands from `input` until `q` or end of input.
    ///
    /// Invalid commands and runtime errors are reported on `output` and
    /// the loop continues; only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<(), ShellError> {
        let mut lines = input.lines();
        loop {
            for line in self.status_lines() {
                writeln!(output, "{line}")?;
            }
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                writeln!(output)?;
                return Ok(());
            };
            let line = line?;

            let command = match line.parse::<ShellCommand>() {
                Ok(command) => command,
                Err(ShellError::Invalid(text)) => {
                    writeln!(output, "Invalid command __{text}__ try again")?;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.execute(&command) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "shell command failed");
                    writeln!(output, "Error: {e}")?;
                }
            }
        }
    }
}
