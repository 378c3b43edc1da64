//! Shell hook notifier.
//!
//! Runs a user-configured program once per event:
//!
//! ```text
//! <program> [configured args...] <verb> <id> <title> <url>
//! ```
//!
//! This is how a task tracker CLI or a mail-to-task script gets wired in.
//! A non-zero exit status is reported as a failure.

use std::process::Command;

use super::{Notifier, NotifyError, Verb};
use crate::snapshot::Problem;

pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandNotifier { program: program.into(), args }
    }

    fn command(&self, verb: Verb, problem: &Problem) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(verb.as_str())
            .arg(problem.id.to_string())
            .arg(&problem.title)
            .arg(problem.url());
        cmd
    }
}

impl Notifier for CommandNotifier {
    fn name(&self) -> &'static str {
        "command"
    }

    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError> {
        let output = self.command(verb, problem).output().map_err(|e| NotifyError::Spawn {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(NotifyError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
