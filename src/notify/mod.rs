//! Notification sinks.
//!
//! A notifier turns a solved or added problem into an action item somewhere
//! else: a log line, a shell hook, or a webhook. Delivery is best effort, the
//! refresher logs failures and keeps going.

pub mod command;
pub mod webhook;

use std::fmt;

use serde::Serialize;

use crate::snapshot::Problem;

pub use command::CommandNotifier;
pub use webhook::WebhookNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Solved,
    Added,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Solved => "solved",
            Verb::Added => "added",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with {status}: {stderr}")]
    Exit { program: String, status: String, stderr: String },

    #[error("webhook error: {0}")]
    Http(String),
}

pub trait Notifier {
    fn name(&self) -> &'static str;
    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError> {
        (**self).notify(verb, problem)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError> {
        (**self).notify(verb, problem)
    }
}

/// Default sink, writes each notification to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError> {
        tracing::info!(verb = %verb, id = problem.id, title = %problem.title, url = %problem.url(), "notify");
        Ok(())
    }
}
