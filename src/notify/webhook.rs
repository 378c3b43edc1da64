//! Webhook notifier, POSTs one JSON object per event.

use std::time::Duration;

use serde::Serialize;

use super::{Notifier, NotifyError, Verb};
use crate::snapshot::Problem;

#[derive(Debug, Serialize)]
struct Payload<'a> {
    verb: Verb,
    id: u32,
    title: &'a str,
    url: String,
}

pub struct WebhookNotifier {
    url: String,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(20))
            .timeout_write(Duration::from_secs(20))
            .build();
        WebhookNotifier { url: url.into(), agent }
    }
}

fn payload(verb: Verb, problem: &Problem) -> Result<String, NotifyError> {
    let body = Payload { verb, id: problem.id, title: &problem.title, url: problem.url() };
    serde_json::to_string(&body).map_err(|e| NotifyError::Http(e.to_string()))
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError> {
        let body = payload(verb, problem)?;
        self.agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| NotifyError::Http(e.to_string()))?;
        Ok(())
    }
}
