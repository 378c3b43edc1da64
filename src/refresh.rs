//! Refresh cycle.
//!
//! One cycle: load (or bootstrap) the stored snapshot, skip if it is younger
//! than the TTL, otherwise fetch, diff, notify once per event and persist.
//!
//! Ordering guarantees:
//! - a failed fetch ends the cycle before any notification or write
//! - a failed notification is logged and the cycle continues
//! - the new snapshot is written only after every event has been emitted

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::notify::Notifier;
use crate::remote::{FetchError, Fetcher};
use crate::snapshot::Snapshot;
use crate::store::diff::{self, Event};
use crate::store::{JsonStore, StoreError};

/// Minimum age of the stored snapshot before the remote is queried again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 60);

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The remote was observed but the result could not be recorded.
    #[error("persist failed: {0}")]
    Persist(#[source] StoreError),
}

/// What a single run did.
#[derive(Debug)]
pub enum Outcome {
    /// No usable snapshot was stored, a fresh one was fetched and saved.
    Bootstrapped(Snapshot),
    /// The stored snapshot is younger than the TTL.
    Skipped(Snapshot),
    Refreshed { snapshot: Snapshot, events: Vec<Event> },
}

impl Outcome {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            Outcome::Bootstrapped(s) | Outcome::Skipped(s) => s,
            Outcome::Refreshed { snapshot, .. } => snapshot,
        }
    }
}

pub struct Refresher<'a, F, N> {
    store: &'a JsonStore,
    fetcher: F,
    notifier: N,
    owner: String,
    ttl: Duration,
}

impl<'a, F: Fetcher, N: Notifier> Refresher<'a, F, N> {
    pub fn new(store: &'a JsonStore, fetcher: F, notifier: N, owner: impl Into<String>) -> Self {
        Refresher { store, fetcher, notifier, owner: owner.into(), ttl: DEFAULT_TTL }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Load, or bootstrap on absence/corruption, then refresh once.
    pub fn run_once(&self) -> Result<Outcome, RefreshError> {
        let current = match self.store.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log_load_failure(&e);
                let snapshot = self.bootstrap()?;
                // a bootstrapped snapshot is always inside the ttl, the refresh below is a no-op
                return match self.cycle_at(snapshot, Utc::now())? {
                    Outcome::Skipped(s) => Ok(Outcome::Bootstrapped(s)),
                    other => Ok(other),
                };
            }
        };
        self.cycle_at(current, Utc::now())
    }

    pub fn load_or_bootstrap(&self) -> Result<Snapshot, RefreshError> {
        match self.store.load() {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                log_load_failure(&e);
                self.bootstrap()
            }
        }
    }

    /// Fetch and persist without diffing, there is nothing to compare against.
    pub fn bootstrap(&self) -> Result<Snapshot, RefreshError> {
        tracing::info!(owner = %self.owner, "bootstrapping snapshot");
        let snapshot = self.fetcher.fetch_snapshot(&self.owner)?;
        self.persist(&snapshot)?;
        Ok(snapshot)
    }

    pub fn refresh(&self, current: Snapshot) -> Result<Snapshot, RefreshError> {
        self.refresh_at(current, Utc::now())
    }

    pub fn refresh_at(&self, current: Snapshot, now: DateTime<Utc>) -> Result<Snapshot, RefreshError> {
        Ok(match self.cycle_at(current, now)? {
            Outcome::Bootstrapped(s) | Outcome::Skipped(s) => s,
            Outcome::Refreshed { snapshot, .. } => snapshot,
        })
    }

    fn cycle_at(&self, current: Snapshot, now: DateTime<Utc>) -> Result<Outcome, RefreshError> {
        let age = current.age(now);
        if age < self.ttl {
            tracing::info!(
                age = %humantime::format_duration(round_secs(age)),
                ttl = %humantime::format_duration(self.ttl),
                "snapshot is fresh, skipping refresh"
            );
            return Ok(Outcome::Skipped(current));
        }

        tracing::info!(owner = %self.owner, "fetching snapshot");
        let fresh = self.fetcher.fetch_snapshot(&self.owner)?;

        let events = diff::diff(&current, &fresh);
        self.emit(&events);

        self.persist(&fresh)?;
        Ok(Outcome::Refreshed { snapshot: fresh, events })
    }

    fn emit(&self, events: &[Event]) {
        let mut solved = 0;
        for event in events {
            tracing::info!("{event}");

            let (Some(verb), Some(problem)) = (event.verb(), event.problem()) else { continue };
            if matches!(event, Event::ProblemSolved(_)) {
                solved += 1;
            }

            if let Err(e) = self.notifier.notify(verb, problem) {
                tracing::warn!(notifier = self.notifier.name(), id = problem.id, error = %e, "notification failed");
            }
        }

        if solved == 0 {
            tracing::info!("no newly solved problems");
        }
    }

    fn persist(&self, snapshot: &Snapshot) -> Result<(), RefreshError> {
        self.store.save(snapshot).map_err(RefreshError::Persist)?;
        tracing::info!(path = %self.store.path().display(), "snapshot saved");
        Ok(())
    }
}

fn log_load_failure(error: &StoreError) {
    match error {
        StoreError::NotFound(_) => tracing::info!("{error}, creating a new one"),
        _ => tracing::warn!("{error}, regenerating"),
    }
}

fn round_secs(d: Duration) -> Duration {
    Duration::from_secs(d.as_secs())
}
