//! Remote progress source.
//!
//! A fetcher returns a complete snapshot or an error, never a partially
//! filled one. The refresher treats any error as the end of the cycle.

pub mod leetcode;

use crate::snapshot::Snapshot;

pub use leetcode::{Credentials, LeetCodeClient};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(String),

    #[error("json error: {0}")]
    Json(String),

    #[error("response missing {0}")]
    MissingField(&'static str),
}

pub trait Fetcher {
    fn fetch_snapshot(&self, owner: &str) -> Result<Snapshot, FetchError>;
}

impl<T: Fetcher + ?Sized> Fetcher for &T {
    fn fetch_snapshot(&self, owner: &str) -> Result<Snapshot, FetchError> {
        (**self).fetch_snapshot(owner)
    }
}

impl<T: Fetcher + ?Sized> Fetcher for Box<T> {
    fn fetch_snapshot(&self, owner: &str) -> Result<Snapshot, FetchError> {
        (**self).fetch_snapshot(owner)
    }
}
