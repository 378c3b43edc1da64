//! JSON output for the stored snapshot.
//!
//! Same shape as the snapshot file, for scripting and piping.

use crate::snapshot::Snapshot;

pub fn render(snapshot: &Snapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| String::from("{}"))
}
