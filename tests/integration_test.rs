use std::cell::{Cell, RefCell};
use std::fs;

use chrono::{Duration, Utc};
use leetwatch::notify::{Notifier, NotifyError, Verb};
use leetwatch::refresh::{Outcome, Refresher};
use leetwatch::remote::{FetchError, Fetcher};
use leetwatch::snapshot::{Problem, Record, Snapshot};
use leetwatch::store::diff::{Direction, Event};
use leetwatch::store::JsonStore;
use tempfile::TempDir;

/// Serves one fixed snapshot, stamped with the time of the call.
struct StaticFetcher {
    snapshot: Snapshot,
    calls: Cell<usize>,
}

impl Fetcher for StaticFetcher {
    fn fetch_snapshot(&self, owner: &str) -> Result<Snapshot, FetchError> {
        self.calls.set(self.calls.get() + 1);
        let mut snapshot = self.snapshot.clone();
        snapshot.owner = owner.to_string();
        snapshot.updated_at = Utc::now();
        Ok(snapshot)
    }
}

#[derive(Default)]
struct Collect(RefCell<Vec<(Verb, u32)>>);

impl Notifier for Collect {
    fn name(&self) -> &'static str {
        "collect"
    }

    fn notify(&self, verb: Verb, problem: &Problem) -> Result<(), NotifyError> {
        self.0.borrow_mut().push((verb, problem.id));
        Ok(())
    }
}

fn problem(id: u32, accepted: bool, available: bool) -> Problem {
    Problem {
        id,
        title: format!("problem {id}"),
        is_accepted: accepted,
        is_available: available,
        slug: format!("problem-{id}"),
        difficulty: Default::default(),
    }
}

fn snapshot(ranking: u64, problems: Vec<Problem>) -> Snapshot {
    Snapshot {
        owner: "alice".to_string(),
        record: Record::from_problems(&problems),
        problems,
        ranking,
        updated_at: Utc::now(),
    }
}

#[test]
fn first_run_bootstraps_then_stale_run_reports_changes() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("leetcode.json"));

    let first = StaticFetcher { snapshot: snapshot(120, vec![problem(1, false, true)]), calls: Cell::new(0) };
    let notifier = Collect::default();
    let outcome = Refresher::new(&store, &first, &notifier, "alice").run_once().unwrap();
    assert!(matches!(outcome, Outcome::Bootstrapped(_)));
    assert_eq!(first.calls.get(), 1);
    assert!(notifier.0.borrow().is_empty());

    // an immediate second run is inside the ttl
    let outcome = Refresher::new(&store, &first, &notifier, "alice").run_once().unwrap();
    assert!(matches!(outcome, Outcome::Skipped(_)));
    assert_eq!(first.calls.get(), 1);

    // age the stored snapshot past the ttl
    let mut stored = store.load().unwrap();
    stored.updated_at = Utc::now() - Duration::minutes(10);
    store.save(&stored).unwrap();

    let second = StaticFetcher {
        snapshot: snapshot(95, vec![problem(1, true, true), problem(2, false, false), problem(3, false, true)]),
        calls: Cell::new(0),
    };
    let outcome = Refresher::new(&store, &second, &notifier, "alice").run_once().unwrap();

    let Outcome::Refreshed { snapshot, events } = outcome else { panic!("expected a refresh") };
    assert_eq!(events[0], Event::RankChanged { delta: 25, direction: Direction::Improved });
    assert_eq!(*notifier.0.borrow(), vec![(Verb::Solved, 1), (Verb::Added, 3)]);
    assert_eq!(store.load().unwrap(), snapshot);
    assert_eq!(snapshot.problems.len(), 3);
}

#[test]
fn persisted_file_is_readable_json() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("leetcode.json"));
    store.save(&snapshot(7, vec![problem(1, true, true)])).unwrap();

    let text = fs::read_to_string(store.path()).unwrap();
    let owner = text.find("\"owner\"").unwrap();
    let record = text.find("\"record\"").unwrap();
    let problems = text.find("\"problems\"").unwrap();
    let ranking = text.find("\"ranking\"").unwrap();
    let updated = text.find("\"updatedAt\"").unwrap();
    assert!(owner < record && record < problems && problems < ranking && ranking < updated);
    assert!(text.lines().count() > 1);
}
