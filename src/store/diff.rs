//! Snapshot comparison engine.
//!
//! Compares the previous and the freshly fetched snapshot and reports:
//! - Ranking movement (always, even when unchanged)
//! - Problems that went from unsolved to solved
//! - Newly published problems that are available to attempt
//!
//! Problems are matched by id, not list position, so a reordered or
//! renumbered remote list cannot produce phantom events.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::notify::Verb;
use crate::snapshot::{Problem, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Improved,
    Worsened,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Improved => "improved",
            Direction::Worsened => "worsened",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    RankChanged { delta: u64, direction: Direction },
    ProblemSolved(Problem),
    ProblemAdded(Problem),
}

impl Event {
    /// Notification verb for problem events, rank changes are log-only.
    pub fn verb(&self) -> Option<Verb> {
        match self {
            Event::RankChanged { .. } => None,
            Event::ProblemSolved(_) => Some(Verb::Solved),
            Event::ProblemAdded(_) => Some(Verb::Added),
        }
    }

    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Event::RankChanged { .. } => None,
            Event::ProblemSolved(p) | Event::ProblemAdded(p) => Some(p),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RankChanged { delta, direction } => {
                write!(f, "ranking {} by {delta}", direction.as_str())
            }
            Event::ProblemSolved(p) => write!(f, "newly solved: {}. {}", p.id, p.title),
            Event::ProblemAdded(p) => write!(f, "new problem: {}. {}", p.id, p.title),
        }
    }
}

/// Compare two snapshots and produce events in a fixed order:
/// rank first, then solved problems by ascending id, then added problems by ascending id.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Vec<Event> {
    let mut events = vec![rank_change(old.ranking, new.ranking)];

    let previous: HashMap<u32, &Problem> = old.problems.iter().map(|p| (p.id, p)).collect();

    let mut solved = Vec::new();
    let mut added = Vec::new();

    for problem in &new.problems {
        match previous.get(&problem.id) {
            Some(before) => {
                if !before.is_accepted && problem.is_accepted {
                    solved.push(problem);
                }
            }
            None => {
                // unavailable additions stay in the snapshot but are not announced
                if problem.is_available {
                    added.push(problem);
                }
            }
        }
    }

    // the fetcher normalizes to ascending id, sorting again keeps the order
    // guarantee for snapshots loaded from hand-edited files
    solved.sort_by_key(|p| p.id);
    added.sort_by_key(|p| p.id);

    events.extend(solved.into_iter().cloned().map(Event::ProblemSolved));
    events.extend(added.into_iter().cloned().map(Event::ProblemAdded));
    events
}

fn rank_change(old: u64, new: u64) -> Event {
    let direction = if new < old { Direction::Improved } else { Direction::Worsened };
    Event::RankChanged { delta: old.abs_diff(new), direction }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Record;
    use chrono::DateTime;

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

    fn snap(ranking: u64, problems: Vec<Problem>) -> Snapshot {
        Snapshot {
            owner: "alice".to_string(),
            record: Record::from_problems(&problems),
            problems,
            ranking,
            updated_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn ids(events: &[Event], pick: fn(&Event) -> bool) -> Vec<u32> {
        events.iter().filter(|e| pick(e)).filter_map(|e| e.problem()).map(|p| p.id).collect()
    }

    fn is_solved(e: &Event) -> bool {
        matches!(e, Event::ProblemSolved(_))
    }

    fn is_added(e: &Event) -> bool {
        matches!(e, Event::ProblemAdded(_))
    }

    #[test]
    fn ranking_improved() {
        let events = diff(&snap(120, vec![]), &snap(95, vec![]));
        assert_eq!(events, vec![Event::RankChanged { delta: 25, direction: Direction::Improved }]);
    }

    #[test]
    fn ranking_worsened() {
        let events = diff(&snap(95, vec![]), &snap(120, vec![]));
        assert_eq!(events, vec![Event::RankChanged { delta: 25, direction: Direction::Worsened }]);
    }

    #[test]
    fn ranking_tie_reported_as_worsened_by_zero() {
        let events = diff(&snap(50, vec![]), &snap(50, vec![]));
        assert_eq!(events, vec![Event::RankChanged { delta: 0, direction: Direction::Worsened }]);
    }

    #[test]
    fn solved_transition_detected() {
        let events = diff(&snap(1, vec![problem(1, false, true)]), &snap(1, vec![problem(1, true, true)]));
        assert_eq!(ids(&events, is_solved), vec![1]);
        assert!(ids(&events, is_added).is_empty());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn already_solved_not_reported_again() {
        let events = diff(&snap(1, vec![problem(1, true, true)]), &snap(1, vec![problem(1, true, true)]));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn accepted_regression_is_ignored() {
        let events = diff(&snap(1, vec![problem(1, true, true)]), &snap(1, vec![problem(1, false, true)]));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn appended_problems_gated_by_availability() {
        let old = snap(1, vec![problem(1, false, true)]);
        let new = snap(1, vec![problem(1, false, true), problem(2, false, false), problem(3, false, true)]);
        let events = diff(&old, &new);
        assert_eq!(ids(&events, is_added), vec![3]);
        assert!(ids(&events, is_solved).is_empty());
    }

    #[test]
    fn empty_old_list_only_reports_additions() {
        let new = snap(1, vec![problem(1, true, true), problem(2, false, true), problem(3, true, false)]);
        let events = diff(&snap(1, vec![]), &new);
        assert!(ids(&events, is_solved).is_empty());
        assert_eq!(ids(&events, is_added), vec![1, 2]);
    }

    #[test]
    fn events_ordered_rank_solved_added() {
        let old = snap(10, vec![problem(1, false, true), problem(2, false, true)]);
        let new = snap(
            8,
            vec![problem(1, true, true), problem(2, true, true), problem(3, false, true), problem(4, false, true)],
        );
        let events = diff(&old, &new);
        let rendered: Vec<String> = events.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "ranking improved by 2",
                "newly solved: 1. problem 1",
                "newly solved: 2. problem 2",
                "new problem: 3. problem 3",
                "new problem: 4. problem 4",
            ]
        );
    }

    #[test]
    fn diff_is_deterministic() {
        let old = snap(300, vec![problem(1, false, true), problem(5, false, true)]);
        let new = snap(
            280,
            vec![problem(1, true, true), problem(5, true, true), problem(6, false, true), problem(9, false, true)],
        );
        let first = serde_json::to_vec(&diff(&old, &new)).unwrap();
        let second = serde_json::to_vec(&diff(&old, &new)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reordered_remote_does_not_misreport() {
        // positional comparison would pair id 1 with id 2 here
        let old = snap(1, vec![problem(1, true, true), problem(2, false, true)]);
        let new = snap(1, vec![problem(2, false, true), problem(1, true, true)]);
        let events = diff(&old, &new);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn removed_problem_is_skipped() {
        let old = snap(1, vec![problem(1, false, true), problem(2, false, true)]);
        let new = snap(1, vec![problem(2, true, true)]);
        let events = diff(&old, &new);
        assert_eq!(ids(&events, is_solved), vec![2]);
        assert!(ids(&events, is_added).is_empty());
    }

    #[test]
    fn verbs_map_to_notifications() {
        let p = problem(1, true, true);
        assert_eq!(Event::ProblemSolved(p.clone()).verb(), Some(Verb::Solved));
        assert_eq!(Event::ProblemAdded(p).verb(), Some(Verb::Added));
        assert_eq!(Event::RankChanged { delta: 1, direction: Direction::Improved }.verb(), None);
    }
}
