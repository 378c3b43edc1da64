//! Snapshot data model.
//!
//! A snapshot is the full picture of one user's progress at fetch time:
//! - per-difficulty solved/total counts
//! - every problem, ordered by ascending id
//! - global ranking
//!
//! Field order here is the field order in the persisted file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Maps the platform's numeric level (1, 2, 3) to a tier.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Count {
    pub solved: u32,
    pub total: u32,
}

impl Count {
    fn tally(&mut self, accepted: bool) {
        self.total += 1;
        if accepted {
            self.solved += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub easy: Count,
    pub medium: Count,
    pub hard: Count,
    pub total: Count,
}

impl Record {
    /// Builds the aggregate counts from a problem list.
    pub fn from_problems(problems: &[Problem]) -> Self {
        let mut record = Record::default();
        for problem in problems {
            let tier = match problem.difficulty {
                Difficulty::Easy => &mut record.easy,
                Difficulty::Medium => &mut record.medium,
                Difficulty::Hard => &mut record.hard,
            };
            tier.tally(problem.is_accepted);
            record.total.tally(problem.is_accepted);
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: u32,
    pub title: String,
    pub is_accepted: bool,
    pub is_available: bool,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Problem {
    /// Link to the problem page, empty slug falls back to the problem list.
    pub fn url(&self) -> String {
        if self.slug.is_empty() {
            String::from("https://leetcode.com/problemset/")
        } else {
            format!("https://leetcode.com/problems/{}/", self.slug)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub owner: String,
    pub record: Record,
    pub problems: Vec<Problem>,
    pub ranking: u64,
    pub updated_at: DateTime<Utc>,
}

impl Snapshot {
    /// Sorts problems by id and drops duplicate ids, keeping the last one seen.
    pub fn normalize(&mut self) {
        // stable sort keeps input order among equal ids, so the last duplicate wins below
        self.problems.sort_by_key(|p| p.id);
        let mut deduped: Vec<Problem> = Vec::with_capacity(self.problems.len());
        for problem in self.problems.drain(..) {
            match deduped.last_mut() {
                Some(last) if last.id == problem.id => *last = problem,
                _ => deduped.push(problem),
            }
        }
        self.problems = deduped;
    }

    pub fn solved(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(|p| p.is_accepted)
    }

    /// Time elapsed since this snapshot was fetched. Zero if the timestamp is in the future.
    pub fn age(&self, now: DateTime<Utc>) -> std::time::Duration {
        (now - self.updated_at).to_std().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(id: u32, difficulty: Difficulty, accepted: bool) -> Problem {
        Problem {
            id,
            title: format!("problem {id}"),
            is_accepted: accepted,
            is_available: true,
            slug: String::new(),
            difficulty,
        }
    }

    fn snapshot(problems: Vec<Problem>) -> Snapshot {
        Snapshot {
            owner: "alice".to_string(),
            record: Record::default(),
            problems,
            ranking: 100,
            updated_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn record_counts_per_tier() {
        let problems = vec![
            problem(1, Difficulty::Easy, true),
            problem(2, Difficulty::Medium, false),
            problem(3, Difficulty::Hard, true),
            problem(4, Difficulty::Easy, false),
        ];
        let record = Record::from_problems(&problems);
        assert_eq!(record.easy, Count { solved: 1, total: 2 });
        assert_eq!(record.medium, Count { solved: 0, total: 1 });
        assert_eq!(record.hard, Count { solved: 1, total: 1 });
        assert_eq!(record.total, Count { solved: 2, total: 4 });
    }

    #[test]
    fn normalize_sorts_and_dedups() {
        let mut snap = snapshot(vec![
            problem(3, Difficulty::Easy, false),
            problem(1, Difficulty::Easy, false),
            problem(3, Difficulty::Easy, true),
        ]);
        snap.normalize();
        let ids: Vec<u32> = snap.problems.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(snap.problems[1].is_accepted);
    }

    #[test]
    fn age_is_zero_for_future_timestamp() {
        let snap = snapshot(vec![]);
        let earlier = snap.updated_at - chrono::Duration::minutes(5);
        assert_eq!(snap.age(earlier), std::time::Duration::ZERO);
    }

    #[test]
    fn file_uses_camel_case_fields() {
        let json = serde_json::to_string(&snapshot(vec![problem(1, Difficulty::Easy, true)])).unwrap();
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"isAccepted\":true"));
        assert!(json.starts_with("{\"owner\""));
    }

    #[test]
    fn legacy_problem_without_slug_loads() {
        let problem: Problem =
            serde_json::from_str(r#"{"id":7,"title":"Reverse Integer","isAccepted":false,"isAvailable":true}"#)
                .unwrap();
        assert_eq!(problem.slug, "");
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert_eq!(problem.url(), "https://leetcode.com/problemset/");
    }
}
