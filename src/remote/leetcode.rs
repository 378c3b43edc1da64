//! LeetCode client.
//!
//! Builds a snapshot from two requests:
//! - `GET /api/problems/all/` for every problem and the session user's status
//! - `POST /graphql` for the public profile ranking
//!
//! Solved status is only present when the session cookie is valid; without it
//! every problem comes back unsolved.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;

use super::{FetchError, Fetcher};
use crate::snapshot::{Difficulty, Problem, Record, Snapshot};

const BASE_URL: &str = "https://leetcode.com";
const USER_AGENT: &str = concat!("leetwatch/", env!("CARGO_PKG_VERSION"));

const RANKING_QUERY: &str =
    "query userRanking($username: String!) { matchedUser(username: $username) { profile { ranking } } }";

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub session: Option<String>,
    pub csrftoken: Option<String>,
}

impl Credentials {
    fn cookie_header(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(session) = &self.session {
            parts.push(format!("LEETCODE_SESSION={session}"));
        }
        if let Some(token) = &self.csrftoken {
            parts.push(format!("csrftoken={token}"));
        }
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

#[derive(Debug, Deserialize)]
struct ProblemsWire {
    #[serde(default)]
    stat_status_pairs: Vec<StatStatusPair>,
}

#[derive(Debug, Deserialize)]
struct StatStatusPair {
    stat: Stat,
    status: Option<String>,
    difficulty: DifficultyWire,
    #[serde(default)]
    paid_only: bool,
}

#[derive(Debug, Deserialize)]
struct Stat {
    frontend_question_id: u32,
    #[serde(rename = "question__title")]
    title: String,
    #[serde(rename = "question__title_slug", default)]
    slug: String,
}

#[derive(Debug, Deserialize)]
struct DifficultyWire {
    level: u8,
}

#[derive(Debug, Deserialize)]
struct RankingWire {
    data: Option<RankingData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankingData {
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
struct MatchedUser {
    profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    ranking: Option<u64>,
}

pub struct LeetCodeClient {
    agent: ureq::Agent,
    base_url: String,
    credentials: Credentials,
}

impl LeetCodeClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(BASE_URL, credentials)
    }

    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(20))
            .timeout_write(Duration::from_secs(20))
            .user_agent(USER_AGENT)
            .build();
        LeetCodeClient {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn authorize(&self, mut request: ureq::Request) -> ureq::Request {
        if let Some(cookie) = self.credentials.cookie_header() {
            request = request.set("Cookie", &cookie);
        }
        if let Some(token) = &self.credentials.csrftoken {
            request = request.set("x-csrftoken", token);
        }
        request.set("Referer", &format!("{}/", self.base_url))
    }

    fn fetch_problems(&self) -> Result<Vec<Problem>, FetchError> {
        let url = format!("{}/api/problems/all/", self.base_url);
        let body = self
            .authorize(self.agent.get(&url))
            .call()
            .map_err(|e| FetchError::Http(e.to_string()))?
            .into_string()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        parse_problems(&body)
    }

    fn fetch_ranking(&self, owner: &str) -> Result<u64, FetchError> {
        let url = format!("{}/graphql", self.base_url);
        let payload = serde_json::json!({
            "query": RANKING_QUERY,
            "variables": { "username": owner },
        });
        let body = self
            .authorize(self.agent.post(&url))
            .set("Content-Type", "application/json")
            .send_string(&payload.to_string())
            .map_err(|e| FetchError::Http(e.to_string()))?
            .into_string()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        parse_ranking(&body)
    }
}

impl Fetcher for LeetCodeClient {
    fn fetch_snapshot(&self, owner: &str) -> Result<Snapshot, FetchError> {
        let problems = self.fetch_problems()?;
        let ranking = self.fetch_ranking(owner)?;
        tracing::debug!(problems = problems.len(), ranking, "fetched leetcode data");

        let mut snapshot = Snapshot {
            owner: owner.to_string(),
            record: Record::default(),
            problems,
            ranking,
            updated_at: Utc::now(),
        };
        snapshot.normalize();
        snapshot.record = Record::from_problems(&snapshot.problems);
        Ok(snapshot)
    }
}

fn parse_json<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Json(e.to_string()))
}

fn parse_problems(body: &str) -> Result<Vec<Problem>, FetchError> {
    let wire: ProblemsWire = parse_json(body)?;
    wire.stat_status_pairs
        .into_iter()
        .map(|pair| -> Result<Problem, FetchError> {
            let difficulty =
                Difficulty::from_level(pair.difficulty.level).ok_or(FetchError::MissingField("difficulty.level"))?;
            Ok(Problem {
                id: pair.stat.frontend_question_id,
                title: pair.stat.title,
                is_accepted: pair.status.as_deref() == Some("ac"),
                is_available: !pair.paid_only,
                slug: pair.stat.slug,
                difficulty,
            })
        })
        .collect()
}

fn parse_ranking(body: &str) -> Result<u64, FetchError> {
    let wire: RankingWire = parse_json(body)?;
    wire.data
        .and_then(|d| d.matched_user)
        .ok_or(FetchError::MissingField("matchedUser"))?
        .profile
        .and_then(|p| p.ranking)
        .ok_or(FetchError::MissingField("profile.ranking"))
}
