//! Candidate ranking and free-text search over item profiles.
//!
//! No database access: callers load the candidate pool and persist whatever
//! survives. All sorting is stable so equal scores keep retrieval order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::item::{ItemProfile, Polarity};
use crate::match_filter::{MatchFilter, Rejection};
use crate::similarity;
use crate::text;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Number of ranked candidates persisted per item submission.
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Search keeps results scoring strictly above this value.
pub const SEARCH_MIN_SCORE: f64 = 0.3;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Clamp a caller-supplied search limit into `[1, MAX_SEARCH_LIMIT]`.
pub fn clamp_search_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_SEARCH_LIMIT)
}

// ---------------------------------------------------------------------------
// Candidate ranking
// ---------------------------------------------------------------------------

/// A candidate from the opposite pool that survived scoring and filtering.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub item: ItemProfile,
    pub score: f64,
}

/// The outcome of scoring one candidate, for diagnostics.
#[derive(Debug, Clone)]
pub enum CandidateVerdict {
    Accepted(f64),
    SameOwner,
    SamePolarity,
    Rejected(Rejection),
}

/// Score and filter a single candidate against the subject item.
pub fn judge_candidate(
    subject: &ItemProfile,
    subject_tokens: &[String],
    candidate: &ItemProfile,
    filter: &MatchFilter,
) -> CandidateVerdict {
    if candidate.polarity == subject.polarity {
        return CandidateVerdict::SamePolarity;
    }
    if candidate.user_id == subject.user_id {
        return CandidateVerdict::SameOwner;
    }

    let score = similarity::score_tokens(subject_tokens, &candidate.tokens());
    let (lost, found) = match subject.polarity {
        Polarity::Lost => (subject, candidate),
        Polarity::Found => (candidate, subject),
    };

    match filter.evaluate(lost, found, score) {
        Ok(()) => CandidateVerdict::Accepted(score),
        Err(rejection) => CandidateVerdict::Rejected(rejection),
    }
}

/// Rank the candidate pool for `subject` and keep the best `limit`.
///
/// Candidates owned by the subject's owner or sharing its polarity are
/// skipped. Survivors are sorted by descending score; ties keep pool order.
pub fn rank_candidates(
    subject: &ItemProfile,
    pool: Vec<ItemProfile>,
    filter: &MatchFilter,
    limit: usize,
) -> Vec<ScoredCandidate> {
    rank_candidates_observed(subject, pool, filter, limit, |_, _| {})
}

/// [`rank_candidates`], reporting the verdict for every candidate to
/// `observe` before ranking.
pub fn rank_candidates_observed<F>(
    subject: &ItemProfile,
    pool: Vec<ItemProfile>,
    filter: &MatchFilter,
    limit: usize,
    mut observe: F,
) -> Vec<ScoredCandidate>
where
    F: FnMut(&ItemProfile, &CandidateVerdict),
{
    let subject_tokens = subject.tokens();

    let mut ranked: Vec<ScoredCandidate> = pool
        .into_iter()
        .filter_map(|candidate| {
            let verdict = judge_candidate(subject, &subject_tokens, &candidate, filter);
            observe(&candidate, &verdict);
            match verdict {
                CandidateVerdict::Accepted(score) => Some(ScoredCandidate {
                    item: candidate,
                    score,
                }),
                _ => None,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Which pools a search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Lost,
    Found,
    #[default]
    Both,
}

impl SearchScope {
    pub fn includes(self, polarity: Polarity) -> bool {
        match self {
            SearchScope::Both => true,
            SearchScope::Lost => polarity == Polarity::Lost,
            SearchScope::Found => polarity == Polarity::Found,
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchScope::Lost => "lost",
            SearchScope::Found => "found",
            SearchScope::Both => "both",
        })
    }
}

impl FromStr for SearchScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(SearchScope::Lost),
            "found" => Ok(SearchScope::Found),
            "both" => Ok(SearchScope::Both),
            other => Err(CoreError::Validation(format!(
                "Invalid search type '{other}'. Must be one of: lost, found, both"
            ))),
        }
    }
}

/// A free-text search request.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub query: String,
    pub scope: SearchScope,
    pub category: Option<String>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<(), CoreError> {
        if text::non_blank(&self.query).is_none() {
            return Err(CoreError::Validation("Search query is required".into()));
        }
        Ok(())
    }

    /// The query text with optional `category X`, `color X`, and
    /// `location X` qualifiers appended.
    pub fn composite_text(&self) -> String {
        let mut parts = vec![self.query.clone()];
        let qualifiers = [
            ("category", &self.category),
            ("color", &self.color),
            ("location", &self.location),
        ];
        for (label, value) in qualifiers {
            if let Some(value) = value.as_deref().and_then(text::non_blank) {
                parts.push(format!("{label} {value}"));
            }
        }
        parts.join(" ")
    }
}

/// A search result with its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub item: ItemProfile,
    pub similarity: f64,
}

/// Score every item against the query text, keep those above
/// [`SEARCH_MIN_SCORE`], and return the best `limit` in descending order.
///
/// No metadata filter is applied.
pub fn rank_search(query_text: &str, items: Vec<ItemProfile>, limit: usize) -> Vec<SearchHit> {
    let query_tokens = text::tokenize(query_text);

    let mut hits: Vec<SearchHit> = items
        .into_iter()
        .filter_map(|item| {
            let similarity = similarity::score_tokens(&query_tokens, &item.tokens());
            (similarity > SEARCH_MIN_SCORE).then_some(SearchHit { item, similarity })
        })
        .collect();

    hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    hits.truncate(limit);
    hits
}
