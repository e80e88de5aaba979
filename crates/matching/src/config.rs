use lostfound_core::error::CoreError;
use lostfound_core::match_filter::{self, MatchFilter, DEFAULT_SIMILARITY_THRESHOLD};
use lostfound_core::matching::{DEFAULT_MATCH_LIMIT, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};

/// Matching configuration loaded from environment variables.
///
/// All fields have defaults matching the tuned production values.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Minimum combined score for a candidate match (default: `0.7`).
    pub similarity_threshold: f64,
    /// Candidates persisted per submission (default: `10`).
    pub match_limit: usize,
    /// Search results returned when the caller gives no limit (default: `20`).
    pub search_limit: usize,
}

impl MatchingConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `SIMILARITY_THRESHOLD` | `0.7`   |
    /// | `MATCH_LIMIT`          | `10`    |
    /// | `SEARCH_LIMIT`         | `20`    |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let similarity_threshold = match lookup("SIMILARITY_THRESHOLD") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                CoreError::Validation(format!("SIMILARITY_THRESHOLD must be a number, got '{raw}'"))
            })?,
            None => DEFAULT_SIMILARITY_THRESHOLD,
        };
        match_filter::validate_threshold(similarity_threshold)?;

        let match_limit = parse_limit(&lookup, "MATCH_LIMIT", DEFAULT_MATCH_LIMIT)?;
        let search_limit = parse_limit(&lookup, "SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT)?
            .clamp(1, MAX_SEARCH_LIMIT);

        Ok(Self {
            similarity_threshold,
            match_limit,
            search_limit,
        })
    }

    /// The metadata filter configured with this threshold.
    pub fn filter(&self) -> MatchFilter {
        MatchFilter::new(self.similarity_threshold)
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            match_limit: DEFAULT_MATCH_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

fn parse_limit<F>(lookup: &F, key: &str, default: usize) -> Result<usize, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(CoreError::Validation(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}
