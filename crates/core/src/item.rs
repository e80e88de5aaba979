//! Polarity-neutral view of a lost or found report.
//!
//! The persistence layer keeps lost and found reports in separate tables; the
//! matching logic only ever sees [`ItemProfile`], which carries the fields the
//! scorer and metadata filter read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::text;
use crate::types::{DbId, ItemDate};

/// Whether a report describes something lost or something found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Lost,
    Found,
}

impl Polarity {
    /// The polarity a candidate pool is drawn from.
    pub fn opposite(self) -> Self {
        match self {
            Polarity::Lost => Polarity::Found,
            Polarity::Found => Polarity::Lost,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Lost => "lost",
            Polarity::Found => "found",
        }
    }

    /// Orient a (subject, candidate) id pair as `(lost_id, found_id)`.
    pub fn orient(self, subject_id: DbId, candidate_id: DbId) -> (DbId, DbId) {
        match self {
            Polarity::Lost => (subject_id, candidate_id),
            Polarity::Found => (candidate_id, subject_id),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(Polarity::Lost),
            "found" => Ok(Polarity::Found),
            other => Err(CoreError::Validation(format!(
                "Invalid item type '{other}'. Must be one of: lost, found"
            ))),
        }
    }
}

/// The fields of an item report that matching and claims operate on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemProfile {
    pub id: DbId,
    pub polarity: Polarity,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    /// Only found reports record the condition the item was found in.
    pub condition: Option<String>,
    pub location: String,
    pub date: Option<ItemDate>,
    pub image_url: Option<String>,
    /// Cached normalized tokens of [`ItemProfile::text`], if already computed.
    pub feature_tokens: Option<Vec<String>>,
}

impl ItemProfile {
    /// The canonical text representation used for scoring.
    pub fn text(&self) -> String {
        text::item_text(self)
    }

    /// Normalized tokens of the item text, preferring the cached copy.
    pub fn tokens(&self) -> Vec<String> {
        match &self.feature_tokens {
            Some(cached) => cached.clone(),
            None => text::tokenize(&self.text()),
        }
    }

    pub fn category(&self) -> Option<&str> {
        text::non_blank(&self.category)
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref().and_then(text::non_blank)
    }

    pub fn location(&self) -> Option<&str> {
        text::non_blank(&self.location)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().and_then(text::non_blank)
    }
}
