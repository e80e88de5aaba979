//! Metadata compatibility rules applied on top of the raw similarity score.
//!
//! A lost/found pair is accepted only when every rule holds: score threshold,
//! category equality, colour-group compatibility, date ordering and window,
//! and location proximity. Rules only fire when both sides carry the field.

use std::fmt;

use crate::error::CoreError;
use crate::item::ItemProfile;
use crate::similarity;
use crate::types::ItemDate;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;
pub const MIN_SIMILARITY_THRESHOLD: f64 = 0.0;
pub const MAX_SIMILARITY_THRESHOLD: f64 = 1.0;

/// Compatibility assigned to two distinct colours of the same group.
pub const SAME_GROUP_COLOR_COMPATIBILITY: f64 = 0.8;
pub const MIN_COLOR_COMPATIBILITY: f64 = 0.5;

/// Largest accepted gap between the lost date and the found date.
pub const MAX_DAYS_LOST_TO_FOUND: i64 = 365;

pub const MIN_LOCATION_SIMILARITY: f64 = 0.3;
/// Used when either side has no location.
pub const NEUTRAL_LOCATION_SIMILARITY: f64 = 0.5;
/// Used when one location string contains the other.
pub const CONTAINED_LOCATION_SIMILARITY: f64 = 0.8;

// ---------------------------------------------------------------------------
// Colour groups
// ---------------------------------------------------------------------------

/// Affinity groups of colour names considered interchangeable by reporters.
pub const COLOR_GROUPS: &[&[&str]] = &[
    &["red", "burgundy", "crimson", "scarlet"],
    &["blue", "navy", "azure", "cyan"],
    &["green", "emerald", "lime", "olive"],
    &["yellow", "gold", "amber"],
    &["black", "dark", "charcoal"],
    &["white", "cream", "ivory"],
    &["gray", "grey", "silver"],
    &["brown", "tan", "beige", "khaki"],
    &["purple", "violet", "magenta"],
    &["orange", "coral", "peach"],
];

/// Compatibility of two colour names in `[0.0, 1.0]`.
///
/// Equal names (ignoring case and surrounding whitespace) score `1.0`, two
/// members of the same [`COLOR_GROUPS`] entry score
/// [`SAME_GROUP_COLOR_COMPATIBILITY`], everything else `0.0`.
pub fn color_compatibility(color_a: &str, color_b: &str) -> f64 {
    let a = color_a.trim().to_lowercase();
    let b = color_b.trim().to_lowercase();

    if a == b {
        return 1.0;
    }

    let same_group = COLOR_GROUPS
        .iter()
        .any(|group| group.contains(&a.as_str()) && group.contains(&b.as_str()));

    if same_group {
        SAME_GROUP_COLOR_COMPATIBILITY
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Location proximity
// ---------------------------------------------------------------------------

/// Similarity of two free-form locations in `[0.0, 1.0]`.
pub fn location_similarity(location_a: Option<&str>, location_b: Option<&str>) -> f64 {
    let (Some(a), Some(b)) = (location_a, location_b) else {
        return NEUTRAL_LOCATION_SIMILARITY;
    };

    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return NEUTRAL_LOCATION_SIMILARITY;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return CONTAINED_LOCATION_SIMILARITY;
    }

    similarity::score(&a, &b)
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Why a candidate pair was turned away.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    BelowThreshold { score: f64, threshold: f64 },
    CategoryMismatch,
    ColorMismatch { compatibility: f64 },
    FoundBeforeLost,
    DateGapTooLarge { days: i64 },
    LocationTooFar { similarity: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::BelowThreshold { score, threshold } => {
                write!(f, "score {score:.3} below threshold {threshold:.3}")
            }
            Rejection::CategoryMismatch => f.write_str("categories differ"),
            Rejection::ColorMismatch { compatibility } => {
                write!(f, "colors incompatible ({compatibility:.2})")
            }
            Rejection::FoundBeforeLost => f.write_str("found date precedes lost date"),
            Rejection::DateGapTooLarge { days } => write!(f, "found {days} days after loss"),
            Rejection::LocationTooFar { similarity } => {
                write!(f, "locations too dissimilar ({similarity:.3})")
            }
        }
    }
}

/// Validate that a similarity threshold lies in `[0.0, 1.0]`.
pub fn validate_threshold(threshold: f64) -> Result<(), CoreError> {
    if !(MIN_SIMILARITY_THRESHOLD..=MAX_SIMILARITY_THRESHOLD).contains(&threshold) {
        return Err(CoreError::Validation(format!(
            "Similarity threshold must be between {MIN_SIMILARITY_THRESHOLD} and {MAX_SIMILARITY_THRESHOLD}, got {threshold}"
        )));
    }
    Ok(())
}

/// Accept/reject rules for a scored lost/found pair.
#[derive(Debug, Clone, Copy)]
pub struct MatchFilter {
    similarity_threshold: f64,
}

impl MatchFilter {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// `true` when the pair survives every rule.
    pub fn passes(&self, lost: &ItemProfile, found: &ItemProfile, score: f64) -> bool {
        self.evaluate(lost, found, score).is_ok()
    }

    /// Check every rule in order, reporting the first one that fails.
    pub fn evaluate(
        &self,
        lost: &ItemProfile,
        found: &ItemProfile,
        score: f64,
    ) -> Result<(), Rejection> {
        if score < self.similarity_threshold {
            return Err(Rejection::BelowThreshold {
                score,
                threshold: self.similarity_threshold,
            });
        }

        if let (Some(a), Some(b)) = (lost.category(), found.category()) {
            if a.to_lowercase() != b.to_lowercase() {
                return Err(Rejection::CategoryMismatch);
            }
        }

        if let (Some(a), Some(b)) = (lost.color(), found.color()) {
            let compatibility = color_compatibility(a, b);
            if compatibility < MIN_COLOR_COMPATIBILITY {
                return Err(Rejection::ColorMismatch { compatibility });
            }
        }

        check_dates(lost.date, found.date)?;

        let similarity = location_similarity(lost.location(), found.location());
        if similarity < MIN_LOCATION_SIMILARITY {
            return Err(Rejection::LocationTooFar { similarity });
        }

        Ok(())
    }
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

fn check_dates(lost: Option<ItemDate>, found: Option<ItemDate>) -> Result<(), Rejection> {
    let (Some(lost), Some(found)) = (lost, found) else {
        return Ok(());
    };

    if found < lost {
        return Err(Rejection::FoundBeforeLost);
    }

    let days = (found - lost).num_days();
    if days > MAX_DAYS_LOST_TO_FOUND {
        return Err(Rejection::DateGapTooLarge { days });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;
    use crate::item::Polarity;

    fn day0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn item(polarity: Polarity) -> ItemProfile {
        ItemProfile {
            id: 1,
            polarity,
            user_id: 1,
            title: "Wallet".into(),
            description: "Leather wallet".into(),
            category: "accessories".into(),
            color: Some("black".into()),
            brand: None,
            condition: None,
            location: "Central Park".into(),
            date: Some(day0()),
            image_url: None,
            feature_tokens: None,
        }
    }

    fn pair() -> (ItemProfile, ItemProfile) {
        (item(Polarity::Lost), item(Polarity::Found))
    }

    // -- Colour groups -------------------------------------------------------

    #[test]
    fn same_group_colors_are_compatible() {
        assert!(color_compatibility("navy", "blue") >= MIN_COLOR_COMPATIBILITY);
        assert_eq!(color_compatibility("Grey", "silver"), SAME_GROUP_COLOR_COMPATIBILITY);
    }

    #[test]
    fn cross_group_colors_are_incompatible() {
        assert_eq!(color_compatibility("red", "green"), 0.0);
    }

    #[test]
    fn unknown_colors_are_incompatible_unless_equal() {
        assert_eq!(color_compatibility("teal", "turquoise"), 0.0);
        assert_eq!(color_compatibility(" Teal ", "teal"), 1.0);
    }

    // -- Location ------------------------------------------------------------

    #[test]
    fn location_exact_match_ignores_case() {
        assert_eq!(location_similarity(Some("Central Park"), Some("central park ")), 1.0);
    }

    #[test]
    fn location_containment_scores_point_eight() {
        assert_eq!(
            location_similarity(Some("Central Park"), Some("Central Park, north gate")),
            CONTAINED_LOCATION_SIMILARITY
        );
    }

    #[test]
    fn location_missing_is_neutral() {
        assert_eq!(location_similarity(None, Some("Library")), NEUTRAL_LOCATION_SIMILARITY);
        assert_eq!(location_similarity(Some("Library"), None), NEUTRAL_LOCATION_SIMILARITY);
    }

    #[test]
    fn location_falls_back_to_text_score() {
        assert_eq!(location_similarity(Some("Union Station"), Some("Harbor Pier")), 0.0);
        let partial = location_similarity(Some("Grand Central Station"), Some("Central Station Mall"));
        assert!(partial > MIN_LOCATION_SIMILARITY);
    }

    // -- Filter rules --------------------------------------------------------

    #[test]
    fn compatible_pair_passes() {
        let (lost, found) = pair();
        assert!(MatchFilter::default().passes(&lost, &found, 0.9));
    }

    #[test]
    fn score_below_threshold_is_rejected() {
        let (lost, found) = pair();
        let verdict = MatchFilter::default().evaluate(&lost, &found, 0.69);
        assert!(matches!(verdict, Err(Rejection::BelowThreshold { .. })));
        assert!(MatchFilter::default().passes(&lost, &found, 0.7));
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let (lost, found) = pair();
        assert!(MatchFilter::new(0.5).passes(&lost, &found, 0.55));
        assert!(!MatchFilter::new(0.6).passes(&lost, &found, 0.55));
    }

    #[test]
    fn category_mismatch_is_rejected() {
        let (lost, mut found) = pair();
        found.category = "Electronics".into();
        assert_eq!(
            MatchFilter::default().evaluate(&lost, &found, 1.0),
            Err(Rejection::CategoryMismatch)
        );
    }

    #[test]
    fn category_compare_ignores_case() {
        let (lost, mut found) = pair();
        found.category = "ACCESSORIES".into();
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));
    }

    #[test]
    fn blank_category_skips_rule() {
        let (lost, mut found) = pair();
        found.category = String::new();
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));
    }

    #[test]
    fn color_group_mismatch_is_rejected() {
        let (lost, mut found) = pair();
        found.color = Some("white".into());
        assert!(matches!(
            MatchFilter::default().evaluate(&lost, &found, 1.0),
            Err(Rejection::ColorMismatch { .. })
        ));

        found.color = Some("charcoal".into());
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));
    }

    #[test]
    fn missing_color_skips_rule() {
        let (lost, mut found) = pair();
        found.color = None;
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));
    }

    #[test]
    fn found_one_day_before_lost_is_rejected() {
        let (lost, mut found) = pair();
        found.date = day0().checked_sub_days(Days::new(1));
        assert_eq!(
            MatchFilter::default().evaluate(&lost, &found, 1.0),
            Err(Rejection::FoundBeforeLost)
        );
    }

    #[test]
    fn found_366_days_after_is_rejected() {
        let (lost, mut found) = pair();
        found.date = day0().checked_add_days(Days::new(366));
        assert_eq!(
            MatchFilter::default().evaluate(&lost, &found, 1.0),
            Err(Rejection::DateGapTooLarge { days: 366 })
        );
    }

    #[test]
    fn found_within_window_is_accepted() {
        let (lost, mut found) = pair();
        found.date = day0().checked_add_days(Days::new(364));
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));

        found.date = day0().checked_add_days(Days::new(365));
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));
    }

    #[test]
    fn missing_date_skips_rule() {
        let (lost, mut found) = pair();
        found.date = None;
        assert!(MatchFilter::default().passes(&lost, &found, 1.0));
    }

    #[test]
    fn distant_location_is_rejected() {
        let (lost, mut found) = pair();
        found.location = "Airport Terminal".into();
        assert!(matches!(
            MatchFilter::default().evaluate(&lost, &found, 1.0),
            Err(Rejection::LocationTooFar { .. })
        ));
    }

    #[test]
    fn threshold_validation_bounds() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(0.7).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(-0.1).is_err());
    }
}
