//! Image-recognition challenge that gates ownership claims on found items.
//!
//! A challenge shows the target item's image among up to
//! [`MAX_DISTRACTORS`] images of other items. Distractors are sampled and the
//! option list shuffled with a caller-supplied random source, so a seeded
//! generator gives a reproducible challenge.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::item::{ItemProfile, Polarity};

/// Upper bound on wrong options shown next to the correct one.
pub const MAX_DISTRACTORS: usize = 3;

pub const QUESTION_TEXT: &str =
    "Based on your description, select the image that best matches your item.";

/// Which pool a claimed item lives in.
pub type ClaimTarget = Polarity;

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOption {
    pub id: String,
    pub label: String,
    pub image_url: String,
}

/// A fully assembled challenge, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub question_text: String,
    pub options: Vec<ChallengeOption>,
    pub correct_option_id: String,
}

impl Challenge {
    pub fn correct_option(&self) -> Option<&ChallengeOption> {
        self.options.iter().find(|o| o.id == self.correct_option_id)
    }
}

/// Outcome of checking a claimant's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    Passed,
    Failed,
}

impl AnswerVerdict {
    pub fn is_passed(self) -> bool {
        self == AnswerVerdict::Passed
    }
}

// ---------------------------------------------------------------------------
// Distractor pool
// ---------------------------------------------------------------------------

/// Collect the distinct distractor images for `target`.
///
/// `same_category` holds opposite-polarity items of the target's category;
/// `any_with_image` holds items of either polarity. The wider pool is only
/// consulted when the narrow one yields fewer than [`MAX_DISTRACTORS`]
/// images. The target item and its image never enter the pool, and no image
/// appears twice.
pub fn distractor_pool(
    target: &ItemProfile,
    same_category: &[ItemProfile],
    any_with_image: &[ItemProfile],
) -> Vec<String> {
    let target_image = target.image_url().unwrap_or_default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pool = Vec::new();

    let mut extend = |items: &[ItemProfile], pool: &mut Vec<String>| {
        for item in items {
            if item.polarity == target.polarity && item.id == target.id {
                continue;
            }
            let Some(image) = item.image_url() else {
                continue;
            };
            if image == target_image || !seen.insert(image.to_string()) {
                continue;
            }
            pool.push(image.to_string());
        }
    };

    extend(same_category, &mut pool);
    if pool.len() < MAX_DISTRACTORS {
        extend(any_with_image, &mut pool);
    }

    pool
}

// ---------------------------------------------------------------------------
// Challenge assembly
// ---------------------------------------------------------------------------

/// Build a challenge around `target_image` using images from `pool`.
///
/// Up to [`MAX_DISTRACTORS`] images are sampled without replacement, the
/// options are shuffled, then labelled by final position. The correct id is
/// read back from the shuffled list.
pub fn build_challenge<R: Rng + ?Sized>(
    target_image: &str,
    pool: &[String],
    rng: &mut R,
) -> Result<Challenge, CoreError> {
    if target_image.trim().is_empty() {
        return Err(CoreError::Validation(
            "Item has no image to build a claim challenge from".into(),
        ));
    }

    let candidates: Vec<&String> = pool.iter().filter(|image| *image != target_image).collect();

    let mut images: Vec<String> = Vec::with_capacity(MAX_DISTRACTORS + 1);
    images.push(target_image.to_string());
    images.extend(
        candidates
            .choose_multiple(rng, MAX_DISTRACTORS)
            .map(|image| (*image).clone()),
    );

    let mut options: Vec<ChallengeOption> = images
        .into_iter()
        .map(|image_url| ChallengeOption {
            id: option_id(rng),
            label: String::new(),
            image_url,
        })
        .collect();

    options.shuffle(rng);

    for (position, option) in options.iter_mut().enumerate() {
        option.label = option_label(position);
    }

    let correct_option_id = options
        .iter()
        .find(|option| option.image_url == target_image)
        .map(|option| option.id.clone())
        .ok_or_else(|| CoreError::Internal("Challenge lost its correct option".into()))?;

    Ok(Challenge {
        question_text: QUESTION_TEXT.to_string(),
        options,
        correct_option_id,
    })
}

/// Compare the selected option id against the correct one.
pub fn evaluate_answer(correct_option_id: &str, selected_option_id: &str) -> AnswerVerdict {
    if selected_option_id == correct_option_id {
        AnswerVerdict::Passed
    } else {
        AnswerVerdict::Failed
    }
}

fn option_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.random();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .simple()
        .to_string()
}

fn option_label(position: usize) -> String {
    let letter = (b'A' + (position % 26) as u8) as char;
    format!("Option {letter}")
}
