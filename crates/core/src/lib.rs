//! Domain logic for matching lost and found reports and verifying claims.
//!
//! Nothing in this crate touches the database; the `lostfound-db` and
//! `lostfound-matching` crates supply rows and persist results.

pub mod claim_challenge;
pub mod error;
pub mod item;
pub mod match_filter;
pub mod matching;
pub mod similarity;
pub mod text;
pub mod types;
