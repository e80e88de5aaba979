//! Match lifecycle and claim verification workflows.
//!
//! [`MatchLifecycle`] scores a new report against the opposite pool and
//! records, confirms, or rejects pairings. [`ClaimEngine`] issues and checks
//! image-recognition challenges for ownership claims. Both run every
//! multi-row change inside one database transaction and publish a
//! [`MatchEvent`](lostfound_events::MatchEvent) once it commits.

pub mod claims;
pub mod config;
pub mod error;
pub mod lifecycle;

pub use claims::{ClaimEngine, ClaimVerification, InitiateClaim};
pub use config::MatchingConfig;
pub use error::{MatchingError, MatchingResult};
pub use lifecycle::MatchLifecycle;
