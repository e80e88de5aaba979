//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that take part in a
//! multi-statement unit of work accept a `&mut DbTransaction` instead.

pub mod claim_repo;
pub mod found_item_repo;
pub mod lost_item_repo;
pub mod match_repo;

pub use claim_repo::ClaimRepo;
pub use found_item_repo::FoundItemRepo;
pub use lost_item_repo::LostItemRepo;
pub use match_repo::MatchRepo;
