//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod claim;
pub mod found_item;
pub mod item_match;
pub mod lost_item;
pub mod status;
