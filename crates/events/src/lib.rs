//! Event bus for the matching and claim workflows.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MatchEvent`]: the events published after a workflow commits.
//! - [`EventLog`]: background listener that records every event through
//!   `tracing`.

pub mod bus;
pub mod log;

pub use bus::{EventBus, MatchEvent};
pub use log::EventLog;
