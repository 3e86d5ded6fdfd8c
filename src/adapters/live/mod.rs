//! Live adapters for real external interactions.

pub mod api;
pub mod clock;
pub mod filesystem;
