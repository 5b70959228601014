//! Command implementations for the `finsum` binary

pub mod setup;
pub mod summary;
pub mod ui;
