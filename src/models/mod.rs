//! Core data models for the upgrade tracker.

mod counts;

pub use counts::*;
