//! # Upgrade Tracker
//!
//! A local dashboard for recording and visualizing item-upgrade
//! success/fail counts.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (stage counts, counter tables)
//! - **calculate**: Observed-rate computation
//! - **storage**: JSONL count-row store behind the summary endpoint
//! - **api**: REST API endpoints
//! - **fetch**: One-shot summary client
//! - **present**: Donut series, rate captions, and report formatting
//! - **view**: Dashboard view state (server table + local edits)
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod present;
pub mod storage;
pub mod view;

pub use models::*;
