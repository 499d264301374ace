//! # Arena Lens
//!
//! A headless client for browsing and moderating arena battle statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (summaries, comments, submissions, users)
//! - **query**: Filter-to-query-string composition for the stats API
//! - **paging**: Page-window math for pagination controls
//! - **threads**: Flat-to-threaded comment reconstruction
//! - **client**: Typed REST client for the externally-owned stats service
//! - **catalog**: Cached student reference data from the third-party catalog
//! - **controller**: Page controllers wiring fetch, transform, and notification
//! - **auth** / **store** / **notify**: injected capability seams
//! - **config**: Configuration loading and validation

pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod controller;
pub mod models;
pub mod notify;
pub mod paging;
pub mod query;
pub mod store;
pub mod threads;

pub use models::*;
