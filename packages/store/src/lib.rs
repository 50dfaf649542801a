// ABOUTME: Milemap application state: one constructible store mirroring the remote dataset
// ABOUTME: CRUD confirms remotely before merging locally; views derive from the merged state

pub mod actions;
pub mod error;
mod state;
pub mod store;

pub use error::StoreError;
pub use store::{RoadmapStore, ANALYSIS_LOG_LIMIT, ERROR_AUTOCLEAR};
