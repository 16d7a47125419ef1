//! Update-check rules engine
//!
//! Decides, from version metadata and prior prompt history, whether and how
//! to prompt a user to update. Fetching metadata, persisting history and
//! rendering alerts are collaborators behind traits.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod present;
pub mod rules;
pub mod store;
pub mod version;
