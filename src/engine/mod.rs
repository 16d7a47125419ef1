//! Decision layer for update prompts
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │   Fetcher   │────▶│   Checker   │────▶│ Presentation │
//! │ (metadata)  │     │   (cycle)   │     │  (adapter)   │
//! └─────────────┘     └─────────────┘     └──────────────┘
//!                       │         ▲
//!                       ▼         │
//!               ┌─────────────┐ ┌─────────────┐
//!               │  Decision   │ │    Store    │
//!               │  (rules)    │ │   (state)   │
//!               └─────────────┘ └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`decision`]: Pure decision function and interaction handling
//! - [`checker`]: Async check cycle with single-flight guard and persistence

pub mod checker;
pub mod decision;

pub use checker::{CheckOutcome, UpdateChecker};
pub use decision::{Action, DecisionEngine, Interaction};
