//! Fail-fast validation chains gating bid submissions and updates.
//!
//! A caller builds a [`ValidationContext`](context::ValidationContext),
//! hands it to the [`ValidationService`](service::ValidationService) entry
//! point for its use case and gets back a
//! [`ValidationOutcome`](outcome::ValidationOutcome). Only on success does it
//! go on to persist the (possibly normalised) bid and send notifications.

pub mod actor;
pub mod bid;
pub mod chain;
pub mod context;
pub mod error;
pub mod notify;
pub mod outcome;
pub mod pricing;
pub mod rules;
pub mod service;
pub mod settings;
pub mod store;
pub mod utils;
