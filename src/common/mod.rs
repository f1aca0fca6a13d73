//! Contains datastructures used throughout the crate.
//!
//! - Runtime data and tokens.
//! - The error kinds every fallible operation reports.
//! - Session configuration, including the error policy.

pub mod config;
pub mod data;
pub mod error;
pub mod token;
