//! Test fixtures for territory-rebalance.
//!
//! Provides realistic test data including:
//! - A Miami-Dade roster with floater and new-hire routes
//! - Account generators anchored on each territory

pub mod miami_roster;

pub use miami_roster::*;
