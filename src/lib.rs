//! territory-rebalance
//!
//! Greedy, reproducible reassignment of customer accounts to field-service
//! routes: keep what still fits, balance each territory toward route minimums,
//! bootstrap new-hire routes into the neediest territories, and pool the rest.

pub mod traits;
pub mod error;
pub mod config;
pub mod records;
pub mod normalize;
pub mod pass;
pub mod retention;
pub mod balance;
pub mod bootstrap;
pub mod report;
pub mod scenario;
pub mod engine;

pub use config::RebalanceOptions;
pub use engine::{rebalance, rebalance_at};
pub use error::{ConfigError, Error};
pub use scenario::Scenario;
