//! Engine options.
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```
//! use territory_rebalance::config::{AccountOrder, BalanceStrategy, RebalanceOptions};
//!
//! let options = RebalanceOptions::from_toml_str(r#"
//!     account_order = "input"
//!     balance_strategy = "linear_scan"
//!     parallel_territories = true
//!     scenario_name = "Radical Reroute"
//! "#).unwrap();
//!
//! assert_eq!(options.account_order, AccountOrder::Input);
//! assert_eq!(options.balance_strategy, BalanceStrategy::LinearScan);
//! assert!(options.parallel_territories);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Order in which valid accounts are fed to the passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOrder {
    /// Stable sort by account id. Makes results independent of input order.
    #[default]
    ById,
    /// Keep the caller's order.
    Input,
}

/// How the balancing pass finds the neediest route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStrategy {
    /// Max-heap keyed by deficit, O(A log R) per territory.
    #[default]
    PriorityQueue,
    /// Rescan every route per account, O(A * R) per territory.
    LinearScan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RebalanceOptions {
    pub account_order: AccountOrder,
    pub balance_strategy: BalanceStrategy,
    /// Balance independent territories on the rayon pool.
    pub parallel_territories: bool,
    /// Copied into the scenario output.
    pub scenario_name: Option<String>,
}

impl RebalanceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses options from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_account_order(mut self, order: AccountOrder) -> Self {
        self.account_order = order;
        self
    }

    pub fn with_balance_strategy(mut self, strategy: BalanceStrategy) -> Self {
        self.balance_strategy = strategy;
        self
    }

    pub fn with_parallel_territories(mut self, parallel: bool) -> Self {
        self.parallel_territories = parallel;
        self
    }

    pub fn with_scenario_name(mut self, name: impl Into<String>) -> Self {
        self.scenario_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let options = RebalanceOptions::from_toml_str("").unwrap();
        assert_eq!(options, RebalanceOptions::default());
        assert_eq!(options.account_order, AccountOrder::ById);
        assert_eq!(options.balance_strategy, BalanceStrategy::PriorityQueue);
        assert!(!options.parallel_territories);
        assert!(options.scenario_name.is_none());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let err = RebalanceOptions::from_toml_str("balance_strategy = \"simulated_annealing\"")
            .unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "parallel_territories = true").unwrap();
        writeln!(file, "scenario_name = \"Q3 reroute\"").unwrap();

        let options = RebalanceOptions::load(file.path()).unwrap();
        assert!(options.parallel_territories);
        assert_eq!(options.scenario_name.as_deref(), Some("Q3 reroute"));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let options = RebalanceOptions::load("/nonexistent/rebalance.toml").unwrap_or_default();
        assert_eq!(options, RebalanceOptions::default());
    }
}
