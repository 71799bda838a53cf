//! Territory/route rebalancing engine.
//!
//! Runs the passes strictly in order, each consuming the previous pass's
//! unassigned set:
//!
//! 1. normalize (roster validation, account filtering)
//! 2. retention
//! 3. balancing
//! 4. new-hire bootstrap
//! 5. floater pool
//! 6. report

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::balance::balance;
use crate::bootstrap::bootstrap;
use crate::config::RebalanceOptions;
use crate::error::ConfigError;
use crate::normalize::{Candidate, normalize};
use crate::pass::{Loads, Placement};
use crate::report::{Ledger, assemble};
use crate::retention::retain;
use crate::scenario::Scenario;
use crate::traits::{Account, Route};

/// Runs the engine and stamps the scenario with the current time.
pub fn rebalance<A, R>(accounts: &[A], routes: &[R], options: &RebalanceOptions) -> Result<Scenario, ConfigError>
where
    A: Account + Sync,
    R: Route,
{
    rebalance_at(accounts, routes, options, Utc::now())
}

/// Runs the engine with a caller-supplied `generatedAt`.
///
/// Fails before any pass runs when the roster is malformed. Identical inputs
/// and timestamp produce identical scenarios.
#[instrument(skip_all, fields(accounts = accounts.len(), routes = routes.len()))]
pub fn rebalance_at<A, R>(
    accounts: &[A],
    routes: &[R],
    options: &RebalanceOptions,
    generated_at: DateTime<Utc>,
) -> Result<Scenario, ConfigError>
where
    A: Account + Sync,
    R: Route,
{
    let input = normalize(accounts, routes, options.account_order)?;
    let roster = &input.roster;

    let mut territories: BTreeSet<&str> = roster.territories();
    territories.extend(input.accounts.iter().map(|candidate| candidate.territory));

    info!(
        valid = input.accounts.len(),
        dropped = input.dropped.total(),
        territories = territories.len(),
        "input normalized"
    );

    let retained = retain(input.accounts, roster);
    let loads = Loads::from_placements(&retained.placed);
    let balanced = balance(retained.unassigned, roster, &loads, options);
    let bootstrapped = bootstrap(balanced.unassigned, roster, &territories);
    let floater_pool = floater_pool(bootstrapped.pass.unassigned);

    let mut placed = retained.placed;
    placed.extend(balanced.placed);
    placed.extend(bootstrapped.pass.placed);

    if !floater_pool.is_empty() {
        warn!(floater = floater_pool.len(), "accounts left in the floater pool");
    }

    let ledger = Ledger {
        placed,
        floater_pool,
        bindings: bootstrapped.bindings,
        dropped: input.dropped,
        territories,
    };

    let scenario = assemble(&ledger, roster, options.scenario_name.clone(), generated_at);
    info!(
        assigned = scenario.summary.total_assigned,
        floater = scenario.summary.floater_pool_size,
        "rebalance complete"
    );
    Ok(scenario)
}

/// Everything still unplaced goes to the pool. No capacity applies.
fn floater_pool<'a, A>(unassigned: Vec<Candidate<'a, A>>) -> Vec<Placement<'a>> {
    unassigned.into_iter().map(Placement::floater).collect()
}
