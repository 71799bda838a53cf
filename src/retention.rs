//! Retention pass: keep accounts on their current route when still compatible.

use std::collections::HashMap;

use tracing::info;

use crate::normalize::{Candidate, Roster, is_regular};
use crate::pass::{PassOutcome, Placement};
use crate::traits::{Account, AssignmentStatus, Capacity, Route};

/// Single left-to-right scan. An account stays on its current route when the
/// route exists, is regular, serves the account's territory and still has
/// room under its ceiling.
pub fn retain<'a, A, R>(accounts: Vec<Candidate<'a, A>>, roster: &Roster<'a, R>) -> PassOutcome<'a, A>
where
    A: Account,
    R: Route,
{
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    let mut outcome = PassOutcome::default();

    for candidate in accounts {
        if let Some(route) = retention_route(&candidate, roster) {
            let count = counts.entry(route.id()).or_default();
            if Capacity::of(route).has_room(*count) {
                *count += 1;
                outcome
                    .placed
                    .push(Placement::on_route(candidate, route.id(), AssignmentStatus::Kept));
                continue;
            }
        }
        outcome.unassigned.push(candidate);
    }

    info!(
        kept = outcome.placed.len(),
        unassigned = outcome.unassigned.len(),
        "retention pass complete"
    );

    outcome
}

fn retention_route<'a, A, R>(candidate: &Candidate<'a, A>, roster: &Roster<'a, R>) -> Option<&'a R>
where
    A: Account,
    R: Route,
{
    let account: &'a A = candidate.account;
    let route = roster.get(account.current_route_id()?)?;
    (is_regular(route) && route.territory() == Some(candidate.territory)).then_some(route)
}
