//! Overflow bootstrap: bind new-hire routes to the neediest territories and
//! fill them.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::{debug, info};

use crate::normalize::{Candidate, Roster};
use crate::pass::{PassOutcome, Placement};
use crate::traits::{Account, AssignmentStatus, Capacity, Route};

/// Territory chosen for a new-hire route. `None` when no territory is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    pub route_id: &'a str,
    pub territory: Option<&'a str>,
}

#[derive(Debug)]
pub struct BootstrapOutcome<'a, A> {
    pub pass: PassOutcome<'a, A>,
    pub bindings: Vec<Binding<'a>>,
}

/// Territories ordered by remaining demand, largest first, ties by name.
pub fn rank_territories<'a>(remaining: &BTreeMap<&'a str, usize>) -> Vec<&'a str> {
    let mut ranked: Vec<(&'a str, usize)> = remaining.iter().map(|(t, n)| (*t, *n)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().map(|(territory, _)| territory).collect()
}

/// One-shot: new hire `i` (roster order) takes `ranked[i % len]`, then fills
/// from that territory's leftovers up to its ceiling.
///
/// `territories` lists every known territory so that zero-demand territories
/// still take part in the rotation.
pub fn bootstrap<'a, A, R>(
    unassigned: Vec<Candidate<'a, A>>,
    roster: &Roster<'a, R>,
    territories: &BTreeSet<&'a str>,
) -> BootstrapOutcome<'a, A>
where
    A: Account,
    R: Route,
{
    let mut queues: BTreeMap<&'a str, VecDeque<Candidate<'a, A>>> =
        territories.iter().map(|t| (*t, VecDeque::new())).collect();
    for candidate in unassigned {
        queues.entry(candidate.territory).or_default().push_back(candidate);
    }

    let remaining: BTreeMap<&'a str, usize> = queues.iter().map(|(t, q)| (*t, q.len())).collect();
    let ranked = rank_territories(&remaining);

    let mut placed = Vec::new();
    let mut bindings = Vec::new();

    for (i, route) in roster.new_hires().enumerate() {
        let territory = if ranked.is_empty() {
            None
        } else {
            Some(ranked[i % ranked.len()])
        };

        if let Some(preset) = route.territory() {
            if Some(preset) != territory {
                debug!(route_id = route.id(), preset, "ignoring preset territory on new-hire route");
            }
        }

        bindings.push(Binding {
            route_id: route.id(),
            territory,
        });

        let Some(territory) = territory else {
            debug!(route_id = route.id(), "no territory available for new-hire route");
            continue;
        };

        let capacity = Capacity::of(route);
        let mut count = 0;
        if let Some(queue) = queues.get_mut(territory) {
            while capacity.has_room(count) {
                let Some(candidate) = queue.pop_front() else {
                    break;
                };
                count += 1;
                placed.push(Placement::on_route(candidate, route.id(), AssignmentStatus::NewHire));
            }
        }

        info!(route_id = route.id(), territory, accounts = count, "new-hire route bootstrapped");
    }

    let unassigned: Vec<Candidate<'a, A>> = queues.into_values().flatten().collect();

    BootstrapOutcome {
        pass: PassOutcome { placed, unassigned },
        bindings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountOrder;
    use crate::normalize::normalize;
    use crate::records::{AccountRecord, RouteRecord};

    fn accounts(territory: &str, count: usize) -> Vec<AccountRecord> {
        (0..count)
            .map(|i| AccountRecord::new(format!("{territory}-{i:02}"), territory).at(25.7, -80.3))
            .collect()
    }

    fn known<'a>(names: &[&'a str]) -> BTreeSet<&'a str> {
        names.iter().copied().collect()
    }

    #[test]
    fn test_rank_by_demand_then_name() {
        let remaining: BTreeMap<&str, usize> =
            [("North", 3), ("Central", 7), ("South", 3), ("Keys", 0)].into_iter().collect();
        assert_eq!(rank_territories(&remaining), vec!["Central", "North", "South", "Keys"]);
    }

    #[test]
    fn test_round_robin_binding() {
        let mut input_accounts = accounts("Central", 5);
        input_accounts.extend(accounts("North", 3));
        input_accounts.extend(accounts("South", 1));
        let routes = vec![
            RouteRecord::new("14", "New (14)").new_hire().capacity(1, 2),
            RouteRecord::new("15", "New (15)").new_hire().capacity(1, 2),
            RouteRecord::new("16", "New (16)").new_hire().capacity(1, 2),
            RouteRecord::new("17", "New (17)").new_hire().capacity(1, 2),
        ];
        let input = normalize(&input_accounts, &routes, AccountOrder::ById).unwrap();

        let outcome = bootstrap(
            input.accounts,
            &input.roster,
            &known(&["Central", "North", "South"]),
        );
        let bound: Vec<_> = outcome.bindings.iter().map(|b| b.territory.unwrap()).collect();
        assert_eq!(bound, vec!["Central", "North", "South", "Central"]);

        // Central: 2 + 2, North: 2, South: 1.
        assert_eq!(outcome.pass.placed.len(), 7);
        assert!(outcome.pass.placed.iter().all(|p| p.status == AssignmentStatus::NewHire));
        let leftover: Vec<_> = outcome.pass.unassigned.iter().map(|c| c.id).collect();
        assert_eq!(leftover, vec!["Central-04", "North-02"]);
    }

    #[test]
    fn test_zero_demand_territories_still_rotate() {
        let input_accounts = accounts("North", 4);
        let routes = vec![
            RouteRecord::new("N1", "New 1").new_hire().capacity(0, 10),
            RouteRecord::new("N2", "New 2").new_hire().capacity(0, 10),
        ];
        let input = normalize(&input_accounts, &routes, AccountOrder::ById).unwrap();

        let outcome = bootstrap(input.accounts, &input.roster, &known(&["North", "South"]));
        let bound: Vec<_> = outcome.bindings.iter().map(|b| b.territory.unwrap()).collect();
        assert_eq!(bound, vec!["North", "South"]);
        assert_eq!(outcome.pass.placed.len(), 4);
        assert!(outcome.pass.placed.iter().all(|p| p.route_id == Some("N1")));
    }

    #[test]
    fn test_no_known_territory_leaves_route_unbound() {
        let input_accounts: Vec<AccountRecord> = Vec::new();
        let routes = vec![RouteRecord::new("N1", "New").new_hire().capacity(1, 2)];
        let input = normalize(&input_accounts, &routes, AccountOrder::ById).unwrap();

        let outcome = bootstrap(input.accounts, &input.roster, &BTreeSet::new());
        assert_eq!(
            outcome.bindings,
            vec![Binding {
                route_id: "N1",
                territory: None
            }]
        );
        assert!(outcome.pass.placed.is_empty());
    }

    #[test]
    fn test_preset_territory_is_overridden() {
        let mut input_accounts = accounts("South", 2);
        input_accounts.extend(accounts("North", 1));
        let routes = vec![RouteRecord::new("N1", "New").new_hire().in_territory("TBD").capacity(1, 5)];
        let input = normalize(&input_accounts, &routes, AccountOrder::ById).unwrap();

        let outcome = bootstrap(input.accounts, &input.roster, &known(&["North", "South"]));
        assert_eq!(outcome.bindings[0].territory, Some("South"));
        assert_eq!(outcome.pass.placed.len(), 2);
    }
}
