//! Report generator: per-route and per-territory summaries and the final
//! scenario. Pure function of the finished passes and the roster.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::bootstrap::Binding;
use crate::normalize::{DropTally, Roster};
use crate::pass::Placement;
use crate::scenario::{
    Assignment, FLOATER_ROUTE_ID, FLOATER_TECHNICIAN, FloaterRoute, RouteSummary, Scenario, Summary,
    TerritorySummary,
};
use crate::traits::{AssignmentStatus, Capacity, Route};

/// Everything the passes produced.
#[derive(Debug, Default)]
pub struct Ledger<'a> {
    /// Kept, reassigned and new-hire placements in pass order.
    pub placed: Vec<Placement<'a>>,
    pub floater_pool: Vec<Placement<'a>>,
    pub bindings: Vec<Binding<'a>>,
    pub dropped: DropTally,
    pub territories: BTreeSet<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
struct RouteTally {
    assigned: usize,
    kept: usize,
}

pub fn assemble<'a, R: Route>(
    ledger: &Ledger<'a>,
    roster: &Roster<'a, R>,
    scenario_name: Option<String>,
    generated_at: DateTime<Utc>,
) -> Scenario {
    let bound: HashMap<&str, Option<&str>> = ledger
        .bindings
        .iter()
        .map(|binding| (binding.route_id, binding.territory))
        .collect();
    let territory_of = |route: &'a R| -> Option<&'a str> {
        if route.is_new_hire_route() {
            bound.get(route.id()).copied().flatten()
        } else {
            route.territory()
        }
    };

    let mut tallies: HashMap<&str, RouteTally> = HashMap::new();
    for placement in &ledger.placed {
        if let Some(route_id) = placement.route_id {
            let tally = tallies.entry(route_id).or_default();
            tally.assigned += 1;
            if placement.status == AssignmentStatus::Kept {
                tally.kept += 1;
            }
        }
    }

    let mut route_summaries: Vec<RouteSummary> = roster
        .iter()
        .map(|route| {
            let tally = tallies.get(route.id()).copied().unwrap_or_default();
            let capacity = Capacity::of(route);
            RouteSummary {
                route_id: route.id().to_string(),
                technician_name: route.technician_name().to_string(),
                territory: territory_of(route).map(str::to_string),
                is_floater_route: route.is_floater_route(),
                is_new_hire_route: route.is_new_hire_route(),
                assigned_count: tally.assigned,
                capacity_min: capacity.min,
                capacity_max: capacity.max,
                kept_from_original: tally.kept,
                added_new: tally.assigned - tally.kept,
                meets_target: route.is_floater_route() || capacity.meets_target(tally.assigned),
            }
        })
        .collect();
    route_summaries.push(RouteSummary {
        route_id: FLOATER_ROUTE_ID.to_string(),
        technician_name: FLOATER_TECHNICIAN.to_string(),
        territory: None,
        is_floater_route: true,
        is_new_hire_route: false,
        assigned_count: ledger.floater_pool.len(),
        capacity_min: None,
        capacity_max: None,
        kept_from_original: 0,
        added_new: ledger.floater_pool.len(),
        meets_target: true,
    });

    let mut territories: BTreeSet<&str> = ledger.territories.clone();
    territories.extend(ledger.placed.iter().chain(&ledger.floater_pool).map(|p| p.territory));

    let territory_summaries: Vec<TerritorySummary> = territories
        .iter()
        .map(|&territory| {
            let serving: Vec<&R> = roster
                .iter()
                .filter(|route| !route.is_floater_route())
                .filter(|route| territory_of(*route) == Some(territory))
                .collect();
            let route_capacity = serving
                .iter()
                .map(|route| route.capacity_max())
                .sum::<Option<usize>>();
            let assigned_count = ledger
                .placed
                .iter()
                .filter(|p| p.territory == territory)
                .count();
            let floater_count = ledger
                .floater_pool
                .iter()
                .filter(|p| p.territory == territory)
                .count();

            TerritorySummary {
                territory: territory.to_string(),
                total_accounts: assigned_count + floater_count,
                assigned_count,
                route_count: serving.len(),
                route_capacity,
                floater_count,
            }
        })
        .collect();

    let territory_totals: BTreeMap<String, usize> = territory_summaries
        .iter()
        .map(|summary| (summary.territory.clone(), summary.total_accounts))
        .collect();

    let to_assignment = |placement: &Placement<'_>| -> Assignment {
        let (route_id, technician_name) = match placement.route_id {
            Some(route_id) => (
                route_id,
                roster.get(route_id).map_or("", |route| route.technician_name()),
            ),
            None => (FLOATER_ROUTE_ID, FLOATER_TECHNICIAN),
        };
        Assignment {
            account_id: placement.account_id.to_string(),
            route_id: route_id.to_string(),
            technician_name: technician_name.to_string(),
            territory: placement.territory.to_string(),
            status: placement.status,
        }
    };

    let assignments: Vec<Assignment> = ledger.placed.iter().map(to_assignment).collect();
    let floater_pool: Vec<Assignment> = ledger.floater_pool.iter().map(to_assignment).collect();

    let floater_routes = roster
        .floaters()
        .map(|route| FloaterRoute {
            route_id: route.id().to_string(),
            technician_name: route.technician_name().to_string(),
            territory: route.territory().map(str::to_string),
        })
        .collect();

    Scenario {
        scenario: scenario_name,
        generated_at,
        summary: Summary {
            total_accounts: assignments.len() + floater_pool.len(),
            total_assigned: assignments.len(),
            floater_pool_size: floater_pool.len(),
            dropped_count: ledger.dropped.total(),
            dropped_missing_id: ledger.dropped.missing_id,
            dropped_invalid_location: ledger.dropped.invalid_location,
            territory_totals,
        },
        route_summaries,
        territory_summaries,
        floater_routes,
        assignments,
        floater_pool,
    }
}
