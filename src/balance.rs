//! Balancing pass: lift every regular route toward its minimum, territory by
//! territory.
//!
//! Within a territory the route with the largest deficit (`min - count`) that
//! still has room takes the next account. Routes without a minimum rank below
//! every bounded route. Ties go to the smaller route id. Once all deficits
//! are met, routes keep accepting in the same order until they hit their
//! ceiling, so accounts spill to the next stage only when the territory is
//! genuinely full.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{BalanceStrategy, RebalanceOptions};
use crate::normalize::{Candidate, Roster};
use crate::pass::{Loads, PassOutcome, Placement};
use crate::traits::{Account, AssignmentStatus, Capacity, Route};

/// Route state local to one territory.
#[derive(Debug, Clone)]
struct Slot<'a> {
    route_id: &'a str,
    capacity: Capacity,
    count: usize,
}

impl<'a> Slot<'a> {
    fn has_room(&self) -> bool {
        self.capacity.has_room(self.count)
    }

    fn need(&self, index: usize) -> Need<'a> {
        Need {
            deficit: self.capacity.deficit(self.count),
            route_id: self.route_id,
            index,
        }
    }
}

/// Heap entry. Larger deficit first, then smaller route id. `index` only
/// locates the slot and takes no part in comparisons.
#[derive(Debug)]
struct Need<'a> {
    deficit: Option<i64>,
    route_id: &'a str,
    index: usize,
}

impl PartialEq for Need<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Need<'_> {}

impl Ord for Need<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deficit
            .cmp(&other.deficit)
            .then_with(|| other.route_id.cmp(self.route_id))
    }
}

impl PartialOrd for Need<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct TerritoryWork<'a, A> {
    territory: &'a str,
    slots: Vec<Slot<'a>>,
    accounts: Vec<Candidate<'a, A>>,
}

pub fn balance<'a, A, R>(
    unassigned: Vec<Candidate<'a, A>>,
    roster: &Roster<'a, R>,
    loads: &Loads<'a>,
    options: &RebalanceOptions,
) -> PassOutcome<'a, A>
where
    A: Account + Sync,
    R: Route,
{
    let mut by_territory: BTreeMap<&'a str, Vec<Candidate<'a, A>>> = BTreeMap::new();
    for candidate in unassigned {
        by_territory.entry(candidate.territory).or_default().push(candidate);
    }

    let mut slots: HashMap<&'a str, Vec<Slot<'a>>> = HashMap::new();
    for route in roster.regular() {
        if let Some(territory) = route.territory() {
            slots.entry(territory).or_default().push(Slot {
                route_id: route.id(),
                capacity: Capacity::of(route),
                count: loads.count(route.id()),
            });
        }
    }

    let work: Vec<TerritoryWork<'a, A>> = by_territory
        .into_iter()
        .map(|(territory, accounts)| TerritoryWork {
            territory,
            slots: slots.remove(territory).unwrap_or_default(),
            accounts,
        })
        .collect();

    let strategy = options.balance_strategy;
    let outcomes: Vec<PassOutcome<'a, A>> = if options.parallel_territories {
        work.into_par_iter()
            .map(|work| balance_territory(work, strategy))
            .collect()
    } else {
        work.into_iter()
            .map(|work| balance_territory(work, strategy))
            .collect()
    };

    let outcome = PassOutcome::merge(outcomes);
    info!(
        reassigned = outcome.placed.len(),
        unassigned = outcome.unassigned.len(),
        parallel = options.parallel_territories,
        "balancing pass complete"
    );
    outcome
}

fn balance_territory<'a, A>(work: TerritoryWork<'a, A>, strategy: BalanceStrategy) -> PassOutcome<'a, A> {
    let TerritoryWork {
        territory,
        mut slots,
        accounts,
    } = work;

    if slots.is_empty() {
        debug!(territory, accounts = accounts.len(), "territory has no regular routes");
        return PassOutcome {
            placed: Vec::new(),
            unassigned: accounts,
        };
    }

    let outcome = match strategy {
        BalanceStrategy::PriorityQueue => fill_by_heap(&mut slots, accounts),
        BalanceStrategy::LinearScan => fill_by_scan(&mut slots, accounts),
    };

    debug!(
        territory,
        reassigned = outcome.placed.len(),
        leftover = outcome.unassigned.len(),
        "territory balanced"
    );
    outcome
}

fn fill_by_heap<'a, A>(slots: &mut [Slot<'a>], accounts: Vec<Candidate<'a, A>>) -> PassOutcome<'a, A> {
    let mut heap: BinaryHeap<Need<'a>> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.has_room())
        .map(|(index, slot)| slot.need(index))
        .collect();

    let mut outcome = PassOutcome::default();
    for candidate in accounts {
        // Only the popped route's deficit changes, so the rest of the heap stays valid.
        let Some(need) = heap.pop() else {
            outcome.unassigned.push(candidate);
            continue;
        };
        let slot = &mut slots[need.index];
        slot.count += 1;
        outcome
            .placed
            .push(Placement::on_route(candidate, slot.route_id, AssignmentStatus::Reassigned));
        if slot.has_room() {
            heap.push(slot.need(need.index));
        }
    }
    outcome
}

fn fill_by_scan<'a, A>(slots: &mut [Slot<'a>], accounts: Vec<Candidate<'a, A>>) -> PassOutcome<'a, A> {
    let mut outcome = PassOutcome::default();
    for candidate in accounts {
        let neediest = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.has_room())
            .map(|(index, slot)| slot.need(index))
            .max();

        match neediest {
            Some(need) => {
                let slot = &mut slots[need.index];
                slot.count += 1;
                outcome
                    .placed
                    .push(Placement::on_route(candidate, slot.route_id, AssignmentStatus::Reassigned));
            }
            None => outcome.unassigned.push(candidate),
        }
    }
    outcome
}
