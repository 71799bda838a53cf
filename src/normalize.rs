//! Input normalization: roster validation and account filtering.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::AccountOrder;
use crate::error::ConfigError;
use crate::scenario::FLOATER_ROUTE_ID;
use crate::traits::{Account, Capacity, Route};

/// Validated, id-indexed view over the route roster.
#[derive(Debug)]
pub struct Roster<'a, R> {
    routes: Vec<&'a R>,
    index: HashMap<&'a str, usize>,
}

impl<'a, R: Route> Roster<'a, R> {
    /// Validates the roster. Nothing is run when this fails.
    pub fn new(routes: &'a [R]) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(routes.len());

        for (i, route) in routes.iter().enumerate() {
            let id = route.id();
            if id.trim().is_empty() {
                return Err(ConfigError::EmptyRouteId);
            }
            if id == FLOATER_ROUTE_ID {
                return Err(ConfigError::ReservedRouteId(id.to_string()));
            }
            if index.insert(id, i).is_some() {
                return Err(ConfigError::DuplicateRouteId(id.to_string()));
            }
            if let (Some(min), Some(max)) = (route.capacity_min(), route.capacity_max()) {
                if min > max {
                    return Err(ConfigError::CapacityInverted {
                        route_id: id.to_string(),
                        min,
                        max,
                    });
                }
            }
            if route.is_floater_route() && route.is_new_hire_route() {
                return Err(ConfigError::ConflictingFlags(id.to_string()));
            }
            if is_regular(route) && route.territory().is_none() {
                return Err(ConfigError::MissingTerritory(id.to_string()));
            }
        }

        Ok(Self {
            routes: routes.iter().collect(),
            index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&'a R> {
        self.index.get(id).map(|&i| self.routes[i])
    }

    /// All routes in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.routes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes eligible for retention and balancing, in roster order.
    pub fn regular(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.iter().filter(|route| is_regular(*route))
    }

    pub fn new_hires(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.iter().filter(|route| route.is_new_hire_route())
    }

    pub fn floaters(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.iter().filter(|route| route.is_floater_route())
    }

    /// Territories named by any route, new hires excluded.
    pub fn territories(&self) -> BTreeSet<&'a str> {
        self.iter()
            .filter(|route| !route.is_new_hire_route())
            .filter_map(|route| route.territory())
            .collect()
    }

    pub fn capacity(&self, id: &str) -> Option<Capacity> {
        self.get(id).map(Capacity::of)
    }
}

/// A route that takes part in retention and balancing.
pub fn is_regular<R: Route + ?Sized>(route: &R) -> bool {
    !route.is_floater_route() && !route.is_new_hire_route()
}

/// Why a record was excluded before the passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropTally {
    pub missing_id: usize,
    pub invalid_location: usize,
}

impl DropTally {
    pub fn total(&self) -> usize {
        self.missing_id + self.invalid_location
    }
}

/// A surviving account with its id and territory resolved once.
#[derive(Debug)]
pub struct Candidate<'a, A> {
    pub id: &'a str,
    pub territory: &'a str,
    pub account: &'a A,
}

impl<A> Clone for Candidate<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Candidate<'_, A> {}

#[derive(Debug)]
pub struct NormalizedInput<'a, A, R> {
    /// Surviving accounts, in pass order.
    pub accounts: Vec<Candidate<'a, A>>,
    pub dropped: DropTally,
    pub roster: Roster<'a, R>,
}

/// Validates the roster, then filters and orders the accounts.
pub fn normalize<'a, A, R>(
    accounts: &'a [A],
    routes: &'a [R],
    order: AccountOrder,
) -> Result<NormalizedInput<'a, A, R>, ConfigError>
where
    A: Account,
    R: Route,
{
    let roster = Roster::new(routes)?;

    let mut dropped = DropTally::default();
    let mut valid: Vec<Candidate<'a, A>> = Vec::with_capacity(accounts.len());

    for account in accounts {
        let Some(id) = account_id(account) else {
            dropped.missing_id += 1;
            continue;
        };
        if !account.has_valid_location() {
            dropped.invalid_location += 1;
            continue;
        }
        valid.push(Candidate {
            id,
            territory: account.territory_affinity(),
            account,
        });
    }

    if order == AccountOrder::ById {
        valid.sort_by(|a, b| a.id.cmp(b.id));
    }

    let mut seen = HashSet::with_capacity(valid.len());
    for candidate in &valid {
        if !seen.insert(candidate.id) {
            warn!(account_id = candidate.id, "duplicate account id in input");
        }
    }

    debug!(
        valid = valid.len(),
        missing_id = dropped.missing_id,
        invalid_location = dropped.invalid_location,
        "normalized accounts"
    );

    Ok(NormalizedInput {
        accounts: valid,
        dropped,
        roster,
    })
}

/// Non-empty account id.
pub fn account_id<A: Account + ?Sized>(account: &A) -> Option<&str> {
    account.id().filter(|id| !id.trim().is_empty())
}
