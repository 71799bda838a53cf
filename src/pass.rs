//! Values shared between passes.
//!
//! Each pass takes the previous pass's unassigned set and returns a new
//! `(placed, unassigned)` pair. Nothing is mutated across pass boundaries.

use std::collections::HashMap;

use crate::normalize::Candidate;
use crate::traits::AssignmentStatus;

/// One account placed by a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub account_id: &'a str,
    /// `None` for the floater pool.
    pub route_id: Option<&'a str>,
    pub territory: &'a str,
    pub status: AssignmentStatus,
}

impl<'a> Placement<'a> {
    pub fn on_route<A>(candidate: Candidate<'a, A>, route_id: &'a str, status: AssignmentStatus) -> Self {
        Self {
            account_id: candidate.id,
            route_id: Some(route_id),
            territory: candidate.territory,
            status,
        }
    }

    pub fn floater<A>(candidate: Candidate<'a, A>) -> Self {
        Self {
            account_id: candidate.id,
            route_id: None,
            territory: candidate.territory,
            status: AssignmentStatus::Floater,
        }
    }
}

#[derive(Debug)]
pub struct PassOutcome<'a, A> {
    pub placed: Vec<Placement<'a>>,
    pub unassigned: Vec<Candidate<'a, A>>,
}

impl<A> Default for PassOutcome<'_, A> {
    fn default() -> Self {
        Self {
            placed: Vec::new(),
            unassigned: Vec::new(),
        }
    }
}

impl<'a, A> PassOutcome<'a, A> {
    /// Concatenates outcomes in order.
    pub fn merge(outcomes: impl IntoIterator<Item = PassOutcome<'a, A>>) -> Self {
        outcomes.into_iter().fold(Self::default(), |mut acc, outcome| {
            acc.placed.extend(outcome.placed);
            acc.unassigned.extend(outcome.unassigned);
            acc
        })
    }
}

/// Running account count per route.
#[derive(Debug, Clone, Default)]
pub struct Loads<'a> {
    counts: HashMap<&'a str, usize>,
}

impl<'a> Loads<'a> {
    pub fn from_placements<'p>(placements: impl IntoIterator<Item = &'p Placement<'a>>) -> Self
    where
        'a: 'p,
    {
        let mut loads = Self::default();
        for placement in placements {
            if let Some(route_id) = placement.route_id {
                *loads.counts.entry(route_id).or_default() += 1;
            }
        }
        loads
    }

    pub fn count(&self, route_id: &str) -> usize {
        self.counts.get(route_id).copied().unwrap_or(0)
    }
}
