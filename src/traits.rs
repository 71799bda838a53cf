//! Core domain traits for the rebalancing engine.
//!
//! These are intentionally minimal. Concrete apps should implement them for
//! their own data models; `records` provides serde-backed implementations for
//! the JSON wire format.

use serde::{Deserialize, Serialize};

/// A customer account to be placed on a route.
pub trait Account {
    /// Account identifier. `None` (or an empty string) means the record has
    /// no usable id and will be dropped.
    fn id(&self) -> Option<&str>;

    /// Territory the account is geographically/administratively tied to.
    fn territory_affinity(&self) -> &str;

    /// Route the account is currently on, if any. May be stale.
    fn current_route_id(&self) -> Option<&str>;

    /// Whether the account carries a usable location.
    fn has_valid_location(&self) -> bool;
}

/// A technician's route.
pub trait Route {
    fn id(&self) -> &str;

    fn technician_name(&self) -> &str;

    /// Territory served by this route. New-hire routes usually have none.
    fn territory(&self) -> Option<&str>;

    /// Minimum target account count (`None` = unconstrained).
    fn capacity_min(&self) -> Option<usize>;

    /// Hard account ceiling (`None` = unconstrained).
    fn capacity_max(&self) -> Option<usize>;

    /// Manually-managed reserve route, never filled automatically.
    fn is_floater_route(&self) -> bool;

    /// Route without history whose territory is bootstrapped by the engine.
    fn is_new_hire_route(&self) -> bool;
}

/// Terminal state of an account after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    Kept,
    Reassigned,
    NewHire,
    Floater,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Kept => "kept",
            AssignmentStatus::Reassigned => "reassigned",
            AssignmentStatus::NewHire => "new-hire",
            AssignmentStatus::Floater => "floater",
        }
    }
}

/// Min/max account bounds of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capacity {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Capacity {
    pub fn of<R: Route + ?Sized>(route: &R) -> Self {
        Self {
            min: route.capacity_min(),
            max: route.capacity_max(),
        }
    }

    /// Whether a route holding `count` accounts can take one more.
    pub fn has_room(&self, count: usize) -> bool {
        self.max.is_none_or(|max| count < max)
    }

    /// `min - count`, or `None` when the route has no minimum.
    pub fn deficit(&self, count: usize) -> Option<i64> {
        self.min.map(|min| min as i64 - count as i64)
    }

    pub fn meets_target(&self, count: usize) -> bool {
        self.min.is_none_or(|min| count >= min) && self.max.is_none_or(|max| count <= max)
    }
}
