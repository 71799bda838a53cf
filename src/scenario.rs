//! Scenario: the output artifact of one engine run.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::AssignmentStatus;

/// Route id used for accounts in the floater pool.
pub const FLOATER_ROUTE_ID: &str = "FLOATER";

/// Technician name reported for the floater pool.
pub const FLOATER_TECHNICIAN: &str = "Floater";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub account_id: String,
    pub route_id: String,
    pub technician_name: String,
    pub territory: String,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub route_id: String,
    pub technician_name: String,
    pub territory: Option<String>,
    pub is_floater_route: bool,
    pub is_new_hire_route: bool,
    pub assigned_count: usize,
    pub capacity_min: Option<usize>,
    pub capacity_max: Option<usize>,
    pub kept_from_original: usize,
    pub added_new: usize,
    pub meets_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritorySummary {
    pub territory: String,
    pub total_accounts: usize,
    pub assigned_count: usize,
    pub route_count: usize,
    /// Sum of route ceilings; `None` when a serving route is unbounded.
    pub route_capacity: Option<usize>,
    pub floater_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloaterRoute {
    pub route_id: String,
    pub technician_name: String,
    pub territory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_accounts: usize,
    pub total_assigned: usize,
    pub floater_pool_size: usize,
    pub dropped_count: usize,
    pub dropped_missing_id: usize,
    pub dropped_invalid_location: usize,
    pub territory_totals: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub route_summaries: Vec<RouteSummary>,
    pub territory_summaries: Vec<TerritorySummary>,
    pub floater_routes: Vec<FloaterRoute>,
    /// Kept, reassigned and new-hire assignments.
    pub assignments: Vec<Assignment>,
    pub floater_pool: Vec<Assignment>,
}

impl Scenario {
    /// Looks an account up in both the route assignments and the floater pool.
    pub fn assignment_for(&self, account_id: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .chain(&self.floater_pool)
            .find(|assignment| assignment.account_id == account_id)
    }

    pub fn route_summary(&self, route_id: &str) -> Option<&RouteSummary> {
        self.route_summaries.iter().find(|summary| summary.route_id == route_id)
    }

    pub fn territory_summary(&self, territory: &str) -> Option<&TerritorySummary> {
        self.territory_summaries
            .iter()
            .find(|summary| summary.territory == territory)
    }

    pub fn assignments_on(&self, route_id: &str) -> impl Iterator<Item = &Assignment> + '_ {
        let route_id = route_id.to_string();
        self.assignments
            .iter()
            .chain(&self.floater_pool)
            .filter(move |assignment| assignment.route_id == route_id)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> serde_json::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        }
    }
}
