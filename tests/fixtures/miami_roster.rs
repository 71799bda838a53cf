//! Miami-Dade field-service roster for realistic test fixtures.
//!
//! Sixteen routes across North / Central / South, including floater reserve
//! routes and two new-hire routes without a territory.

use territory_rebalance::records::{AccountRecord, RouteRecord};

/// One roster row: (route key, technician, territory, kind, min, max).
#[derive(Debug, Clone, Copy)]
pub struct RosterRow {
    pub key: &'static str,
    pub technician: &'static str,
    pub territory: &'static str,
    pub kind: RouteKind,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Regular,
    Floater,
    NewHire,
}

const fn row(
    key: &'static str,
    technician: &'static str,
    territory: &'static str,
    kind: RouteKind,
    min: Option<usize>,
    max: Option<usize>,
) -> RosterRow {
    RosterRow {
        key,
        technician,
        territory,
        kind,
        min,
        max,
    }
}

use RouteKind::{Floater, NewHire, Regular};

pub const ROSTER: &[RosterRow] = &[
    row("1 AFP Route Sharion S", "Sharion Spears", "North", Floater, None, None),
    row("2 AFP Route William A", "William A", "North", Regular, Some(60), Some(70)),
    row("5 AFP Route Freddy S", "Freddy Sosa", "Central", Regular, Some(60), Some(70)),
    row("6 AFP Route Casey D", "Casey DeLaurier", "South", Floater, None, None),
    row("7 AFP Route Andra G", "Andra Gardner", "South", Regular, Some(50), Some(60)),
    row("11 AFP Route Honatann B", "Honatann Bocanegra", "South", Regular, Some(60), Some(65)),
    row("14 AFP Route", "New Technician (14)", "", NewHire, Some(60), Some(65)),
    row("15 AFP Route", "New Technician (15)", "", NewHire, Some(60), Some(65)),
    row("16 AFP Route Robert D", "Robert Derilus", "North", Regular, Some(60), Some(65)),
    row("17 AFP Roosevelt F", "Roosevelt Francois", "Central", Regular, Some(60), Some(70)),
    row("21 AFP Route Carlos M", "Carlos Matta", "Central", Regular, Some(70), Some(70)),
    row("24 AFP Route Jorge B", "Jorge Braojos", "Central", Regular, Some(60), Some(70)),
    row("28 AFP Route Jean D", "Dezilma Jean", "South", Regular, Some(70), Some(70)),
    row("29 AFP Route Erick B", "Erick Bonilla", "Central", Regular, Some(70), Some(70)),
    row("103 AFP Route Vacant", "Wesley Odeus", "Central", Floater, None, None),
    row("105 AFP Route Miguel R", "Miguel Rodriguez", "North", Regular, Some(60), Some(70)),
];

/// Territory anchors (lat, lng) used to scatter generated accounts.
pub const ANCHORS: &[(&str, f64, f64)] = &[
    ("North", 25.9420, -80.2456),
    ("Central", 25.7617, -80.1918),
    ("South", 25.5516, -80.3997),
];

pub fn routes() -> Vec<RouteRecord> {
    ROSTER
        .iter()
        .map(|r| {
            let mut route = RouteRecord::new(r.key, r.technician);
            if r.kind != NewHire {
                route = route.in_territory(r.territory);
            }
            route.capacity_min = r.min;
            route.capacity_max = r.max;
            match r.kind {
                Floater => route.floater(),
                NewHire => route.new_hire(),
                Regular => route,
            }
        })
        .collect()
}

/// Regular route keys serving a territory, in roster order.
pub fn regular_keys(territory: &str) -> Vec<&'static str> {
    ROSTER
        .iter()
        .filter(|r| r.kind == Regular && r.territory == territory)
        .map(|r| r.key)
        .collect()
}

/// `count` accounts in `territory`, currently spread round-robin over the
/// territory's regular routes.
pub fn accounts(territory: &str, count: usize) -> Vec<AccountRecord> {
    let keys = regular_keys(territory);
    let (lat, lng) = ANCHORS
        .iter()
        .find(|(name, _, _)| *name == territory)
        .map(|(_, lat, lng)| (*lat, *lng))
        .unwrap_or((25.76, -80.19));

    (0..count)
        .map(|i| {
            let jitter = (i % 97) as f64 * 0.0005;
            let account = AccountRecord::new(format!("{territory}-{i:04}"), territory).at(lat + jitter, lng - jitter);
            match keys.get(i % keys.len().max(1)) {
                Some(key) => account.on_route(*key),
                None => account,
            }
        })
        .collect()
}
