//! Serde-backed account and route records (JSON wire format).

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::traits::{Account, Route};

/// One customer account row as produced by the ingestion step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub customer_number: Option<String>,
    #[serde(alias = "newTerritory")]
    pub territory_affinity: String,
    #[serde(default, alias = "route", skip_serializing_if = "Option::is_none")]
    pub current_route_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl AccountRecord {
    pub fn new(customer_number: impl Into<String>, territory: impl Into<String>) -> Self {
        Self {
            customer_number: Some(customer_number.into()),
            territory_affinity: territory.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn on_route(mut self, route_key: impl Into<String>) -> Self {
        self.current_route_key = Some(route_key.into());
        self
    }
}

impl Account for AccountRecord {
    fn id(&self) -> Option<&str> {
        self.customer_number.as_deref()
    }

    fn territory_affinity(&self) -> &str {
        &self.territory_affinity
    }

    fn current_route_id(&self) -> Option<&str> {
        self.current_route_key.as_deref()
    }

    fn has_valid_location(&self) -> bool {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => is_valid_coordinate(lat, lng),
            _ => false,
        }
    }
}

/// Whether a geocoded point is usable.
///
/// `(0, 0)` is what spreadsheet exports write for rows that were never
/// geocoded. A single zero component is a real point on the equator or the
/// prime meridian.
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    lat.is_finite()
        && lng.is_finite()
        && !(lat == 0.0 && lng == 0.0)
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lng)
}

/// One route of the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    #[serde(alias = "routeKey")]
    pub route_id: String,
    #[serde(alias = "name")]
    pub technician_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    #[serde(default, alias = "isFloater")]
    pub is_floater_route: bool,
    #[serde(default, alias = "isNewHire")]
    pub is_new_hire_route: bool,
    #[serde(default, alias = "min", skip_serializing_if = "Option::is_none")]
    pub capacity_min: Option<usize>,
    #[serde(default, alias = "max", skip_serializing_if = "Option::is_none")]
    pub capacity_max: Option<usize>,
}

impl RouteRecord {
    pub fn new(route_id: impl Into<String>, technician_name: impl Into<String>) -> Self {
        Self {
            route_id: route_id.into(),
            technician_name: technician_name.into(),
            ..Self::default()
        }
    }

    pub fn in_territory(mut self, territory: impl Into<String>) -> Self {
        self.territory = Some(territory.into());
        self
    }

    pub fn capacity(mut self, min: usize, max: usize) -> Self {
        self.capacity_min = Some(min);
        self.capacity_max = Some(max);
        self
    }

    pub fn floater(mut self) -> Self {
        self.is_floater_route = true;
        self
    }

    pub fn new_hire(mut self) -> Self {
        self.is_new_hire_route = true;
        self
    }
}

impl Route for RouteRecord {
    fn id(&self) -> &str {
        &self.route_id
    }

    fn technician_name(&self) -> &str {
        &self.technician_name
    }

    fn territory(&self) -> Option<&str> {
        self.territory.as_deref()
    }

    fn capacity_min(&self) -> Option<usize> {
        self.capacity_min
    }

    fn capacity_max(&self) -> Option<usize> {
        self.capacity_max
    }

    fn is_floater_route(&self) -> bool {
        self.is_floater_route
    }

    fn is_new_hire_route(&self) -> bool {
        self.is_new_hire_route
    }
}

pub fn accounts_from_json_str(s: &str) -> Result<Vec<AccountRecord>> {
    Ok(serde_json::from_str(s)?)
}

pub fn routes_from_json_str(s: &str) -> Result<Vec<RouteRecord>> {
    Ok(serde_json::from_str(s)?)
}

pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<AccountRecord>> {
    accounts_from_json_str(&std::fs::read_to_string(path)?)
}

pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<RouteRecord>> {
    routes_from_json_str(&std::fs::read_to_string(path)?)
}

/// Spreadsheet exports sometimes turn customer numbers into JSON numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => text.trim().to_string(),
        RawId::Integer(n) => n.to_string(),
        RawId::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        RawId::Float(f) => f.to_string(),
    }))
}
