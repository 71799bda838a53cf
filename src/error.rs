//! Error types.

use thiserror::Error;

/// Malformed route roster. Fatal: the engine refuses to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("route roster contains a route with an empty id")]
    EmptyRouteId,

    #[error("duplicate route id `{0}` in roster")]
    DuplicateRouteId(String),

    #[error("route id `{0}` is reserved for the floater pool")]
    ReservedRouteId(String),

    #[error("route `{route_id}` has capacity_min {min} greater than capacity_max {max}")]
    CapacityInverted {
        route_id: String,
        min: usize,
        max: usize,
    },

    #[error("route `{0}` is flagged both as a floater route and as a new-hire route")]
    ConflictingFlags(String),

    #[error("regular route `{0}` has no territory")]
    MissingTerritory(String),
}

/// Crate-level error for loading inputs and options.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid route roster: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
