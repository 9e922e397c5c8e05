//! Error types for the simulation core.
//!
//! Numeric inputs are clamped, never rejected, so the only runtime errors are
//! references to unknown ids and malformed setup data.

use thiserror::Error;

use crate::simulation::simulation::TerminalState;
use crate::simulation::types::{AgentId, AllianceId};

/// Errors raised by simulation operations
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{0} is not known to the simulation")]
    AgentNotFound(AgentId),

    #[error("{0} does not exist")]
    AllianceNotFound(AllianceId),

    #[error("{0} cannot hold a relationship with itself")]
    SelfRelationship(AgentId),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("simulation already ended: {0:?}")]
    Terminated(TerminalState),
}

/// Errors raised while loading parameters or the event catalog.
/// Always fatal: initialization is aborted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("event catalog has no templates")]
    EmptyCatalog,

    #[error("event template '{event}' has invalid weight {weight}")]
    InvalidWeight { event: String, weight: f32 },

    #[error("event template '{event}' has invalid impact key '{key}'")]
    InvalidImpactKey { event: String, key: String },

    #[error("event template '{event}' has invalid magnitude {magnitude} for '{key}'")]
    InvalidMagnitude {
        event: String,
        key: String,
        magnitude: f32,
    },

    #[error("severity range [{min}, {max}] is not within [0, 1] or is inverted")]
    InvalidSeverityRange { min: f32, max: f32 },

    #[error("parameter '{name}' must be a probability, got {value}")]
    InvalidProbability { name: &'static str, value: f32 },

    #[error("parameter '{name}' is out of range: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("need '{name}' has invalid threshold {threshold}")]
    InvalidNeed { name: String, threshold: f32 },
}

pub type SimResult<T> = Result<T, SimError>;
