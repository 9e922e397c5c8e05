//! Configuration parameters for the ship simulation

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::simulation::error::ConfigError;

/// Main configuration for the simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    // Voyage
    /// Starting heading in degrees (0 = north/danger, 180 = south/safety)
    pub initial_heading: f32,
    /// Degrees the ship drifts north each day
    pub heading_drift: f32,
    /// Danger above which the ship may hit ice
    pub sink_danger_threshold: f32,
    /// Daily chance of sinking once above the danger threshold
    pub sink_chance: f32,
    /// Days until the ship reaches port
    pub voyage_length: u32,

    // Events
    /// Chance per day that an event is triggered
    pub event_trigger_chance: f32,
    /// Uniform severity range drawn at trigger time
    pub severity_min: f32,
    pub severity_max: f32,
    /// Chance each agent is listed as a witness of an event
    pub witness_chance: f32,

    // Relationships
    /// Strength added by a cooperative interaction
    pub cooperation_delta: f32,
    /// Strength added by a conflict (negative)
    pub conflict_delta: f32,
    /// Strength of a freshly created edge whose first interaction was negative
    pub new_edge_floor: f32,
    /// Strength lost by every edge per day
    pub relationship_decay: f32,
    /// Strength of the neutral edges seeded between agents sharing a group
    pub initial_edge_strength: f32,

    // Alliances
    /// Daily chance an agent looks for an ally
    pub alliance_chance: f32,
    /// Daily chance an alliance's strength shifts
    pub alliance_perturb_chance: f32,
    /// Maximum shift of that random walk
    pub alliance_perturb_range: f32,
    /// Strength below which an alliance breaks for good
    pub alliance_break_threshold: f32,

    // Leadership
    /// Authority the first captain starts with
    pub initial_authority: f32,
    /// Authority below which challengers may step up
    pub succession_threshold: f32,
    /// Authority granted to a newly installed leader
    pub authority_after_succession: f32,
    pub failed_challenge_stress: f32,
    pub failed_challenge_influence: f32,
    /// Fraction of the gap to mean crew trust closed each day
    pub authority_drift_rate: f32,

    // Mutiny
    pub mutiny_authority_threshold: f32,
    pub mutiny_min_radicals: usize,
    pub mutiny_radical_stress: f32,
    pub mutiny_min_danger: f32,
    /// Agents trusting the leader less than this support a mutiny
    pub mutiny_trust_threshold: f32,
    pub mutiny_stress_penalty: f32,
    pub mutiny_influence_penalty: f32,

    // Discourse
    pub discussion_chance: f32,
    pub protest_min_agents: usize,
    pub protest_min_stress: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            // Voyage
            initial_heading: 90.0,
            heading_drift: 2.0,
            sink_danger_threshold: 90.0,
            sink_chance: 0.3,
            voyage_length: 60,

            // Events
            event_trigger_chance: 0.2,
            severity_min: 0.5,
            severity_max: 1.0,
            witness_chance: 0.6,

            // Relationships
            cooperation_delta: 0.2,
            conflict_delta: -0.3,
            new_edge_floor: 0.05,
            relationship_decay: 0.01,
            initial_edge_strength: 0.5,

            // Alliances
            alliance_chance: 0.15,
            alliance_perturb_chance: 0.1,
            alliance_perturb_range: 5.0,
            alliance_break_threshold: 20.0,

            // Leadership
            initial_authority: 100.0,
            succession_threshold: 40.0,
            authority_after_succession: 60.0,
            failed_challenge_stress: 5.0,
            failed_challenge_influence: 5.0,
            authority_drift_rate: 0.2,

            // Mutiny
            mutiny_authority_threshold: 40.0,
            mutiny_min_radicals: 3,
            mutiny_radical_stress: 70.0,
            mutiny_min_danger: 60.0,
            mutiny_trust_threshold: 30.0,
            mutiny_stress_penalty: 15.0,
            mutiny_influence_penalty: 10.0,

            // Discourse
            discussion_chance: 0.3,
            protest_min_agents: 3,
            protest_min_stress: 60.0,
        }
    }
}

impl SimulationParams {
    /// Create params for a short, eventful test run
    pub fn fast_test() -> Self {
        let mut params = Self::default();
        params.initial_heading = 40.0;
        params.heading_drift = 5.0;
        params.event_trigger_chance = 0.6;
        params.voyage_length = 20;
        params
    }

    /// Load overrides from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let params: SimulationParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("sink_chance", self.sink_chance),
            ("event_trigger_chance", self.event_trigger_chance),
            ("witness_chance", self.witness_chance),
            ("alliance_chance", self.alliance_chance),
            ("alliance_perturb_chance", self.alliance_perturb_chance),
            ("discussion_chance", self.discussion_chance),
            ("authority_drift_rate", self.authority_drift_rate),
            ("initial_edge_strength", self.initial_edge_strength),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        if !(self.relationship_decay >= 0.0 && self.relationship_decay.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "relationship_decay",
                value: self.relationship_decay,
            });
        }
        if !(self.new_edge_floor > 0.0 && self.new_edge_floor <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "new_edge_floor",
                value: self.new_edge_floor,
            });
        }
        let deltas = [
            ("cooperation_delta", self.cooperation_delta),
            ("conflict_delta", self.conflict_delta),
        ];
        for (name, value) in deltas {
            if !(-1.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.severity_min)
            || !(0.0..=1.0).contains(&self.severity_max)
            || self.severity_min > self.severity_max
        {
            return Err(ConfigError::InvalidSeverityRange {
                min: self.severity_min,
                max: self.severity_max,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        let params = SimulationParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.event_trigger_chance, 0.2);
        assert_eq!(params.succession_threshold, 40.0);
        assert!(SimulationParams::fast_test().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params = SimulationParams::from_json_str(r#"{ "voyage_length": 12 }"#).unwrap();
        assert_eq!(params.voyage_length, 12);
        assert_eq!(params.heading_drift, 2.0);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = SimulationParams::from_json_str(r#"{ "sink_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProbability { name: "sink_chance", .. }));
    }

    #[test]
    fn test_edge_parameters_rejected() {
        let err = SimulationParams::from_json_str(r#"{ "relationship_decay": -0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "relationship_decay", .. }));

        let err = SimulationParams::from_json_str(r#"{ "new_edge_floor": 3.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "new_edge_floor", .. }));

        let err = SimulationParams::from_json_str(r#"{ "new_edge_floor": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "new_edge_floor", .. }));

        let err = SimulationParams::from_json_str(r#"{ "conflict_delta": -4.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "conflict_delta", .. }));
    }

    #[test]
    fn test_inverted_severity_rejected() {
        let err =
            SimulationParams::from_json_str(r#"{ "severity_min": 0.9, "severity_max": 0.2 }"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeverityRange { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationParams::from_json_file(Path::new("/nonexistent/params.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
