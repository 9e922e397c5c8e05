//! Event template catalog
//!
//! Templates are loaded from JSON. Defaults are embedded in the binary via
//! `include_str!`; a replacement file can be supplied at startup. Impact
//! keys are resolved to typed targets once, at load time, so applying an
//! event can never hit an unknown field.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::simulation::agents::AgentField;
use crate::simulation::error::ConfigError;
use crate::simulation::types::GroupIdentity;

const DEFAULT_EVENTS_JSON: &str = include_str!("../../../data/defaults/events.json");

const NEED_PREFIX: &str = "need.";
const INCREASE_SUFFIX: &str = "_increase";
const DECREASE_SUFFIX: &str = "_decrease";

/// Broad category of an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    NaturalDisaster,
    ManMade,
    PhilosophicalDilemma,
    TechnicalFailure,
    Incident,
    Scarcity,
}

/// What an impact changes on an affected agent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTarget {
    Field(AgentField),
    Need(String),
}

/// One resolved impact entry. `delta` is signed and scaled by severity
/// when applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub target: ImpactTarget,
    pub delta: f32,
}

impl Impact {
    /// Parse `<field>_increase`, `<field>_decrease`, `need.<name>_increase`
    /// or `need.<name>_decrease`
    pub fn parse(event: &str, key: &str, magnitude: f32) -> Result<Impact, ConfigError> {
        let invalid_key = || ConfigError::InvalidImpactKey {
            event: event.to_string(),
            key: key.to_string(),
        };

        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(ConfigError::InvalidMagnitude {
                event: event.to_string(),
                key: key.to_string(),
                magnitude,
            });
        }

        let (name, sign) = if let Some(name) = key.strip_suffix(INCREASE_SUFFIX) {
            (name, 1.0)
        } else if let Some(name) = key.strip_suffix(DECREASE_SUFFIX) {
            (name, -1.0)
        } else {
            return Err(invalid_key());
        };

        let target = match name.strip_prefix(NEED_PREFIX) {
            Some("") => return Err(invalid_key()),
            Some(need) => ImpactTarget::Need(need.to_string()),
            None => ImpactTarget::Field(AgentField::from_key(name).ok_or_else(invalid_key)?),
        };

        Ok(Impact {
            target,
            delta: sign * magnitude,
        })
    }
}

/// Template as written in JSON
#[derive(Clone, Debug, Deserialize)]
struct RawTemplate {
    key: String,
    name: String,
    description: String,
    category: EventCategory,
    affected_groups: BTreeSet<GroupIdentity>,
    #[serde(default)]
    impact: BTreeMap<String, f32>,
    #[serde(default = "default_weight")]
    weight: f32,
    #[serde(default)]
    emotional_impact: f32,
    #[serde(default)]
    tension: f32,
    #[serde(default)]
    max_temperature: Option<f32>,
}

fn default_weight() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
struct EventsFile {
    events: Vec<RawTemplate>,
}

/// A validated event template
#[derive(Clone, Debug, Serialize)]
pub struct EventTemplate {
    /// Stable identifier (e.g. "food_shortage")
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub affected_groups: BTreeSet<GroupIdentity>,
    pub impacts: Vec<Impact>,
    /// Static selection weight, always positive
    pub weight: f32,
    /// Memory weight before severity scaling
    pub emotional_impact: f32,
    /// Ship-wide tension added before severity scaling
    pub tension: f32,
    /// Only eligible when the ship is at or below this temperature
    pub max_temperature: Option<f32>,
}

impl EventTemplate {
    fn from_raw(raw: RawTemplate) -> Result<Self, ConfigError> {
        if !raw.weight.is_finite() || raw.weight <= 0.0 {
            return Err(ConfigError::InvalidWeight {
                event: raw.key,
                weight: raw.weight,
            });
        }
        let impacts = raw
            .impact
            .iter()
            .map(|(key, &magnitude)| Impact::parse(&raw.key, key, magnitude))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EventTemplate {
            key: raw.key,
            name: raw.name,
            description: raw.description,
            category: raw.category,
            affected_groups: raw.affected_groups,
            impacts,
            weight: raw.weight,
            emotional_impact: raw.emotional_impact.max(0.0),
            tension: raw.tension.max(0.0),
            max_temperature: raw.max_temperature,
        })
    }

    pub fn is_eligible(&self, temperature: f32) -> bool {
        self.max_temperature.map_or(true, |max| temperature <= max)
    }
}

/// Read-only set of event templates, loaded once at startup
#[derive(Clone, Debug)]
pub struct EventCatalog {
    templates: Vec<EventTemplate>,
}

impl EventCatalog {
    /// Load the embedded default catalog
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_json_str(DEFAULT_EVENTS_JSON)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: EventsFile = serde_json::from_str(json)?;
        let templates = file
            .events
            .into_iter()
            .map(EventTemplate::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(templates)
    }

    pub fn new(templates: Vec<EventTemplate>) -> Result<Self, ConfigError> {
        if templates.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        Ok(EventCatalog { templates })
    }

    pub fn templates(&self) -> &[EventTemplate] {
        &self.templates
    }

    pub fn get(&self, key: &str) -> Option<&EventTemplate> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
