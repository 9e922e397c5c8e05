//! Needs - named bounded gauges with critical thresholds

use serde::{Deserialize, Serialize};

use crate::simulation::error::ConfigError;

/// Lowest and highest value a need can hold
pub const NEED_MIN: f32 = 0.0;
pub const NEED_MAX: f32 = 100.0;

/// Threshold used when a need is created without one
pub const DEFAULT_CRITICAL_THRESHOLD: f32 = 30.0;

/// Clamp into the gauge range; NaN collapses to the lower bound
fn clamp_value(value: f32) -> f32 {
    if value.is_nan() {
        NEED_MIN
    } else {
        value.clamp(NEED_MIN, NEED_MAX)
    }
}

/// A single need (0 = deprived, 100 = fully satisfied)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub name: String,
    value: f32,
    pub critical_threshold: f32,
}

impl Need {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self::with_threshold(name, value, DEFAULT_CRITICAL_THRESHOLD)
    }

    pub fn with_threshold(name: impl Into<String>, value: f32, critical_threshold: f32) -> Self {
        Need {
            name: name.into(),
            value: clamp_value(value),
            critical_threshold,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Shift the value, clamped to [0, 100]
    pub fn update(&mut self, delta: f32) {
        self.value = clamp_value(self.value + delta);
    }

    pub fn is_critical(&self) -> bool {
        self.value < self.critical_threshold
    }
}

/// Ordered collection of needs. Insertion order is the natural order used by
/// every query, so results stay deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedSet {
    needs: Vec<Need>,
}

impl NeedSet {
    pub fn new() -> Self {
        NeedSet { needs: Vec::new() }
    }

    /// Build from needs, rejecting thresholds outside the gauge range
    pub fn from_needs(needs: impl IntoIterator<Item = Need>) -> Result<Self, ConfigError> {
        let mut set = NeedSet::new();
        for need in needs {
            if !(NEED_MIN..=NEED_MAX).contains(&need.critical_threshold) {
                return Err(ConfigError::InvalidNeed {
                    name: need.name,
                    threshold: need.critical_threshold,
                });
            }
            set.insert(need);
        }
        Ok(set)
    }

    /// Insert a need, replacing any need of the same name in place
    pub fn insert(&mut self, need: Need) {
        if let Some(existing) = self.needs.iter_mut().find(|n| n.name == need.name) {
            *existing = need;
        } else {
            self.needs.push(need);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Need> {
        self.needs.iter().find(|n| n.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Need> {
        self.needs.iter_mut().find(|n| n.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Apply a delta to a named need. Unknown names are ignored.
    /// Returns whether a need was touched.
    pub fn adjust(&mut self, name: &str, delta: f32) -> bool {
        match self.get_mut(name) {
            Some(need) => {
                need.update(delta);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Need> {
        self.needs.iter()
    }

    pub fn len(&self) -> usize {
        self.needs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty()
    }

    /// Names of needs below their threshold, in natural order
    pub fn critical(&self) -> Vec<String> {
        self.needs
            .iter()
            .filter(|n| n.is_critical())
            .map(|n| n.name.clone())
            .collect()
    }

    /// Mean value; 50.0 when there is nothing to average
    pub fn mean(&self) -> f32 {
        if self.needs.is_empty() {
            return 50.0;
        }
        self.needs.iter().map(|n| n.value).sum::<f32>() / self.needs.len() as f32
    }

    /// The least satisfied need (first wins ties)
    pub fn lowest(&self) -> Option<&Need> {
        self.needs.iter().fold(None, |best: Option<&Need>, n| match best {
            Some(b) if b.value <= n.value => Some(b),
            _ => Some(n),
        })
    }
}
