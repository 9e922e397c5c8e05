//! Ship environment - heading, danger, temperature and tension
//!
//! The ship drifts north every day. Heading 0 is due north into the ice,
//! 180 is due south to safety. Danger and temperature follow from heading.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::agents::{Agent, AgentField};
use crate::simulation::params::SimulationParams;

pub const HEADING_SOUTH: f32 = 180.0;
pub const MAX_DANGER: f32 = 100.0;
pub const MAX_TENSION: f32 = 100.0;
/// Temperature with no danger at all
pub const BASE_TEMPERATURE: f32 = 15.0;
/// Temperature lost between no danger and full danger
pub const TEMPERATURE_RANGE: f32 = 20.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShipState {
    /// Degrees, 0-180
    pub heading: f32,
    /// 0-100
    pub danger_level: f32,
    /// Celsius
    pub temperature: f32,
    /// Ship-wide philosophical and social tension, 0-100
    pub tension: f32,
}

impl ShipState {
    pub fn new(heading: f32) -> Self {
        let mut ship = ShipState {
            heading: 0.0,
            danger_level: 0.0,
            temperature: BASE_TEMPERATURE,
            tension: 0.0,
        };
        ship.set_heading(heading);
        ship
    }

    pub fn from_params(params: &SimulationParams) -> Self {
        Self::new(params.initial_heading)
    }

    /// Set heading and recompute danger and temperature
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = heading.clamp(0.0, HEADING_SOUTH);
        self.danger_level = ((1.0 - self.heading / HEADING_SOUTH) * MAX_DANGER).clamp(0.0, MAX_DANGER);
        self.temperature = BASE_TEMPERATURE - self.danger_level / MAX_DANGER * TEMPERATURE_RANGE;
    }

    /// One day's northward drift
    pub fn advance(&mut self, params: &SimulationParams) {
        self.set_heading(self.heading - params.heading_drift);
    }

    /// Mutineers turn the ship around
    pub fn turn_south(&mut self) {
        self.set_heading(HEADING_SOUTH);
    }

    pub fn add_tension(&mut self, amount: f32) {
        self.tension = (self.tension + amount).clamp(0.0, MAX_TENSION);
    }

    /// Roll for hitting the ice. Only possible above the danger threshold.
    pub fn check_sinking<R: Rng>(&self, params: &SimulationParams, rng: &mut R) -> bool {
        self.danger_level > params.sink_danger_threshold && rng.gen::<f32>() < params.sink_chance
    }

    /// Environmental wear on one agent: cold, fear and stress grow with danger.
    /// Agents without the affected needs are spared those parts.
    pub fn apply_environment(&self, agent: &mut Agent) {
        let danger = self.danger_level;
        agent.update_needs([("warmth", -(danger / 20.0)), ("safety", -(danger / 30.0))]);
        agent.adjust(AgentField::Stress, danger / 40.0);
    }
}

impl Default for ShipState {
    fn default() -> Self {
        Self::from_params(&SimulationParams::default())
    }
}
