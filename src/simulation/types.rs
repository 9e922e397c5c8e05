//! Core types for the ship simulation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an agent aboard the ship
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent#{}", self.0)
    }
}

/// Unique identifier for an alliance (index into the registry)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AllianceId(pub u32);

impl fmt::Display for AllianceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alliance#{}", self.0)
    }
}

/// Unique identifier for a triggered event
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event#{}", self.0)
    }
}

/// Simulation time unit: one day aboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Day(pub u32);

impl Day {
    pub fn next(&self) -> Day {
        Day(self.0 + 1)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {}", self.0)
    }
}

/// Political outlook of an agent. Drives how events are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ideology {
    Authoritarian,
    Reformist,
    Revolutionary,
    Conservative,
    Liberal,
    Anarchist,
}

impl Ideology {
    pub const ALL: [Ideology; 6] = [
        Ideology::Authoritarian,
        Ideology::Reformist,
        Ideology::Revolutionary,
        Ideology::Conservative,
        Ideology::Liberal,
        Ideology::Anarchist,
    ];

    /// Revolutionaries and anarchists: the pool mutineers are drawn from
    pub fn is_radical(&self) -> bool {
        matches!(self, Ideology::Revolutionary | Ideology::Anarchist)
    }

    /// Whether this outlook holds the incumbent responsible for misfortune
    pub fn blames_leadership(&self) -> bool {
        !matches!(self, Ideology::Authoritarian | Ideology::Conservative)
    }
}

/// Identity groups an agent belongs to. Events target groups, not agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupIdentity {
    Authority,
    Workers,
    Women,
    Lgbtq,
    Religious,
    Indigenous,
    Merchants,
}

impl GroupIdentity {
    pub const ALL: [GroupIdentity; 7] = [
        GroupIdentity::Authority,
        GroupIdentity::Workers,
        GroupIdentity::Women,
        GroupIdentity::Lgbtq,
        GroupIdentity::Religious,
        GroupIdentity::Indigenous,
        GroupIdentity::Merchants,
    ];
}

/// Role aboard. Mutable: a deposed captain keeps living as `Deposed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Captain,
    Officer,
    Worker,
    Passenger,
    Intellectual,
    Deposed,
}

impl Default for Role {
    fn default() -> Self {
        Role::Passenger
    }
}

/// Psychological state, derived from emotions, drives and trauma every tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsychologicalState {
    Normal,
    Angry,
    Depressed,
    Cooperative,
    Paranoid,
}

impl Default for PsychologicalState {
    fn default() -> Self {
        PsychologicalState::Normal
    }
}

/// Secret motivation biasing an agent's decisions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenAgenda {
    SeekPower,
    FindLove,
    Survive,
    CreateChaos,
}

/// Daily action chosen by an agent.
///
/// Declaration order is the tie-break order for `Agent::decide_action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Cooperate,
    Rebel,
    TakeRisk,
    SeekResources,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Cooperate,
        Action::Rebel,
        Action::TakeRisk,
        Action::SeekResources,
    ];
}

/// Kind of pairwise interaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Cooperation,
    Conflict,
}

/// Type of a relationship edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Friendship,
    Conflict,
    Romantic,
    Neutral,
    Alliance,
}

impl InteractionType {
    /// Edge type implied by a first non-neutral interaction
    pub fn implied_relationship(&self) -> RelationshipType {
        match self {
            InteractionType::Cooperation => RelationshipType::Friendship,
            InteractionType::Conflict => RelationshipType::Conflict,
        }
    }
}

/// Big Five personality traits (0.0 - 1.0 each)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

impl Personality {
    pub fn new(
        openness: f32,
        conscientiousness: f32,
        extraversion: f32,
        agreeableness: f32,
        neuroticism: f32,
    ) -> Self {
        Personality {
            openness: openness.clamp(0.0, 1.0),
            conscientiousness: conscientiousness.clamp(0.0, 1.0),
            extraversion: extraversion.clamp(0.0, 1.0),
            agreeableness: agreeableness.clamp(0.0, 1.0),
            neuroticism: neuroticism.clamp(0.0, 1.0),
        }
    }
}

impl Default for Personality {
    fn default() -> Self {
        Personality::new(0.5, 0.5, 0.5, 0.5, 0.5)
    }
}

/// Emotional levels (0.0 - 1.0 each)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Emotions {
    pub anger: f32,
    pub hope: f32,
    pub fear: f32,
    pub happiness: f32,
}

/// Basic drives (1.0 = fully satisfied, decays daily)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drives {
    pub physiological: f32,
    pub social: f32,
    pub psychological: f32,
}

impl Default for Drives {
    fn default() -> Self {
        Drives {
            physiological: 1.0,
            social: 1.0,
            psychological: 1.0,
        }
    }
}
