//! Alliance registry - named multi-member groupings
//!
//! Alliances are append-only history: a broken alliance keeps its slot and
//! is never reactivated. Ids are indices into the registry.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::simulation::error::{SimError, SimResult};
use crate::simulation::params::SimulationParams;
use crate::simulation::types::{AgentId, AllianceId, Day};

/// Strength of a freshly formed alliance
pub const NEW_ALLIANCE_STRENGTH: f32 = 50.0;
/// Strength gained per member folded into an existing alliance
pub const JOIN_STRENGTH_BONUS: f32 = 5.0;
/// Strength lost when a member leaves
pub const LEAVE_STRENGTH_PENALTY: f32 = 10.0;
pub const MAX_ALLIANCE_STRENGTH: f32 = 100.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    pub members: BTreeSet<AgentId>,
    pub purpose: String,
    pub strength: f32,
    pub created_day: Day,
    pub broken: bool,
}

impl Alliance {
    pub fn is_active(&self) -> bool {
        !self.broken
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    fn adjust_strength(&mut self, delta: f32) {
        self.strength = (self.strength + delta).clamp(0.0, MAX_ALLIANCE_STRENGTH);
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.broken || self.members.len() >= 2,
            "{} has fewer than two members but is not broken",
            self.id
        );
    }
}

/// What `form` did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    Created(AllianceId),
    /// Members were folded into an existing alliance; `added` counts new members
    Joined { alliance: AllianceId, added: usize },
}

impl Formation {
    pub fn alliance(&self) -> AllianceId {
        match *self {
            Formation::Created(id) => id,
            Formation::Joined { alliance, .. } => alliance,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AllianceRegistry {
    alliances: Vec<Alliance>,
}

impl AllianceRegistry {
    pub fn new() -> Self {
        AllianceRegistry {
            alliances: Vec::new(),
        }
    }

    /// First active alliance containing the agent
    pub fn alliance_of(&self, agent: AgentId) -> Option<&Alliance> {
        self.active().find(|a| a.contains(agent))
    }

    /// Ally two agents. If either already belongs to an active alliance both
    /// are folded into it; otherwise a new alliance is created. Two separate
    /// existing alliances are never merged. Returns `None` when `a == b`.
    pub fn form(
        &mut self,
        a: AgentId,
        b: AgentId,
        purpose: impl Into<String>,
        day: Day,
    ) -> Option<Formation> {
        if a == b {
            return None;
        }

        let existing = self
            .alliances
            .iter_mut()
            .find(|al| al.is_active() && (al.contains(a) || al.contains(b)));

        if let Some(alliance) = existing {
            let mut added = 0;
            for member in [a, b] {
                if alliance.members.insert(member) {
                    added += 1;
                    alliance.adjust_strength(JOIN_STRENGTH_BONUS);
                }
            }
            alliance.check_invariants();
            return Some(Formation::Joined {
                alliance: alliance.id,
                added,
            });
        }

        let id = AllianceId(self.alliances.len() as u32);
        self.alliances.push(Alliance {
            id,
            members: BTreeSet::from([a, b]),
            purpose: purpose.into(),
            strength: NEW_ALLIANCE_STRENGTH,
            created_day: day,
            broken: false,
        });
        Some(Formation::Created(id))
    }

    /// Remove a member; an alliance left with fewer than two breaks.
    /// Returns whether the member was present.
    pub fn remove_member(&mut self, id: AllianceId, agent: AgentId) -> SimResult<bool> {
        let alliance = self
            .alliances
            .get_mut(id.0 as usize)
            .ok_or(SimError::AllianceNotFound(id))?;

        if alliance.broken || !alliance.members.remove(&agent) {
            return Ok(false);
        }
        alliance.adjust_strength(-LEAVE_STRENGTH_PENALTY);
        if alliance.members.len() < 2 {
            alliance.broken = true;
        }
        alliance.check_invariants();
        Ok(true)
    }

    /// Daily random walk on strength. Returns alliances broken this tick.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, params: &SimulationParams) -> Vec<AllianceId> {
        let mut broken = Vec::new();
        for alliance in self.alliances.iter_mut().filter(|a| a.is_active()) {
            if rng.gen::<f32>() < params.alliance_perturb_chance {
                let range = params.alliance_perturb_range;
                let delta = if range > 0.0 {
                    rng.gen_range(-range..=range)
                } else {
                    0.0
                };
                alliance.adjust_strength(delta);
            }
            if alliance.strength < params.alliance_break_threshold {
                alliance.broken = true;
                broken.push(alliance.id);
            }
        }
        broken
    }

    pub fn get(&self, id: AllianceId) -> SimResult<&Alliance> {
        self.alliances
            .get(id.0 as usize)
            .ok_or(SimError::AllianceNotFound(id))
    }

    pub fn active(&self) -> impl Iterator<Item = &Alliance> {
        self.alliances.iter().filter(|a| a.is_active())
    }

    /// Every alliance ever formed, broken ones included
    pub fn all(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn len(&self) -> usize {
        self.alliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alliances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_form_creates_alliance() {
        let mut registry = AllianceRegistry::new();
        let formed = registry.form(AgentId(1), AgentId(2), "Survival", Day(3)).unwrap();
        assert_eq!(formed, Formation::Created(AllianceId(0)));

        let alliance = registry.get(AllianceId(0)).unwrap();
        assert_eq!(alliance.strength, NEW_ALLIANCE_STRENGTH);
        assert_eq!(alliance.created_day, Day(3));
        assert!(registry.form(AgentId(1), AgentId(1), "Alone", Day(3)).is_none());
    }

    #[test]
    fn test_union_semantics() {
        let mut registry = AllianceRegistry::new();
        registry.form(AgentId(1), AgentId(2), "Survival", Day(1));
        let joined = registry.form(AgentId(2), AgentId(5), "Other", Day(2)).unwrap();

        assert_eq!(
            joined,
            Formation::Joined {
                alliance: AllianceId(0),
                added: 1
            }
        );
        assert_eq!(registry.len(), 1);
        let alliance = registry.alliance_of(AgentId(5)).unwrap();
        assert_eq!(alliance.members, BTreeSet::from([AgentId(1), AgentId(2), AgentId(5)]));
        assert_eq!(alliance.strength, 55.0);
        // Purpose stays with the original
        assert_eq!(alliance.purpose, "Survival");
    }

    #[test]
    fn test_separate_alliances_not_merged() {
        let mut registry = AllianceRegistry::new();
        registry.form(AgentId(1), AgentId(2), "A", Day(1));
        registry.form(AgentId(3), AgentId(4), "B", Day(1));
        let formed = registry.form(AgentId(1), AgentId(3), "C", Day(2)).unwrap();

        // Agent 3 joins the first match; the second alliance is untouched
        assert_eq!(formed.alliance(), AllianceId(0));
        assert_eq!(registry.active_count(), 2);
        assert!(registry.get(AllianceId(1)).unwrap().contains(AgentId(3)));
    }

    #[test]
    fn test_remove_member_breaks() {
        let mut registry = AllianceRegistry::new();
        registry.form(AgentId(1), AgentId(2), "Pact", Day(1));
        assert!(registry.remove_member(AllianceId(0), AgentId(2)).unwrap());

        let alliance = registry.get(AllianceId(0)).unwrap();
        assert!(alliance.broken);
        assert_eq!(registry.active_count(), 0);

        // Broken alliances are inert
        registry.form(AgentId(1), AgentId(7), "Pact", Day(2));
        assert_eq!(registry.len(), 2);
        assert!(registry.get(AllianceId(0)).unwrap().broken);
        assert!(matches!(
            registry.remove_member(AllianceId(9), AgentId(1)),
            Err(SimError::AllianceNotFound(AllianceId(9)))
        ));
    }

    #[test]
    fn test_tick_breaks_weak_alliances() {
        let mut registry = AllianceRegistry::new();
        registry.form(AgentId(1), AgentId(2), "Pact", Day(1));
        registry.alliances[0].strength = 10.0;

        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let params = SimulationParams {
            alliance_perturb_chance: 0.0,
            ..SimulationParams::default()
        };
        assert_eq!(registry.tick(&mut rng, &params), vec![AllianceId(0)]);
        assert!(registry.tick(&mut rng, &params).is_empty());
    }

    #[test]
    fn test_tick_walk_is_bounded() {
        let mut registry = AllianceRegistry::new();
        registry.form(AgentId(1), AgentId(2), "Pact", Day(1));
        let params = SimulationParams {
            alliance_perturb_chance: 1.0,
            ..SimulationParams::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let before = registry.get(AllianceId(0)).unwrap().strength;
        registry.tick(&mut rng, &params);
        let after = registry.get(AllianceId(0)).unwrap().strength;
        assert!((after - before).abs() <= params.alliance_perturb_range);
    }
}
