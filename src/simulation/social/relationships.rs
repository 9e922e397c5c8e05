//! Relationship graph - undirected weighted edges between agents
//!
//! Stored as an adjacency map with both directions kept in sync. An edge
//! never holds zero strength: anything that drops to zero is removed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::simulation::agents::Agent;
use crate::simulation::error::{SimError, SimResult};
use crate::simulation::params::SimulationParams;
use crate::simulation::types::{AgentId, InteractionType, RelationshipType};

/// Strength change per interaction kind
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct InteractionDeltas {
    pub cooperation: f32,
    pub conflict: f32,
    /// Strength given to a new edge whose first interaction was negative
    pub new_edge_floor: f32,
}

impl InteractionDeltas {
    pub fn from_params(params: &SimulationParams) -> Self {
        InteractionDeltas {
            cooperation: params.cooperation_delta,
            conflict: params.conflict_delta,
            new_edge_floor: params.new_edge_floor,
        }
    }

    pub fn delta(&self, interaction: InteractionType) -> f32 {
        match interaction {
            InteractionType::Cooperation => self.cooperation,
            InteractionType::Conflict => self.conflict,
        }
    }
}

impl Default for InteractionDeltas {
    fn default() -> Self {
        InteractionDeltas {
            cooperation: 0.2,
            conflict: -0.3,
            new_edge_floor: 0.05,
        }
    }
}

/// Clamp a strength into [0, 1]; NaN collapses to zero
fn clamp_strength(strength: f32) -> f32 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

/// A relationship between two agents
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// 0.0 (exclusive) to 1.0
    pub strength: f32,
    pub relationship_type: RelationshipType,
}

/// What an interaction did to the graph
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InteractionResult {
    Created(Relationship),
    Updated(Relationship),
    /// The edge's strength reached zero and it was removed
    Removed,
}

/// Undirected graph over agent ids
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RelationshipGraph {
    adjacency: BTreeMap<AgentId, BTreeMap<AgentId, Relationship>>,
    deltas: InteractionDeltas,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::with_deltas(InteractionDeltas::default())
    }

    pub fn with_deltas(deltas: InteractionDeltas) -> Self {
        RelationshipGraph {
            adjacency: BTreeMap::new(),
            deltas,
        }
    }

    /// Add a node. Returns false if it was already present (graph unchanged).
    pub fn add_agent(&mut self, agent: AgentId) -> bool {
        if self.adjacency.contains_key(&agent) {
            return false;
        }
        self.adjacency.insert(agent, BTreeMap::new());
        true
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.adjacency.contains_key(&agent)
    }

    fn require(&self, a: AgentId, b: AgentId) -> SimResult<()> {
        for id in [a, b] {
            if !self.contains(id) {
                return Err(SimError::AgentNotFound(id));
            }
        }
        if a == b {
            return Err(SimError::SelfRelationship(a));
        }
        Ok(())
    }

    fn insert_edge(&mut self, a: AgentId, b: AgentId, relationship: Relationship) {
        if let Some(edges) = self.adjacency.get_mut(&a) {
            edges.insert(b, relationship);
        }
        if let Some(edges) = self.adjacency.get_mut(&b) {
            edges.insert(a, relationship);
        }
    }

    fn remove_edge(&mut self, a: AgentId, b: AgentId) {
        if let Some(edges) = self.adjacency.get_mut(&a) {
            edges.remove(&b);
        }
        if let Some(edges) = self.adjacency.get_mut(&b) {
            edges.remove(&a);
        }
    }

    /// Seed or overwrite an edge. A strength clamped to zero removes it.
    pub fn set_relationship(
        &mut self,
        a: AgentId,
        b: AgentId,
        strength: f32,
        relationship_type: RelationshipType,
    ) -> SimResult<()> {
        self.require(a, b)?;
        let strength = clamp_strength(strength);
        if strength <= 0.0 {
            self.remove_edge(a, b);
        } else {
            self.insert_edge(a, b, Relationship { strength, relationship_type });
        }
        Ok(())
    }

    /// Record an interaction between two agents
    pub fn apply_interaction(
        &mut self,
        a: AgentId,
        b: AgentId,
        interaction: InteractionType,
    ) -> SimResult<InteractionResult> {
        self.require(a, b)?;
        let delta = self.deltas.delta(interaction);

        match self.relationship(a, b) {
            Some(mut rel) => {
                rel.strength = clamp_strength(rel.strength + delta);
                // Type is decided by the first non-neutral interaction only
                if rel.relationship_type == RelationshipType::Neutral {
                    rel.relationship_type = interaction.implied_relationship();
                }
                if rel.strength <= 0.0 {
                    self.remove_edge(a, b);
                    Ok(InteractionResult::Removed)
                } else {
                    self.insert_edge(a, b, rel);
                    Ok(InteractionResult::Updated(rel))
                }
            }
            None => {
                let strength = clamp_strength(delta.max(self.deltas.new_edge_floor));
                let rel = Relationship {
                    strength,
                    relationship_type: interaction.implied_relationship(),
                };
                if rel.strength <= 0.0 {
                    return Ok(InteractionResult::Removed);
                }
                self.insert_edge(a, b, rel);
                Ok(InteractionResult::Created(rel))
            }
        }
    }

    /// Change only the type of an existing edge
    pub fn retype(&mut self, a: AgentId, b: AgentId, relationship_type: RelationshipType) -> bool {
        match self.relationship(a, b) {
            Some(mut rel) => {
                rel.relationship_type = relationship_type;
                self.insert_edge(a, b, rel);
                true
            }
            None => false,
        }
    }

    /// Weaken every edge by `rate`; edges reaching zero are removed.
    /// Returns the removed pairs (lower id first).
    pub fn decay(&mut self, rate: f32) -> Vec<(AgentId, AgentId)> {
        let mut removed = Vec::new();
        for (&a, edges) in self.adjacency.iter_mut() {
            for (&b, rel) in edges.iter_mut() {
                rel.strength = clamp_strength(rel.strength - rate);
                if rel.strength <= 0.0 && a < b {
                    removed.push((a, b));
                }
            }
        }
        for edges in self.adjacency.values_mut() {
            edges.retain(|_, rel| rel.strength > 0.0);
        }
        removed
    }

    pub fn relationship(&self, a: AgentId, b: AgentId) -> Option<Relationship> {
        self.adjacency.get(&a).and_then(|edges| edges.get(&b)).copied()
    }

    pub fn degree(&self, agent: AgentId) -> usize {
        self.adjacency.get(&agent).map_or(0, |edges| edges.len())
    }

    /// Every edge once, lower id first
    pub fn edges(&self) -> impl Iterator<Item = (AgentId, AgentId, &Relationship)> {
        self.adjacency.iter().flat_map(|(&a, edges)| {
            edges
                .iter()
                .filter(move |&(&b, _)| a < b)
                .map(move |(&b, rel)| (a, b, rel))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Mean edge strength, 0.0 with no edges
    pub fn mean_strength(&self) -> f32 {
        let (sum, count) = self
            .edges()
            .fold((0.0, 0usize), |(sum, count), (_, _, rel)| (sum + rel.strength, count + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }

    /// Degree plus extraversion; first agent in `agents` order wins ties.
    /// Agents not in the graph are skipped.
    pub fn most_influential(&self, agents: &[Agent]) -> Option<AgentId> {
        let mut best: Option<(AgentId, f32)> = None;
        for agent in agents.iter().filter(|a| self.contains(a.id)) {
            let score = self.degree(agent.id) as f32 + agent.personality.extraversion;
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((agent.id, score)),
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::{Ideology, Personality, Role};
    use proptest::prelude::*;

    fn graph_with(ids: &[u32]) -> RelationshipGraph {
        let mut graph = RelationshipGraph::new();
        for &id in ids {
            graph.add_agent(AgentId(id));
        }
        graph
    }

    #[test]
    fn test_add_agent_idempotent() {
        let mut graph = graph_with(&[1, 2]);
        graph.set_relationship(AgentId(1), AgentId(2), 0.5, RelationshipType::Friendship).unwrap();
        let before = graph.relationship(AgentId(1), AgentId(2));

        assert!(!graph.add_agent(AgentId(1)));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.relationship(AgentId(1), AgentId(2)), before);
    }

    #[test]
    fn test_set_relationship_requires_agents() {
        let mut graph = graph_with(&[1]);
        let err = graph
            .set_relationship(AgentId(1), AgentId(7), 0.5, RelationshipType::Neutral)
            .unwrap_err();
        assert!(matches!(err, SimError::AgentNotFound(AgentId(7))));
        assert!(matches!(
            graph.apply_interaction(AgentId(1), AgentId(1), InteractionType::Cooperation),
            Err(SimError::SelfRelationship(_))
        ));
    }

    #[test]
    fn test_cooperation_strengthens_and_types() {
        let mut graph = graph_with(&[1, 2]);
        graph.set_relationship(AgentId(1), AgentId(2), 0.5, RelationshipType::Neutral).unwrap();
        graph.apply_interaction(AgentId(1), AgentId(2), InteractionType::Cooperation).unwrap();

        let rel = graph.relationship(AgentId(2), AgentId(1)).unwrap();
        assert!((rel.strength - 0.7).abs() < 1e-6);
        assert_eq!(rel.relationship_type, RelationshipType::Friendship);

        // Type does not change again once non-neutral
        graph.apply_interaction(AgentId(1), AgentId(2), InteractionType::Conflict).unwrap();
        let rel = graph.relationship(AgentId(1), AgentId(2)).unwrap();
        assert!((rel.strength - 0.4).abs() < 1e-6);
        assert_eq!(rel.relationship_type, RelationshipType::Friendship);
    }

    #[test]
    fn test_conflict_to_zero_removes_edge() {
        let mut graph = graph_with(&[1, 2]);
        graph.set_relationship(AgentId(1), AgentId(2), 0.2, RelationshipType::Friendship).unwrap();
        let result = graph
            .apply_interaction(AgentId(1), AgentId(2), InteractionType::Conflict)
            .unwrap();
        assert_eq!(result, InteractionResult::Removed);
        assert!(graph.relationship(AgentId(1), AgentId(2)).is_none());
        assert_eq!(graph.degree(AgentId(1)), 0);
    }

    #[test]
    fn test_first_conflict_creates_floor_edge() {
        let mut graph = graph_with(&[1, 2]);
        let result = graph
            .apply_interaction(AgentId(1), AgentId(2), InteractionType::Conflict)
            .unwrap();
        let rel = graph.relationship(AgentId(1), AgentId(2)).unwrap();
        assert_eq!(result, InteractionResult::Created(rel));
        assert_eq!(rel.strength, 0.05);
        assert_eq!(rel.relationship_type, RelationshipType::Conflict);

        // Fades after a few days without renewal
        for _ in 0..5 {
            graph.decay(0.01);
        }
        assert!(graph.relationship(AgentId(1), AgentId(2)).is_none());
    }

    #[test]
    fn test_first_cooperation_creates_edge() {
        let mut graph = graph_with(&[1, 2]);
        graph.apply_interaction(AgentId(2), AgentId(1), InteractionType::Cooperation).unwrap();
        let rel = graph.relationship(AgentId(1), AgentId(2)).unwrap();
        assert!((rel.strength - 0.2).abs() < 1e-6);
        assert_eq!(rel.relationship_type, RelationshipType::Friendship);
    }

    #[test]
    fn test_decay_removes_zero_edges() {
        let mut graph = graph_with(&[1, 2, 3]);
        graph.set_relationship(AgentId(1), AgentId(2), 0.1, RelationshipType::Neutral).unwrap();
        graph.set_relationship(AgentId(2), AgentId(3), 0.9, RelationshipType::Friendship).unwrap();

        let removed = graph.decay(0.1);
        assert_eq!(removed, vec![(AgentId(1), AgentId(2))]);
        assert!(graph.relationship(AgentId(2), AgentId(1)).is_none());
        assert_eq!(graph.edge_count(), 1);
        assert!((graph.relationship(AgentId(3), AgentId(2)).unwrap().strength - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_most_influential() {
        let agents: Vec<Agent> = (1..=3)
            .map(|i| {
                Agent::new(AgentId(i), format!("A{i}"), Role::Worker, Ideology::Liberal)
                    .with_personality(Personality::new(0.5, 0.5, 0.5, 0.5, 0.5))
            })
            .collect();

        assert_eq!(RelationshipGraph::new().most_influential(&agents), None);

        let mut graph = graph_with(&[1, 2, 3]);
        // All tied: first in slice order wins
        assert_eq!(graph.most_influential(&agents), Some(AgentId(1)));

        graph.set_relationship(AgentId(2), AgentId(3), 0.5, RelationshipType::Friendship).unwrap();
        assert_eq!(graph.most_influential(&agents), Some(AgentId(2)));
        assert_eq!(graph.most_influential(&[]), None);
    }

    #[test]
    fn test_negative_decay_cannot_exceed_one() {
        let mut graph = graph_with(&[1, 2]);
        graph.set_relationship(AgentId(1), AgentId(2), 0.9, RelationshipType::Friendship).unwrap();
        assert!(graph.decay(-0.5).is_empty());
        assert_eq!(graph.relationship(AgentId(1), AgentId(2)).unwrap().strength, 1.0);
    }

    #[test]
    fn test_new_edge_floor_is_clamped() {
        let deltas = InteractionDeltas {
            new_edge_floor: 3.0,
            ..InteractionDeltas::default()
        };
        let mut graph = RelationshipGraph::with_deltas(deltas);
        graph.add_agent(AgentId(1));
        graph.add_agent(AgentId(2));
        graph.apply_interaction(AgentId(1), AgentId(2), InteractionType::Conflict).unwrap();
        assert_eq!(graph.relationship(AgentId(1), AgentId(2)).unwrap().strength, 1.0);
    }

    #[test]
    fn test_nan_strength_removes_edge() {
        let mut graph = graph_with(&[1, 2]);
        graph.set_relationship(AgentId(1), AgentId(2), 0.5, RelationshipType::Neutral).unwrap();
        graph.set_relationship(AgentId(1), AgentId(2), f32::NAN, RelationshipType::Neutral).unwrap();
        assert!(graph.relationship(AgentId(1), AgentId(2)).is_none());

        graph.set_relationship(AgentId(1), AgentId(2), 0.5, RelationshipType::Neutral).unwrap();
        graph.decay(f32::NAN);
        assert!(graph.relationship(AgentId(2), AgentId(1)).is_none());
    }

    fn any_value(range: std::ops::Range<f32>) -> impl Strategy<Value = f32> {
        prop_oneof![8 => range, 1 => Just(f32::NAN)]
    }

    proptest! {
        #[test]
        fn strengths_stay_in_unit_interval(
            cooperation in any_value(-2.0..2.0),
            conflict in any_value(-2.0..2.0),
            new_edge_floor in any_value(-1.0..3.0),
            rate in any_value(-1.0..1.0),
            seed_strength in any_value(-1.0..2.0),
            ops in prop::collection::vec((0u32..4, 0u32..4, any::<bool>()), 0..60),
        ) {
            let mut graph = RelationshipGraph::with_deltas(InteractionDeltas {
                cooperation,
                conflict,
                new_edge_floor,
            });
            for id in 0..4 {
                graph.add_agent(AgentId(id));
            }
            graph.set_relationship(AgentId(0), AgentId(1), seed_strength, RelationshipType::Neutral).unwrap();
            for (a, b, cooperate) in ops {
                if a == b {
                    continue;
                }
                let kind = if cooperate { InteractionType::Cooperation } else { InteractionType::Conflict };
                graph.apply_interaction(AgentId(a), AgentId(b), kind).unwrap();
                graph.decay(rate);
                for (_, _, rel) in graph.edges() {
                    prop_assert!(rel.strength > 0.0 && rel.strength <= 1.0);
                }
            }
        }
    }
}
