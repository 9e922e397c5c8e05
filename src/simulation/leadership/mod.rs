//! Leadership - who holds the helm, and how they lose it
//!
//! - `groups`: per-group spokesperson election
//! - `succession`: authority-gated challenges with a margin requirement
//! - `mutiny`: crew-wide uprising needing majority support

pub mod groups;
pub mod succession;
pub mod mutiny;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::simulation::agents::Agent;
use crate::simulation::error::SimResult;
use crate::simulation::params::SimulationParams;
use crate::simulation::social::RelationshipGraph;
use crate::simulation::types::{AgentId, GroupIdentity, Role};

pub use groups::{elect_spokespersons, voice};
pub use mutiny::MutinyOutcome;
pub use succession::SuccessionOutcome;

pub const MAX_AUTHORITY: f32 = 100.0;

/// Holds the designated incumbent and their authority
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadershipController {
    incumbent: Option<AgentId>,
    /// 0-100
    authority: f32,
    spokespersons: BTreeMap<GroupIdentity, AgentId>,
}

impl LeadershipController {
    pub fn new(incumbent: Option<AgentId>, authority: f32) -> Self {
        LeadershipController {
            incumbent,
            authority: authority.clamp(0.0, MAX_AUTHORITY),
            spokespersons: BTreeMap::new(),
        }
    }

    /// Take the first captain in the crew as incumbent
    pub fn from_crew(agents: &[Agent], authority: f32) -> Self {
        let incumbent = agents.iter().find(|a| a.role == Role::Captain).map(|a| a.id);
        Self::new(incumbent, authority)
    }

    /// Put `incumbent` at the helm with the given authority
    pub fn install(&mut self, incumbent: AgentId, authority: f32) {
        self.incumbent = Some(incumbent);
        self.authority = authority.clamp(0.0, MAX_AUTHORITY);
    }

    pub fn incumbent(&self) -> Option<AgentId> {
        self.incumbent
    }

    pub fn authority(&self) -> f32 {
        self.authority
    }

    pub fn adjust_authority(&mut self, delta: f32) {
        self.authority = (self.authority + delta).clamp(0.0, MAX_AUTHORITY);
    }

    pub fn spokespersons(&self) -> &BTreeMap<GroupIdentity, AgentId> {
        &self.spokespersons
    }

    fn spokesperson_ids(&self) -> BTreeSet<AgentId> {
        self.spokespersons.values().copied().collect()
    }

    pub fn update_spokespersons(&mut self, agents: &mut [Agent]) {
        self.spokespersons = elect_spokespersons(agents);
    }

    /// Fill an empty helm with the most socially central agent.
    /// Returns the new incumbent, if one was installed.
    pub fn fill_vacancy(
        &mut self,
        agents: &mut [Agent],
        graph: &RelationshipGraph,
        params: &SimulationParams,
    ) -> Option<AgentId> {
        if self.incumbent.is_some() {
            return None;
        }
        let chosen = graph.most_influential(agents)?;
        for agent in agents.iter_mut().filter(|a| a.id == chosen) {
            agent.role = Role::Captain;
        }
        self.incumbent = Some(chosen);
        self.authority = params.authority_after_succession;
        Some(chosen)
    }

    /// Authority follows the crew's trust: it closes a fixed fraction of the
    /// gap to the mean trust of everyone but the incumbent
    pub fn drift_authority(&mut self, agents: &[Agent], params: &SimulationParams) {
        let trust: Vec<f32> = agents
            .iter()
            .filter(|a| Some(a.id) != self.incumbent)
            .map(|a| a.trust_in_leader())
            .collect();
        if trust.is_empty() {
            return;
        }
        let mean = trust.iter().sum::<f32>() / trust.len() as f32;
        self.adjust_authority((mean - self.authority) * params.authority_drift_rate);
    }

    /// Run a succession contest if authority has dropped below threshold
    pub fn check_succession(
        &mut self,
        agents: &mut [Agent],
        params: &SimulationParams,
    ) -> SimResult<SuccessionOutcome> {
        let Some(incumbent) = self.incumbent else {
            return Ok(SuccessionOutcome::NoChallengers);
        };
        let outcome = succession::contest(
            agents,
            incumbent,
            self.authority,
            &self.spokesperson_ids(),
            params,
        )?;
        if let SuccessionOutcome::Succeeded { successor, .. } = outcome {
            self.incumbent = Some(successor);
            self.authority = params.authority_after_succession;
        }
        Ok(outcome)
    }

    /// Attempt a mutiny if conditions allow. A successful mutiny zeroes
    /// authority.
    pub fn check_mutiny(
        &mut self,
        agents: &mut [Agent],
        danger: f32,
        params: &SimulationParams,
    ) -> Option<MutinyOutcome> {
        if !mutiny::conditions_met(agents, self.incumbent, self.authority, danger, params) {
            return None;
        }
        let outcome = mutiny::attempt(agents, self.incumbent, params);
        if let MutinyOutcome::Succeeded { leader, .. } = outcome {
            self.incumbent = Some(leader);
            self.authority = 0.0;
        }
        Some(outcome)
    }
}
