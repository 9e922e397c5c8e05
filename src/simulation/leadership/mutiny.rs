//! Mutiny - the ship-wide, violent variant of succession
//!
//! Needs weak authority, enough stressed radicals and real danger. Succeeds
//! only with majority support among everyone but the incumbent.

use serde::{Deserialize, Serialize};

use crate::simulation::agents::{Agent, AgentField};
use crate::simulation::params::SimulationParams;
use crate::simulation::types::{AgentId, Role};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MutinyOutcome {
    Succeeded {
        deposed: Option<AgentId>,
        leader: AgentId,
        mutineers: Vec<AgentId>,
        support: usize,
    },
    Failed {
        mutineers: Vec<AgentId>,
        support: usize,
        needed: usize,
    },
}

impl MutinyOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, MutinyOutcome::Succeeded { .. })
    }
}

fn is_incumbent(agent: &Agent, incumbent: Option<AgentId>) -> bool {
    Some(agent.id) == incumbent
}

/// Whether the ship is ripe for mutiny
pub fn conditions_met(
    agents: &[Agent],
    incumbent: Option<AgentId>,
    authority: f32,
    danger: f32,
    params: &SimulationParams,
) -> bool {
    if authority > params.mutiny_authority_threshold || danger <= params.mutiny_min_danger {
        return false;
    }
    let radicals = agents
        .iter()
        .filter(|a| !is_incumbent(a, incumbent))
        .filter(|a| a.ideology.is_radical() && a.stress() > params.mutiny_radical_stress)
        .count();
    radicals >= params.mutiny_min_radicals
}

/// Number of non-incumbents who would back a mutiny, and the count needed
/// for a strict majority of them
pub fn support(
    agents: &[Agent],
    incumbent: Option<AgentId>,
    params: &SimulationParams,
) -> (usize, usize) {
    let crew: Vec<&Agent> = agents.iter().filter(|a| !is_incumbent(a, incumbent)).collect();
    let backing = crew
        .iter()
        .filter(|a| a.trust_in_leader() < params.mutiny_trust_threshold)
        .count();
    (backing, crew.len() / 2 + 1)
}

/// Attempt a mutiny. On success the most influential mutineer takes the
/// helm and the incumbent is deposed; on failure only the mutineers pay.
pub fn attempt(
    agents: &mut [Agent],
    incumbent: Option<AgentId>,
    params: &SimulationParams,
) -> MutinyOutcome {
    let mutineers: Vec<AgentId> = agents
        .iter()
        .filter(|a| !is_incumbent(a, incumbent) && a.ideology.is_radical())
        .map(|a| a.id)
        .collect();
    let (backing, needed) = support(agents, incumbent, params);

    let mut leader: Option<(usize, f32)> = None;
    for (index, agent) in agents.iter().enumerate() {
        if !mutineers.contains(&agent.id) {
            continue;
        }
        match leader {
            Some((_, best)) if agent.influence() <= best => {}
            _ => leader = Some((index, agent.influence())),
        }
    }

    match leader {
        Some((leader_index, _)) if backing >= needed => {
            for agent in agents.iter_mut().filter(|a| is_incumbent(a, incumbent)) {
                agent.role = Role::Deposed;
            }
            agents[leader_index].role = Role::Captain;
            MutinyOutcome::Succeeded {
                deposed: incumbent,
                leader: agents[leader_index].id,
                mutineers,
                support: backing,
            }
        }
        _ => {
            for agent in agents.iter_mut().filter(|a| mutineers.contains(&a.id)) {
                agent.adjust(AgentField::Stress, params.mutiny_stress_penalty);
                agent.adjust(AgentField::Influence, -params.mutiny_influence_penalty);
            }
            MutinyOutcome::Failed {
                mutineers,
                support: backing,
                needed,
            }
        }
    }
}
