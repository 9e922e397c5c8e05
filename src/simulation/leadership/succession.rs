//! Leadership succession
//!
//! When the incumbent's authority sags, challengers step up. A challenger
//! only takes over with influence above the incumbent's influence plus
//! authority, so narrow takeovers fail. Failed attempts are costly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::simulation::agents::{Agent, AgentField};
use crate::simulation::error::{SimError, SimResult};
use crate::simulation::params::SimulationParams;
use crate::simulation::types::{AgentId, Role};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SuccessionOutcome {
    /// Authority is above the threshold
    Stable,
    /// Authority is low but nobody stepped up
    NoChallengers,
    Succeeded {
        deposed: AgentId,
        successor: AgentId,
        challenger_influence: f32,
        required: f32,
    },
    Failed {
        challengers: Vec<AgentId>,
        challenger_influence: f32,
        required: f32,
    },
}

/// Spokespersons and radicals under heavy stress, never the incumbent.
/// Returned in slice order.
pub fn challengers(
    agents: &[Agent],
    incumbent: AgentId,
    spokespersons: &BTreeSet<AgentId>,
    params: &SimulationParams,
) -> Vec<AgentId> {
    agents
        .iter()
        .filter(|a| a.id != incumbent)
        .filter(|a| {
            spokespersons.contains(&a.id)
                || (a.ideology.is_radical() && a.stress() > params.mutiny_radical_stress)
        })
        .map(|a| a.id)
        .collect()
}

/// Run a succession contest against the incumbent.
///
/// Does nothing while authority is at or above `succession_threshold`.
pub fn contest(
    agents: &mut [Agent],
    incumbent: AgentId,
    authority: f32,
    spokespersons: &BTreeSet<AgentId>,
    params: &SimulationParams,
) -> SimResult<SuccessionOutcome> {
    if authority >= params.succession_threshold {
        return Ok(SuccessionOutcome::Stable);
    }

    let incumbent_index = agents
        .iter()
        .position(|a| a.id == incumbent)
        .ok_or(SimError::AgentNotFound(incumbent))?;
    let required = agents[incumbent_index].influence() + authority;

    let candidates = challengers(agents, incumbent, spokespersons, params);
    let mut top: Option<(usize, f32)> = None;
    for (index, agent) in agents.iter().enumerate() {
        if !candidates.contains(&agent.id) {
            continue;
        }
        match top {
            Some((_, best)) if agent.influence() <= best => {}
            _ => top = Some((index, agent.influence())),
        }
    }
    let Some((top_index, challenger_influence)) = top else {
        return Ok(SuccessionOutcome::NoChallengers);
    };

    if challenger_influence > required {
        agents[incumbent_index].role = Role::Deposed;
        agents[top_index].role = Role::Captain;
        return Ok(SuccessionOutcome::Succeeded {
            deposed: incumbent,
            successor: agents[top_index].id,
            challenger_influence,
            required,
        });
    }

    for agent in agents.iter_mut().filter(|a| candidates.contains(&a.id)) {
        agent.adjust(AgentField::Stress, params.failed_challenge_stress);
        agent.adjust(AgentField::Influence, -params.failed_challenge_influence);
    }
    Ok(SuccessionOutcome::Failed {
        challengers: candidates,
        challenger_influence,
        required,
    })
}
