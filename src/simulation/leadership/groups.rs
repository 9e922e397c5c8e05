//! Group spokespersons
//!
//! Every identity group speaks through its most articulate, most
//! influential member. Recomputed daily.

use std::collections::BTreeMap;

use crate::simulation::agents::Agent;
use crate::simulation::types::{AgentId, GroupIdentity};

/// How strongly an agent can speak for a group
pub fn voice(agent: &Agent) -> f32 {
    agent.speaking_ability() + agent.influence()
}

/// Elect one spokesperson per non-empty group and set each agent's
/// `is_spokesperson` flag. First agent in slice order wins ties.
pub fn elect_spokespersons(agents: &mut [Agent]) -> BTreeMap<GroupIdentity, AgentId> {
    let mut elected: BTreeMap<GroupIdentity, (AgentId, f32)> = BTreeMap::new();
    for agent in agents.iter() {
        let score = voice(agent);
        for &group in &agent.groups {
            match elected.get(&group) {
                Some(&(_, best)) if score <= best => {}
                _ => {
                    elected.insert(group, (agent.id, score));
                }
            }
        }
    }

    let spokespersons: BTreeMap<GroupIdentity, AgentId> =
        elected.into_iter().map(|(group, (id, _))| (group, id)).collect();
    for agent in agents.iter_mut() {
        agent.is_spokesperson = spokespersons.values().any(|&id| id == agent.id);
    }
    spokespersons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::agents::AgentField;
    use crate::simulation::types::{Ideology, Role};

    #[test]
    fn test_elect_per_group() {
        let mut agents = vec![
            Agent::new(AgentId(0), "Stoker", Role::Worker, Ideology::Revolutionary)
                .with_groups([GroupIdentity::Workers])
                .with_field(AgentField::SpeakingAbility, 80.0),
            Agent::new(AgentId(1), "Cook", Role::Worker, Ideology::Reformist)
                .with_groups([GroupIdentity::Workers, GroupIdentity::Women])
                .with_field(AgentField::SpeakingAbility, 60.0),
            Agent::new(AgentId(2), "Priest", Role::Passenger, Ideology::Conservative)
                .with_groups([GroupIdentity::Religious]),
        ];
        let elected = elect_spokespersons(&mut agents);

        assert_eq!(elected.get(&GroupIdentity::Workers), Some(&AgentId(0)));
        assert_eq!(elected.get(&GroupIdentity::Women), Some(&AgentId(1)));
        assert_eq!(elected.get(&GroupIdentity::Religious), Some(&AgentId(2)));
        assert!(elected.get(&GroupIdentity::Merchants).is_none());
        assert!(agents.iter().all(|a| a.is_spokesperson));
    }

    #[test]
    fn test_ties_go_to_first() {
        let mut agents = vec![
            Agent::new(AgentId(4), "A", Role::Worker, Ideology::Liberal)
                .with_groups([GroupIdentity::Workers]),
            Agent::new(AgentId(5), "B", Role::Worker, Ideology::Liberal)
                .with_groups([GroupIdentity::Workers]),
        ];
        let elected = elect_spokespersons(&mut agents);
        assert_eq!(elected[&GroupIdentity::Workers], AgentId(4));
        assert!(!agents[1].is_spokesperson);
    }
}
