//! Discourse - protests over unmet needs and philosophical arguments
//!
//! Neither changes the ship's course. Protests cost the incumbent authority
//! and buy the protesters a little relief; discussions raise tension and
//! reward whoever speaks up.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::simulation::agents::{Agent, AgentField};
use crate::simulation::leadership::LeadershipController;
use crate::simulation::params::SimulationParams;
use crate::simulation::ship::ShipState;
use crate::simulation::types::{AgentId, Ideology};

pub const MAX_CONCESSIONS: usize = 3;
pub const CONCESSION_AUTHORITY_COST: f32 = 5.0;
pub const CONCESSION_NEED_RELIEF: f32 = 10.0;
pub const PROTEST_STRESS_RELIEF: f32 = 5.0;

pub const MAX_SPEAKERS: usize = 3;
pub const MIN_SPEAKING_ABILITY: f32 = 40.0;
pub const SPEAKER_INFLUENCE_GAIN: f32 = 2.0;
pub const DISCUSSION_TENSION_MIN: f32 = 5.0;
pub const DISCUSSION_TENSION_MAX: f32 = 15.0;

const NO_CLEAR_ANSWER: &str = "No clear answer";

/// A question the passengers argue over, with each outlook's answer
pub struct PhilosophicalQuestion {
    pub question: &'static str,
    perspectives: &'static [(Ideology, &'static str)],
}

impl PhilosophicalQuestion {
    pub fn perspective(&self, ideology: Ideology) -> &'static str {
        self.perspectives
            .iter()
            .find(|(i, _)| *i == ideology)
            .map_or(NO_CLEAR_ANSWER, |&(_, answer)| answer)
    }
}

pub static QUESTIONS: [PhilosophicalQuestion; 3] = [
    PhilosophicalQuestion {
        question: "What is the meaning of this voyage?",
        perspectives: &[
            (Ideology::Authoritarian, "To maintain order and hierarchy"),
            (Ideology::Revolutionary, "To overthrow oppressive structures"),
            (Ideology::Conservative, "To preserve traditional values"),
            (Ideology::Liberal, "To ensure everyone's rights are protected"),
            (Ideology::Anarchist, "To abolish all authority"),
        ],
    },
    PhilosophicalQuestion {
        question: "Is God punishing us?",
        perspectives: &[
            (Ideology::Conservative, "Yes, for abandoning traditional values"),
            (Ideology::Liberal, "God doesn't interfere in human affairs"),
            (Ideology::Revolutionary, "There is no God, only human struggle"),
            (Ideology::Authoritarian, "God supports legitimate authority"),
        ],
    },
    PhilosophicalQuestion {
        question: "What is justice?",
        perspectives: &[
            (Ideology::Authoritarian, "Justice is order and discipline"),
            (Ideology::Revolutionary, "Justice is equality and liberation"),
            (Ideology::Reformist, "Justice is gradual improvement"),
            (Ideology::Liberal, "Justice is protecting individual rights"),
        ],
    },
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProtestReport {
    pub protesters: Vec<AgentId>,
    /// Every critical need named by a protester
    pub demands: BTreeSet<String>,
    /// Demands the incumbent gave in on
    pub concessions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub agent: AgentId,
    pub perspective: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscussionReport {
    pub question: String,
    pub statements: Vec<Statement>,
    pub tension_added: f32,
}

fn protesters(agents: &[Agent], incumbent: Option<AgentId>) -> Vec<usize> {
    agents
        .iter()
        .enumerate()
        .filter(|(_, a)| Some(a.id) != incumbent && !a.get_critical_needs().is_empty())
        .map(|(i, _)| i)
        .collect()
}

/// Enough deprived agents and a stressed enough ship
pub fn protest_conditions_met(
    agents: &[Agent],
    incumbent: Option<AgentId>,
    params: &SimulationParams,
) -> bool {
    if agents.is_empty() {
        return false;
    }
    let mean_stress = agents.iter().map(|a| a.stress()).sum::<f32>() / agents.len() as f32;
    protesters(agents, incumbent).len() >= params.protest_min_agents
        && mean_stress > params.protest_min_stress
}

/// Stage a protest if conditions allow. The incumbent concedes between one
/// and three demands, losing authority.
pub fn organize_protest<R: Rng>(
    agents: &mut [Agent],
    leadership: &mut LeadershipController,
    params: &SimulationParams,
    rng: &mut R,
) -> Option<ProtestReport> {
    if !protest_conditions_met(agents, leadership.incumbent(), params) {
        return None;
    }

    let indices = protesters(agents, leadership.incumbent());
    let demands: BTreeSet<String> = indices
        .iter()
        .flat_map(|&i| agents[i].get_critical_needs())
        .collect();

    let all_demands: Vec<&String> = demands.iter().collect();
    let count = rng.gen_range(1..=MAX_CONCESSIONS).min(all_demands.len());
    let mut concessions: Vec<String> = all_demands
        .choose_multiple(rng, count)
        .map(|s| (*s).clone())
        .collect();
    concessions.sort();

    if !concessions.is_empty() {
        leadership.adjust_authority(-CONCESSION_AUTHORITY_COST);
        for &i in &indices {
            let agent = &mut agents[i];
            agent.update_needs(concessions.iter().map(|c| (c, CONCESSION_NEED_RELIEF)));
            agent.adjust(AgentField::Stress, -PROTEST_STRESS_RELIEF);
        }
    }

    Some(ProtestReport {
        protesters: indices.iter().map(|&i| agents[i].id).collect(),
        demands,
        concessions,
    })
}

/// Possibly hold a philosophical discussion among the articulate
pub fn hold_discussion<R: Rng>(
    agents: &mut [Agent],
    ship: &mut ShipState,
    params: &SimulationParams,
    rng: &mut R,
) -> Option<DiscussionReport> {
    if rng.gen::<f32>() >= params.discussion_chance {
        return None;
    }
    let question = QUESTIONS.choose(rng)?;

    let eligible: Vec<usize> = agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.speaking_ability() > MIN_SPEAKING_ABILITY)
        .map(|(i, _)| i)
        .collect();
    let speakers: Vec<usize> = eligible
        .choose_multiple(rng, MAX_SPEAKERS.min(eligible.len()))
        .copied()
        .collect();

    let statements = speakers
        .into_iter()
        .map(|i| {
            let speaker = &mut agents[i];
            speaker.adjust(AgentField::Influence, SPEAKER_INFLUENCE_GAIN);
            Statement {
                agent: speaker.id,
                perspective: question.perspective(speaker.ideology).to_string(),
            }
        })
        .collect();

    let tension_added = rng.gen_range(DISCUSSION_TENSION_MIN..DISCUSSION_TENSION_MAX);
    ship.add_tension(tension_added);

    Some(DiscussionReport {
        question: question.question.to_string(),
        statements,
        tension_added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::agents::{Need, NeedSet};
    use crate::simulation::types::Role;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hungry(id: u32, stress: f32) -> Agent {
        let needs = NeedSet::from_needs([Need::new("food", 10.0), Need::new("warmth", 80.0)]).unwrap();
        Agent::new(AgentId(id), format!("Hungry {id}"), Role::Worker, Ideology::Liberal)
            .with_needs(needs)
            .with_field(AgentField::Stress, stress)
    }

    fn ship_of(stress: f32) -> Vec<Agent> {
        let mut agents = vec![Agent::new(AgentId(0), "Captain", Role::Captain, Ideology::Authoritarian)
            .with_field(AgentField::Stress, stress)];
        agents.extend((1..=3).map(|i| hungry(i, stress)));
        agents
    }

    #[test]
    fn test_missing_perspective() {
        assert_eq!(QUESTIONS[1].perspective(Ideology::Anarchist), "No clear answer");
        assert_eq!(
            QUESTIONS[2].perspective(Ideology::Reformist),
            "Justice is gradual improvement"
        );
    }

    #[test]
    fn test_protest_requires_stress() {
        let params = SimulationParams::default();
        let agents = ship_of(50.0);
        assert!(!protest_conditions_met(&agents, Some(AgentId(0)), &params));
        assert!(protest_conditions_met(&ship_of(70.0), Some(AgentId(0)), &params));
    }

    #[test]
    fn test_protest_concessions() {
        let params = SimulationParams::default();
        let mut agents = ship_of(70.0);
        let mut leadership = LeadershipController::from_crew(&agents, 70.0);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let report = organize_protest(&mut agents, &mut leadership, &params, &mut rng).unwrap();
        assert_eq!(report.protesters, vec![AgentId(1), AgentId(2), AgentId(3)]);
        assert_eq!(report.demands, BTreeSet::from(["food".to_string()]));
        assert_eq!(report.concessions, vec!["food".to_string()]);
        assert_eq!(leadership.authority(), 65.0);
        assert_eq!(agents[1].needs.get("food").unwrap().value(), 20.0);
        assert_eq!(agents[1].stress(), 65.0);
        // The captain does not protest
        assert_eq!(agents[0].stress(), 70.0);
    }

    #[test]
    fn test_discussion_rewards_speakers() {
        let params = SimulationParams {
            discussion_chance: 1.0,
            ..SimulationParams::default()
        };
        let mut agents: Vec<Agent> = (0..5)
            .map(|i| {
                Agent::new(AgentId(i), format!("P{i}"), Role::Intellectual, Ideology::Reformist)
                    .with_field(AgentField::SpeakingAbility, if i == 4 { 10.0 } else { 60.0 })
            })
            .collect();
        let mut ship = ShipState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let report = hold_discussion(&mut agents, &mut ship, &params, &mut rng).unwrap();
        assert_eq!(report.statements.len(), 3);
        assert!(report.statements.iter().all(|s| s.agent != AgentId(4)));
        assert!(report.tension_added >= 5.0 && report.tension_added < 15.0);
        assert_eq!(ship.tension, report.tension_added);

        let total: f32 = agents.iter().map(|a| a.influence()).sum();
        assert_eq!(total, 5.0 * 50.0 + 3.0 * SPEAKER_INFLUENCE_GAIN);
    }
}
