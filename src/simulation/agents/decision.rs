//! Action selection - base scores from personality and needs, then additive
//! modifiers looked up by psychological state and hidden agenda.

use serde::{Deserialize, Serialize};

use crate::simulation::agents::agent::{Agent, AgentField};
use crate::simulation::types::{Action, HiddenAgenda, PsychologicalState};

/// Situation an agent decides in
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DecisionContext {
    /// Ship danger (0-100)
    pub danger_level: f32,
}

/// Scores for each action, indexed in `Action::ALL` order
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionScores([f32; 4]);

impl ActionScores {
    pub fn get(&self, action: Action) -> f32 {
        self.0[index(action)]
    }

    fn add(&mut self, action: Action, delta: f32) {
        self.0[index(action)] += delta;
    }

    /// Highest score; earlier actions win ties
    pub fn best(&self) -> Action {
        let mut best = Action::ALL[0];
        for action in Action::ALL.into_iter().skip(1) {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }
}

fn index(action: Action) -> usize {
    match action {
        Action::Cooperate => 0,
        Action::Rebel => 1,
        Action::TakeRisk => 2,
        Action::SeekResources => 3,
    }
}

/// Modifiers applied for a psychological state
fn state_modifiers(state: PsychologicalState) -> &'static [(Action, f32)] {
    match state {
        PsychologicalState::Angry => &[(Action::Rebel, 0.5)],
        PsychologicalState::Depressed => &[(Action::Cooperate, -0.3)],
        PsychologicalState::Cooperative => &[(Action::Cooperate, 0.7)],
        PsychologicalState::Paranoid => &[(Action::SeekResources, 0.3), (Action::Cooperate, -0.2)],
        PsychologicalState::Normal => &[],
    }
}

/// Modifiers applied for a hidden agenda
fn agenda_modifiers(agenda: HiddenAgenda) -> &'static [(Action, f32)] {
    match agenda {
        HiddenAgenda::SeekPower => &[(Action::Rebel, 0.5), (Action::Cooperate, -0.3)],
        HiddenAgenda::Survive => &[(Action::SeekResources, 0.7)],
        HiddenAgenda::CreateChaos => &[(Action::TakeRisk, 0.4), (Action::Rebel, 0.2)],
        HiddenAgenda::FindLove => &[(Action::Cooperate, 0.2)],
    }
}

/// Compute the full score table for an agent
pub fn score_actions(agent: &Agent, context: &DecisionContext) -> ActionScores {
    let p = &agent.personality;
    let emotions = agent.emotions();
    let deprivation = 1.0 - agent.calculate_satisfaction() / 100.0;
    let danger = (context.danger_level / 100.0).clamp(0.0, 1.0);

    let mut scores = ActionScores([
        p.agreeableness + 0.5 * agent.get(AgentField::CooperationChance),
        emotions.anger * (1.0 + p.neuroticism)
            + 0.5 * agent.get(AgentField::RebellionChance),
        p.openness * (1.0 - p.conscientiousness),
        (1.0 - agent.drives().physiological).max(deprivation) + 0.3 * danger,
    ]);

    for &(action, delta) in state_modifiers(agent.psychological_state()) {
        scores.add(action, delta);
    }
    if let Some(agenda) = agent.hidden_agenda {
        for &(action, delta) in agenda_modifiers(agenda) {
            scores.add(action, delta);
        }
    }

    scores
}

/// Pick the day's action
pub fn decide_action(agent: &Agent, context: &DecisionContext) -> Action {
    score_actions(agent, context).best()
}

impl Agent {
    pub fn decide_action(&self, context: &DecisionContext) -> Action {
        decide_action(self, context)
    }
}
