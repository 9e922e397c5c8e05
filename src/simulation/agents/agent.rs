//! Agent - one person aboard, with needs, emotions, stress and memories
//!
//! All bounded scalars are private and only mutated through [`Agent::adjust`]
//! or [`Agent::set`], which clamp to the field's domain. Callers never have
//! to pre-validate numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::simulation::agents::memory::{Memory, MemoryLog};
use crate::simulation::agents::needs::NeedSet;
use crate::simulation::types::{
    AgentId, Day, Drives, Emotions, GroupIdentity, HiddenAgenda, Ideology, InteractionType,
    Personality, PsychologicalState, Role,
};

/// Every numeric agent field that events and rules may change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentField {
    Stress,
    TrustInLeader,
    Influence,
    SpeakingAbility,
    CooperationChance,
    RebellionChance,
    MoralDistress,
    Trauma,
    Anger,
    Hope,
    Fear,
    Happiness,
    Physiological,
    Social,
    Psychological,
}

impl AgentField {
    pub const ALL: [AgentField; 15] = [
        AgentField::Stress,
        AgentField::TrustInLeader,
        AgentField::Influence,
        AgentField::SpeakingAbility,
        AgentField::CooperationChance,
        AgentField::RebellionChance,
        AgentField::MoralDistress,
        AgentField::Trauma,
        AgentField::Anger,
        AgentField::Hope,
        AgentField::Fear,
        AgentField::Happiness,
        AgentField::Physiological,
        AgentField::Social,
        AgentField::Psychological,
    ];

    /// Name used in event impact keys
    pub fn key(&self) -> &'static str {
        match self {
            AgentField::Stress => "stress",
            AgentField::TrustInLeader => "trust_in_leader",
            AgentField::Influence => "influence",
            AgentField::SpeakingAbility => "speaking_ability",
            AgentField::CooperationChance => "cooperation_chance",
            AgentField::RebellionChance => "rebellion_chance",
            AgentField::MoralDistress => "moral_distress",
            AgentField::Trauma => "trauma",
            AgentField::Anger => "anger",
            AgentField::Hope => "hope",
            AgentField::Fear => "fear",
            AgentField::Happiness => "happiness",
            AgentField::Physiological => "physiological",
            AgentField::Social => "social",
            AgentField::Psychological => "psychological",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        AgentField::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Inclusive value domain
    pub fn domain(&self) -> (f32, f32) {
        match self {
            AgentField::Stress | AgentField::TrustInLeader | AgentField::SpeakingAbility => {
                (0.0, 100.0)
            }
            AgentField::Influence => (0.0, f32::INFINITY),
            _ => (0.0, 1.0),
        }
    }

    /// Behavioral dispositions react to events through the psychological state
    pub fn is_disposition(&self) -> bool {
        matches!(self, AgentField::CooperationChance | AgentField::RebellionChance)
    }
}

/// A simulated person
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub role: Role,
    pub ideology: Ideology,
    pub groups: BTreeSet<GroupIdentity>,
    pub hidden_agenda: Option<HiddenAgenda>,
    pub personality: Personality,
    pub needs: NeedSet,
    /// Ids of agents this one has allied with
    pub alliance_ids: BTreeSet<AgentId>,
    pub is_spokesperson: bool,

    emotions: Emotions,
    drives: Drives,
    stress: f32,
    trust_in_leader: f32,
    influence: f32,
    speaking_ability: f32,
    cooperation_chance: f32,
    rebellion_chance: f32,
    moral_distress: f32,
    trauma: f32,
    psychological_state: PsychologicalState,
    memory: MemoryLog,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, role: Role, ideology: Ideology) -> Self {
        Agent {
            id,
            name: name.into(),
            role,
            ideology,
            groups: BTreeSet::new(),
            hidden_agenda: None,
            personality: Personality::default(),
            needs: NeedSet::new(),
            alliance_ids: BTreeSet::new(),
            is_spokesperson: false,
            emotions: Emotions::default(),
            drives: Drives::default(),
            stress: 50.0,
            trust_in_leader: 70.0,
            influence: 50.0,
            speaking_ability: 50.0,
            cooperation_chance: 0.5,
            rebellion_chance: 0.1,
            moral_distress: 0.0,
            trauma: 0.0,
            psychological_state: PsychologicalState::Normal,
            memory: MemoryLog::new(),
        }
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupIdentity>) -> Self {
        self.groups = groups.into_iter().collect();
        self
    }

    pub fn with_needs(mut self, needs: NeedSet) -> Self {
        self.needs = needs;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_agenda(mut self, agenda: HiddenAgenda) -> Self {
        self.hidden_agenda = Some(agenda);
        self
    }

    pub fn with_field(mut self, field: AgentField, value: f32) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_emotions(mut self, emotions: Emotions) -> Self {
        for (field, value) in [
            (AgentField::Anger, emotions.anger),
            (AgentField::Hope, emotions.hope),
            (AgentField::Fear, emotions.fear),
            (AgentField::Happiness, emotions.happiness),
        ] {
            self.set(field, value);
        }
        self
    }

    pub fn get(&self, field: AgentField) -> f32 {
        match field {
            AgentField::Stress => self.stress,
            AgentField::TrustInLeader => self.trust_in_leader,
            AgentField::Influence => self.influence,
            AgentField::SpeakingAbility => self.speaking_ability,
            AgentField::CooperationChance => self.cooperation_chance,
            AgentField::RebellionChance => self.rebellion_chance,
            AgentField::MoralDistress => self.moral_distress,
            AgentField::Trauma => self.trauma,
            AgentField::Anger => self.emotions.anger,
            AgentField::Hope => self.emotions.hope,
            AgentField::Fear => self.emotions.fear,
            AgentField::Happiness => self.emotions.happiness,
            AgentField::Physiological => self.drives.physiological,
            AgentField::Social => self.drives.social,
            AgentField::Psychological => self.drives.psychological,
        }
    }

    /// Set a field, clamped to its domain
    pub fn set(&mut self, field: AgentField, value: f32) {
        let (min, max) = field.domain();
        // NaN collapses to the lower bound
        let value = if value.is_nan() { min } else { value.clamp(min, max) };
        let slot = match field {
            AgentField::Stress => &mut self.stress,
            AgentField::TrustInLeader => &mut self.trust_in_leader,
            AgentField::Influence => &mut self.influence,
            AgentField::SpeakingAbility => &mut self.speaking_ability,
            AgentField::CooperationChance => &mut self.cooperation_chance,
            AgentField::RebellionChance => &mut self.rebellion_chance,
            AgentField::MoralDistress => &mut self.moral_distress,
            AgentField::Trauma => &mut self.trauma,
            AgentField::Anger => &mut self.emotions.anger,
            AgentField::Hope => &mut self.emotions.hope,
            AgentField::Fear => &mut self.emotions.fear,
            AgentField::Happiness => &mut self.emotions.happiness,
            AgentField::Physiological => &mut self.drives.physiological,
            AgentField::Social => &mut self.drives.social,
            AgentField::Psychological => &mut self.drives.psychological,
        };
        *slot = value;
    }

    /// Shift a field by `delta`, clamped to its domain
    pub fn adjust(&mut self, field: AgentField, delta: f32) {
        self.set(field, self.get(field) + delta);
    }

    pub fn stress(&self) -> f32 {
        self.stress
    }

    pub fn trust_in_leader(&self) -> f32 {
        self.trust_in_leader
    }

    pub fn influence(&self) -> f32 {
        self.influence
    }

    pub fn speaking_ability(&self) -> f32 {
        self.speaking_ability
    }

    pub fn emotions(&self) -> Emotions {
        self.emotions
    }

    pub fn drives(&self) -> Drives {
        self.drives
    }

    pub fn psychological_state(&self) -> PsychologicalState {
        self.psychological_state
    }

    pub fn memories(&self) -> &MemoryLog {
        &self.memory
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Captain
    }

    pub fn shares_group_with(&self, other: &Agent) -> bool {
        self.groups.intersection(&other.groups).next().is_some()
    }

    /// Apply named deltas. Names the agent does not have are ignored.
    pub fn update_needs<S: AsRef<str>>(&mut self, deltas: impl IntoIterator<Item = (S, f32)>) {
        for (name, delta) in deltas {
            self.needs.adjust(name.as_ref(), delta);
        }
    }

    pub fn get_critical_needs(&self) -> Vec<String> {
        self.needs.critical()
    }

    /// Mean need value, 50.0 when the agent has no needs
    pub fn calculate_satisfaction(&self) -> f32 {
        self.needs.mean()
    }

    /// Store a memory; emotional weight raises stress by half its impact
    pub fn add_memory(
        &mut self,
        day: Day,
        event_description: impl Into<String>,
        subjective_interpretation: impl Into<String>,
        emotional_impact: f32,
        witnesses: BTreeSet<AgentId>,
        believed_responsible: BTreeSet<AgentId>,
    ) {
        self.memory.push(Memory {
            day,
            event_description: event_description.into(),
            subjective_interpretation: subjective_interpretation.into(),
            emotional_impact,
            witnesses,
            believed_responsible,
        });
        self.adjust(AgentField::Stress, emotional_impact * 0.5);
    }

    pub fn recall<'a>(&'a self, keyword: &str) -> impl Iterator<Item = &'a Memory> + 'a {
        self.memory.recall(keyword)
    }

    /// Derive the psychological state. First matching rule wins.
    pub fn assess_psychological_state(&self) -> PsychologicalState {
        let e = &self.emotions;
        let social = self.drives.social;
        if self.trauma > 0.8 {
            PsychologicalState::Paranoid
        } else if e.anger > 0.7 && social < 0.3 {
            PsychologicalState::Angry
        } else if e.fear > 0.6 && e.hope < 0.3 {
            PsychologicalState::Depressed
        } else if e.happiness > 0.7 && social > 0.7 {
            PsychologicalState::Cooperative
        } else {
            PsychologicalState::Normal
        }
    }

    pub fn update_psychological_state(&mut self) {
        self.psychological_state = self.assess_psychological_state();
    }

    /// Daily drift of drives and emotions under the current danger (0-100)
    pub fn tick_drives(&mut self, danger_level: f32) {
        let danger = (danger_level / 100.0).clamp(0.0, 1.0);

        for drive in [
            AgentField::Physiological,
            AgentField::Social,
            AgentField::Psychological,
        ] {
            self.adjust(drive, -0.01);
        }
        if self.drives.physiological < 0.2 {
            self.adjust(AgentField::Anger, 0.05);
        }

        self.adjust(AgentField::Fear, 0.05 * danger);
        self.adjust(AgentField::Hope, -0.02 * danger);

        self.adjust(AgentField::Trauma, 0.01 * self.moral_distress);
        if self.stress > 90.0 {
            self.adjust(AgentField::Trauma, 0.02);
        }
    }

    /// Emotional effect of an interaction on both parties, each scaled by
    /// their own temperament
    pub fn interact(&mut self, other: &mut Agent, interaction: InteractionType) {
        for agent in [self, other] {
            match interaction {
                InteractionType::Cooperation => {
                    let gain = 0.1 * agent.personality.agreeableness;
                    agent.adjust(AgentField::Happiness, gain);
                    agent.adjust(AgentField::Social, 0.05);
                }
                InteractionType::Conflict => {
                    let gain = 0.2 * agent.personality.neuroticism;
                    agent.adjust(AgentField::Anger, gain);
                }
            }
        }
    }
}

/// Borrow two distinct agents mutably from a slice
pub fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> Option<(&mut Agent, &mut Agent)> {
    if a == b || a >= agents.len() || b >= agents.len() {
        return None;
    }
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = agents.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::agents::needs::Need;

    fn sailor() -> Agent {
        Agent::new(AgentId(3), "Sailor", Role::Worker, Ideology::Reformist)
            .with_groups([GroupIdentity::Workers])
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in AgentField::ALL {
            assert_eq!(AgentField::from_key(field.key()), Some(field));
        }
        assert_eq!(AgentField::from_key("hunger"), None);
    }

    #[test]
    fn test_adjust_clamps_to_domain() {
        let mut agent = sailor();
        agent.adjust(AgentField::Stress, 500.0);
        assert_eq!(agent.stress(), 100.0);
        agent.adjust(AgentField::TrustInLeader, -500.0);
        assert_eq!(agent.trust_in_leader(), 0.0);
        agent.adjust(AgentField::Influence, 1e6);
        assert_eq!(agent.influence(), 1e6 + 50.0);
        agent.adjust(AgentField::Anger, 3.0);
        assert_eq!(agent.emotions().anger, 1.0);
        agent.set(AgentField::Fear, f32::NAN);
        assert_eq!(agent.emotions().fear, 0.0);
    }

    #[test]
    fn test_update_needs_ignores_unknown() {
        let needs = NeedSet::from_needs([Need::new("wage", 40.0)]).unwrap();
        let mut agent = sailor().with_needs(needs);
        agent.update_needs([("wage", -15.0), ("reparations", 30.0)]);
        assert_eq!(agent.needs.get("wage").unwrap().value(), 25.0);
        assert_eq!(agent.get_critical_needs(), vec!["wage".to_string()]);
        assert!(!agent.needs.contains("reparations"));
    }

    #[test]
    fn test_add_memory_raises_stress() {
        let mut agent = sailor().with_field(AgentField::Stress, 60.0);
        agent.add_memory(
            Day(4),
            "A worker was injured on deck",
            "This shows we need gradual improvements.",
            10.0,
            BTreeSet::from([AgentId(1)]),
            BTreeSet::new(),
        );
        assert_eq!(agent.stress(), 65.0);
        assert_eq!(agent.recall("INJURED").count(), 1);

        agent.add_memory(Day(5), "Calm seas", "", 200.0, BTreeSet::new(), BTreeSet::new());
        assert_eq!(agent.stress(), 100.0);
        assert_eq!(agent.memories().len(), 2);
    }

    #[test]
    fn test_psychological_priority() {
        // Trauma beats everything
        let mut agent = sailor()
            .with_field(AgentField::Trauma, 0.9)
            .with_field(AgentField::Anger, 0.9)
            .with_field(AgentField::Social, 0.1);
        agent.update_psychological_state();
        assert_eq!(agent.psychological_state(), PsychologicalState::Paranoid);

        let angry = sailor()
            .with_field(AgentField::Anger, 0.9)
            .with_field(AgentField::Social, 0.1)
            .with_field(AgentField::Fear, 0.9);
        assert_eq!(angry.assess_psychological_state(), PsychologicalState::Angry);

        let depressed = sailor()
            .with_field(AgentField::Fear, 0.7)
            .with_field(AgentField::Hope, 0.1);
        assert_eq!(depressed.assess_psychological_state(), PsychologicalState::Depressed);

        let cooperative = sailor().with_field(AgentField::Happiness, 0.8);
        assert_eq!(cooperative.assess_psychological_state(), PsychologicalState::Cooperative);

        assert_eq!(sailor().assess_psychological_state(), PsychologicalState::Normal);
    }

    #[test]
    fn test_interact_scales_by_own_traits() {
        let mut a = sailor().with_personality(Personality::new(0.5, 0.5, 0.5, 1.0, 0.0));
        let mut b = Agent::new(AgentId(4), "Steward", Role::Worker, Ideology::Anarchist)
            .with_personality(Personality::new(0.5, 0.5, 0.5, 0.0, 1.0));

        a.interact(&mut b, InteractionType::Cooperation);
        assert!((a.emotions().happiness - 0.1).abs() < 1e-6);
        assert_eq!(b.emotions().happiness, 0.0);

        a.interact(&mut b, InteractionType::Conflict);
        assert_eq!(a.emotions().anger, 0.0);
        assert!((b.emotions().anger - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_tick_drives_under_danger() {
        let mut agent = sailor()
            .with_field(AgentField::Physiological, 0.15)
            .with_field(AgentField::Hope, 0.5);
        agent.tick_drives(100.0);
        let drives = agent.drives();
        assert!((drives.physiological - 0.14).abs() < 1e-6);
        assert!((agent.emotions().anger - 0.05).abs() < 1e-6);
        assert!((agent.emotions().fear - 0.05).abs() < 1e-6);
        assert!((agent.emotions().hope - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_pair_mut() {
        let mut agents = vec![sailor(), sailor(), sailor()];
        agents[2].name = "third".to_string();
        let (a, b) = pair_mut(&mut agents, 2, 0).unwrap();
        assert_eq!(a.name, "third");
        b.name = "first".to_string();
        assert_eq!(agents[0].name, "first");
        assert!(pair_mut(&mut agents, 1, 1).is_none());
        assert!(pair_mut(&mut agents, 1, 9).is_none());
    }
}
