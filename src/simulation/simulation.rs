//! Main simulation state and tick loop
//!
//! `Simulation` owns every agent, the relationship graph, the alliance
//! registry, the event engine, leadership and the ship, plus the seeded rng
//! all randomness flows through. One call to `simulate_one_day` advances
//! everything by one day and returns a structured `TickOutcome`.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::activity_log::{ActivityCategory, SimulationObserver};
use crate::simulation::agents::{pair_mut, Agent, AgentField, DecisionContext};
use crate::simulation::crew::generate_crew;
use crate::simulation::discourse::{self, DiscussionReport, ProtestReport};
use crate::simulation::error::{SimError, SimResult};
use crate::simulation::events::{Event, EventCatalog, EventEngine, EventReport};
use crate::simulation::leadership::{LeadershipController, MutinyOutcome, SuccessionOutcome};
use crate::simulation::params::SimulationParams;
use crate::simulation::ship::ShipState;
use crate::simulation::social::{
    Alliance, AllianceRegistry, Formation, InteractionDeltas, InteractionResult, RelationshipGraph,
};
use crate::simulation::types::{
    Action, AgentId, AllianceId, Day, Ideology, InteractionType, PsychologicalState,
    RelationshipType, Role,
};

const ALLIANCE_PURPOSES: [&str; 3] = ["Shared ideology", "Shared identity", "Shared grievances"];

/// How a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// The ship reached port
    Survived,
    /// Mutineers took the helm and turned south
    Mutiny,
    /// The ship hit the ice
    Sunk,
}

/// Statistics tracked during simulation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    pub days_simulated: u32,
    pub events_triggered: u32,
    pub interactions: u32,
    pub alliances_formed: u32,
    pub alliances_broken: u32,
    pub protests: u32,
    pub discussions: u32,
    pub successions: u32,
    pub failed_challenges: u32,
    pub mutinies_attempted: u32,
}

/// What one agent did today
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentAction {
    pub agent: AgentId,
    pub action: Action,
    pub partner: Option<AgentId>,
    pub interaction: Option<InteractionType>,
}

/// Per-agent status for the presentation layer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub name: String,
    pub role: Role,
    pub ideology: Ideology,
    pub psychological_state: PsychologicalState,
    pub stress: f32,
    pub trust_in_leader: f32,
    pub influence: f32,
    pub satisfaction: f32,
    pub critical_needs: Vec<String>,
    pub is_spokesperson: bool,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        AgentSnapshot {
            id: agent.id,
            name: agent.name.clone(),
            role: agent.role,
            ideology: agent.ideology,
            psychological_state: agent.psychological_state(),
            stress: agent.stress(),
            trust_in_leader: agent.trust_in_leader(),
            influence: agent.influence(),
            satisfaction: agent.calculate_satisfaction(),
            critical_needs: agent.get_critical_needs(),
            is_spokesperson: agent.is_spokesperson,
        }
    }
}

/// Structured summary of one simulated day
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickOutcome {
    pub day: Day,
    pub ship: ShipState,
    pub event: Option<Event>,
    pub event_report: Option<EventReport>,
    pub actions: Vec<AgentAction>,
    pub edges_decayed: usize,
    /// Mean strength over all ties after decay
    pub mean_tie_strength: f32,
    pub alliances_formed: Vec<AllianceId>,
    pub alliances_broken: Vec<AllianceId>,
    pub protest: Option<ProtestReport>,
    pub discussion: Option<DiscussionReport>,
    pub succession: SuccessionOutcome,
    pub mutiny: Option<MutinyOutcome>,
    pub incumbent: Option<AgentId>,
    pub authority: f32,
    pub agents: Vec<AgentSnapshot>,
    pub alliances: Vec<Alliance>,
    pub terminal: Option<TerminalState>,
}

/// Main simulation state
#[derive(Clone, Debug)]
pub struct Simulation {
    day: Day,
    agents: Vec<Agent>,
    pub graph: RelationshipGraph,
    pub alliances: AllianceRegistry,
    events: EventEngine,
    pub leadership: LeadershipController,
    pub ship: ShipState,
    pub stats: SimulationStats,
    params: SimulationParams,
    seed: u64,
    rng: ChaCha8Rng,
    terminal: Option<TerminalState>,
}

impl Simulation {
    /// Create an empty ship. Parameters are validated here.
    pub fn new(params: SimulationParams, catalog: EventCatalog, seed: u64) -> SimResult<Self> {
        params.validate()?;
        Ok(Simulation {
            day: Day(0),
            agents: Vec::new(),
            graph: RelationshipGraph::with_deltas(InteractionDeltas::from_params(&params)),
            alliances: AllianceRegistry::new(),
            events: EventEngine::new(catalog),
            leadership: LeadershipController::new(None, params.initial_authority),
            ship: ShipState::from_params(&params),
            stats: SimulationStats::default(),
            params,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            terminal: None,
        })
    }

    /// Create a ship with a randomly generated crew of `crew_size`,
    /// neutral ties between agents who share a group
    pub fn with_generated_crew(
        crew_size: usize,
        params: SimulationParams,
        catalog: EventCatalog,
        seed: u64,
        observer: &mut dyn SimulationObserver,
    ) -> SimResult<Self> {
        let mut sim = Self::new(params, catalog, seed)?;
        let crew = generate_crew(crew_size, &mut sim.rng);
        for agent in crew {
            sim.add_agent(agent, observer);
        }
        let seeded = sim.seed_relationships()?;
        observer.info(
            sim.day,
            ActivityCategory::System,
            None,
            format!("{} aboard, {} initial ties", sim.agents.len(), seeded),
        );
        Ok(sim)
    }

    /// Bring an agent aboard. A duplicate id is reported and ignored.
    /// The first captain to board takes the helm.
    pub fn add_agent(&mut self, agent: Agent, observer: &mut dyn SimulationObserver) -> bool {
        if !self.graph.add_agent(agent.id) {
            observer.warn(
                self.day,
                ActivityCategory::System,
                Some(agent.id),
                format!("{} is already aboard", agent.id),
            );
            return false;
        }
        if agent.role == Role::Captain && self.leadership.incumbent().is_none() {
            self.leadership.install(agent.id, self.params.initial_authority);
        }
        self.agents.push(agent);
        true
    }

    /// Neutral edges between every pair sharing a group and not yet tied.
    /// Returns the number of edges created.
    pub fn seed_relationships(&mut self) -> SimResult<usize> {
        let mut created = 0;
        for i in 0..self.agents.len() {
            for j in (i + 1)..self.agents.len() {
                let (a, b) = (&self.agents[i], &self.agents[j]);
                if a.shares_group_with(b) && self.graph.relationship(a.id, b.id).is_none() {
                    self.graph.set_relationship(
                        a.id,
                        b.id,
                        self.params.initial_edge_strength,
                        RelationshipType::Neutral,
                    )?;
                    created += 1;
                }
            }
        }
        Ok(created)
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> SimResult<&Agent> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .ok_or(SimError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> SimResult<&mut Agent> {
        self.agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(SimError::AgentNotFound(id))
    }

    pub fn event_history(&self) -> &[Event] {
        self.events.history()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn terminal_state(&self) -> Option<TerminalState> {
        self.terminal
    }

    /// Advance one day:
    /// environment -> event -> actions and alliances -> discourse ->
    /// leadership -> terminal check
    pub fn simulate_one_day(
        &mut self,
        observer: &mut dyn SimulationObserver,
    ) -> SimResult<TickOutcome> {
        if let Some(state) = self.terminal {
            return Err(SimError::Terminated(state));
        }
        self.day = self.day.next();

        // 1. Environment
        let edges_decayed = self.process_environment(observer);

        // 2. Event
        let (event, event_report) = self.process_event(observer);

        // 3. Actions, relationships and alliances
        let actions = self.process_actions()?;
        let (alliances_formed, alliances_broken) = self.process_alliances(observer)?;

        // 4. Discourse
        let protest = discourse::organize_protest(
            &mut self.agents,
            &mut self.leadership,
            &self.params,
            &mut self.rng,
        );
        if let Some(report) = &protest {
            self.stats.protests += 1;
            observer.info(
                self.day,
                ActivityCategory::Discourse,
                None,
                format!(
                    "{} protest; {} of {} demands conceded",
                    report.protesters.len(),
                    report.concessions.len(),
                    report.demands.len()
                ),
            );
        }
        let discussion =
            discourse::hold_discussion(&mut self.agents, &mut self.ship, &self.params, &mut self.rng);
        if let Some(report) = &discussion {
            self.stats.discussions += 1;
            observer.info(
                self.day,
                ActivityCategory::Discourse,
                None,
                format!("discussion: {}", report.question),
            );
        }

        // 5. Leadership
        let (succession, mutiny) = self.process_leadership(observer)?;

        // 6. Terminal conditions
        self.check_terminal(observer);

        self.stats.days_simulated += 1;
        Ok(TickOutcome {
            day: self.day,
            ship: self.ship.clone(),
            event,
            event_report,
            actions,
            edges_decayed,
            mean_tie_strength: self.graph.mean_strength(),
            alliances_formed,
            alliances_broken,
            protest,
            discussion,
            succession,
            mutiny,
            incumbent: self.leadership.incumbent(),
            authority: self.leadership.authority(),
            agents: self.agents.iter().map(AgentSnapshot::from).collect(),
            alliances: self.alliances.active().cloned().collect(),
            terminal: self.terminal,
        })
    }

    fn process_environment(&mut self, observer: &mut dyn SimulationObserver) -> usize {
        self.ship.advance(&self.params);
        for agent in &mut self.agents {
            self.ship.apply_environment(agent);
            agent.tick_drives(self.ship.danger_level);
            agent.update_psychological_state();
        }

        let removed = self.graph.decay(self.params.relationship_decay);
        for (a, b) in &removed {
            observer.info(
                self.day,
                ActivityCategory::Social,
                Some(*a),
                format!("tie between {} and {} faded", a, b),
            );
        }
        if self.ship.danger_level > self.params.sink_danger_threshold {
            observer.warn(
                self.day,
                ActivityCategory::Environment,
                None,
                format!("danger {:.0}: ice ahead", self.ship.danger_level),
            );
        }
        removed.len()
    }

    fn process_event(
        &mut self,
        observer: &mut dyn SimulationObserver,
    ) -> (Option<Event>, Option<EventReport>) {
        let Some(event) =
            self.events
                .trigger(self.day, self.ship.temperature, &self.params, &mut self.rng)
        else {
            return (None, None);
        };

        let report = self.events.apply(
            &event,
            &mut self.agents,
            self.leadership.incumbent(),
            &self.params,
            &mut self.rng,
        );
        self.ship.add_tension(event.tension * event.severity);
        self.stats.events_triggered += 1;
        observer.info(
            self.day,
            ActivityCategory::Event,
            None,
            format!(
                "{} (severity {:.2}) touched {} agents",
                event.name,
                event.severity,
                report.affected_count()
            ),
        );
        (Some(event), Some(report))
    }

    /// Random other agent, uniformly
    fn random_partner(&mut self, index: usize) -> Option<usize> {
        let count = self.agents.len();
        if count < 2 {
            return None;
        }
        let partner = self.rng.gen_range(0..count - 1);
        Some(if partner >= index { partner + 1 } else { partner })
    }

    fn interact(
        &mut self,
        a: usize,
        b: usize,
        interaction: InteractionType,
    ) -> SimResult<InteractionResult> {
        let (first, second) = match pair_mut(&mut self.agents, a, b) {
            Some((first, second)) => {
                first.interact(second, interaction);
                (first.id, second.id)
            }
            None => {
                let missing = if a == b { a } else { a.max(b) };
                return Err(match self.agents.get(missing) {
                    Some(agent) => SimError::SelfRelationship(agent.id),
                    None => SimError::AgentNotFound(AgentId(missing as u32)),
                });
            }
        };
        self.stats.interactions += 1;
        self.graph.apply_interaction(first, second, interaction)
    }

    fn process_actions(&mut self) -> SimResult<Vec<AgentAction>> {
        let context = DecisionContext {
            danger_level: self.ship.danger_level,
        };
        let mut actions = Vec::with_capacity(self.agents.len());

        for index in 0..self.agents.len() {
            let action = self.agents[index].decide_action(&context);
            let mut partner = None;
            let mut interaction = None;

            match action {
                Action::Cooperate => {
                    self.agents[index].adjust(AgentField::TrustInLeader, 1.0);
                    if let Some(other) = self.random_partner(index) {
                        // Across ideologies, tension can sour cooperation
                        let differ = self.agents[index].ideology != self.agents[other].ideology;
                        let kind = if differ && self.rng.gen::<f32>() < self.ship.tension / 100.0 {
                            InteractionType::Conflict
                        } else {
                            InteractionType::Cooperation
                        };
                        self.interact(index, other, kind)?;
                        partner = Some(self.agents[other].id);
                        interaction = Some(kind);
                    }
                }
                Action::Rebel => {
                    self.agents[index].adjust(AgentField::TrustInLeader, -2.0);
                    if let Some(other) = self.random_partner(index) {
                        let kind = if self.agents[index].ideology == self.agents[other].ideology {
                            InteractionType::Cooperation
                        } else {
                            InteractionType::Conflict
                        };
                        self.interact(index, other, kind)?;
                        partner = Some(self.agents[other].id);
                        interaction = Some(kind);
                    }
                }
                Action::TakeRisk => {
                    let agent = &mut self.agents[index];
                    agent.adjust(AgentField::Influence, 1.0);
                    agent.adjust(AgentField::Stress, 2.0);
                }
                Action::SeekResources => {
                    let agent = &mut self.agents[index];
                    if let Some(name) = agent.needs.lowest().map(|n| n.name.clone()) {
                        agent.needs.adjust(&name, 5.0);
                    }
                    agent.adjust(AgentField::Physiological, 0.1);
                    agent.adjust(AgentField::Stress, -1.0);
                }
            }

            actions.push(AgentAction {
                agent: self.agents[index].id,
                action,
                partner,
                interaction,
            });
        }
        Ok(actions)
    }

    fn process_alliances(
        &mut self,
        observer: &mut dyn SimulationObserver,
    ) -> SimResult<(Vec<AllianceId>, Vec<AllianceId>)> {
        let mut formed = Vec::new();

        for index in 0..self.agents.len() {
            if self.rng.gen::<f32>() >= self.params.alliance_chance {
                continue;
            }
            let agent = &self.agents[index];
            let candidates: Vec<usize> = self
                .agents
                .iter()
                .enumerate()
                .filter(|(_, other)| other.id != agent.id && !agent.alliance_ids.contains(&other.id))
                .filter(|(_, other)| other.ideology == agent.ideology || agent.shares_group_with(other))
                .map(|(i, _)| i)
                .collect();
            let Some(&ally) = candidates.choose(&mut self.rng) else {
                continue;
            };
            let purpose = ALLIANCE_PURPOSES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(ALLIANCE_PURPOSES[0]);

            let (a, b) = (self.agents[index].id, self.agents[ally].id);
            let Some(formation) = self.alliances.form(a, b, purpose, self.day) else {
                continue;
            };
            self.agents[index].alliance_ids.insert(b);
            self.agents[ally].alliance_ids.insert(a);
            if !self.graph.retype(a, b, RelationshipType::Alliance) {
                self.graph.set_relationship(
                    a,
                    b,
                    self.params.initial_edge_strength,
                    RelationshipType::Alliance,
                )?;
            }

            if let Formation::Created(id) = formation {
                self.stats.alliances_formed += 1;
                formed.push(id);
            }
            observer.info(
                self.day,
                ActivityCategory::Alliance,
                Some(a),
                format!("{} and {} allied in {}", a, b, formation.alliance()),
            );
        }

        let broken = self.alliances.tick(&mut self.rng, &self.params);
        for id in &broken {
            self.stats.alliances_broken += 1;
            observer.info(self.day, ActivityCategory::Alliance, None, format!("{} broke apart", id));
        }
        Ok((formed, broken))
    }

    fn process_leadership(
        &mut self,
        observer: &mut dyn SimulationObserver,
    ) -> SimResult<(SuccessionOutcome, Option<MutinyOutcome>)> {
        self.leadership.update_spokespersons(&mut self.agents);
        self.leadership.drift_authority(&self.agents, &self.params);

        if let Some(id) = self.leadership.fill_vacancy(&mut self.agents, &self.graph, &self.params) {
            observer.info(self.day, ActivityCategory::Leadership, Some(id), format!("{} takes the empty helm", id));
        }

        let succession = self.leadership.check_succession(&mut self.agents, &self.params)?;
        match &succession {
            SuccessionOutcome::Succeeded { deposed, successor, .. } => {
                self.stats.successions += 1;
                observer.warn(
                    self.day,
                    ActivityCategory::Leadership,
                    Some(*successor),
                    format!("{} deposed {}", successor, deposed),
                );
            }
            SuccessionOutcome::Failed { challengers, .. } => {
                self.stats.failed_challenges += 1;
                observer.info(
                    self.day,
                    ActivityCategory::Leadership,
                    None,
                    format!("{} challengers failed to unseat the captain", challengers.len()),
                );
            }
            SuccessionOutcome::Stable | SuccessionOutcome::NoChallengers => {}
        }

        let mutiny =
            self.leadership
                .check_mutiny(&mut self.agents, self.ship.danger_level, &self.params);
        match &mutiny {
            Some(MutinyOutcome::Succeeded { leader, .. }) => {
                self.stats.mutinies_attempted += 1;
                self.ship.turn_south();
                self.terminal = Some(TerminalState::Mutiny);
                observer.warn(
                    self.day,
                    ActivityCategory::Leadership,
                    Some(*leader),
                    format!("mutiny succeeds; {} turns the ship south", leader),
                );
            }
            Some(MutinyOutcome::Failed { support, needed, .. }) => {
                self.stats.mutinies_attempted += 1;
                observer.warn(
                    self.day,
                    ActivityCategory::Leadership,
                    None,
                    format!("mutiny fails with {} of {} needed supporters", support, needed),
                );
            }
            None => {}
        }

        Ok((succession, mutiny))
    }

    fn check_terminal(&mut self, observer: &mut dyn SimulationObserver) {
        if self.terminal.is_some() {
            return;
        }
        if self.ship.check_sinking(&self.params, &mut self.rng) {
            self.terminal = Some(TerminalState::Sunk);
            observer.warn(self.day, ActivityCategory::Environment, None, "the ship hits the ice and sinks".to_string());
        } else if self.day.0 >= self.params.voyage_length {
            self.terminal = Some(TerminalState::Survived);
            observer.info(self.day, ActivityCategory::Environment, None, "the ship reaches port".to_string());
        }
    }
}
