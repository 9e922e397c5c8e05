//! Ship of Fools Simulation System
//!
//! An agent-based simulation of a crew on a ship drifting towards the ice.
//! Agents carry needs, memories and ideologies; their relationships and
//! alliances shift with every interaction, and leadership can be challenged
//! through succession or taken by mutiny.
//!
//! # Module Structure
//!
//! - `types`: Core type definitions (AgentId, Day, Ideology, etc.)
//! - `error`: Simulation and configuration errors
//! - `params`: Simulation configuration parameters
//! - `agents`: Needs, memories, agents and daily decisions
//! - `social`: Relationship graph and alliances
//! - `events`: Event catalog, trigger and subjective interpretation
//! - `leadership`: Spokespersons, succession and mutiny
//! - `ship`: Heading, danger, temperature and tension
//! - `discourse`: Protests and philosophical discussions
//! - `crew`: Seeded crew generation
//! - `activity_log`: Observer interface and bounded activity log
//! - `simulation`: Main simulation state and tick loop
//!
//! # Usage
//!
//! ```ignore
//! use ship_of_fools::simulation::{EventCatalog, Simulation, SimulationParams, TracingObserver};
//!
//! let mut observer = TracingObserver;
//! let mut sim = Simulation::with_generated_crew(
//!     12, SimulationParams::default(), EventCatalog::defaults()?, 42, &mut observer,
//! )?;
//! while !sim.is_terminal() {
//!     let outcome = sim.simulate_one_day(&mut observer)?;
//! }
//! ```

pub mod types;
pub mod error;
pub mod params;
pub mod agents;
pub mod social;
pub mod events;
pub mod leadership;
pub mod ship;
pub mod discourse;
pub mod crew;
pub mod activity_log;
pub mod simulation;

// Re-export main types for convenience
pub use types::{
    Action, AgentId, AllianceId, Day, EventId, GroupIdentity, HiddenAgenda, Ideology,
    InteractionType, Personality, PsychologicalState, RelationshipType, Role,
};
pub use error::{ConfigError, SimError, SimResult};
pub use params::SimulationParams;
pub use agents::{Agent, AgentField, Memory, Need, NeedSet};
pub use social::{Alliance, AllianceRegistry, Relationship, RelationshipGraph};
pub use events::{Event, EventCatalog, EventEngine, EventReport, EventTemplate};
pub use leadership::{LeadershipController, MutinyOutcome, SuccessionOutcome};
pub use ship::ShipState;
pub use discourse::{DiscussionReport, ProtestReport};
pub use crew::generate_crew;
pub use activity_log::{
    ActivityCategory, ActivityEntry, ActivityLevel, ActivityLog, ActivityStats,
    SimulationObserver, Tee, TracingObserver,
};
pub use simulation::{
    AgentAction, AgentSnapshot, Simulation, SimulationStats, TerminalState, TickOutcome,
};
