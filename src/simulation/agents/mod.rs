//! Agent system - individual people aboard the ship
//!
//! - `needs`: named bounded gauges with critical thresholds
//! - `memory`: subjective, append-only memories of events
//! - `agent`: the agent itself, its emotions, drives and stress
//! - `decision`: daily action selection

pub mod needs;
pub mod memory;
pub mod agent;
pub mod decision;

pub use needs::{Need, NeedSet, DEFAULT_CRITICAL_THRESHOLD};
pub use memory::{Memory, MemoryLog};
pub use agent::{Agent, AgentField, pair_mut};
pub use decision::{ActionScores, DecisionContext, decide_action, score_actions};
