//! Event system - exogenous perturbations of agent state
//!
//! - `catalog`: validated, data-driven event templates
//! - `engine`: daily trigger and impact application
//! - `interpretation`: ideology-dependent readings and blame

pub mod catalog;
pub mod engine;
pub mod interpretation;

pub use catalog::{EventCatalog, EventCategory, EventTemplate, Impact, ImpactTarget};
pub use engine::{apply_impacts, state_multiplier, Event, EventEngine, EventReport, Perspective};
pub use interpretation::{assign_blame, interpret};
