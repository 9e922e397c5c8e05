//! Social structure between agents
//!
//! - `relationships`: pairwise weighted edges
//! - `alliances`: multi-member alliances

pub mod relationships;
pub mod alliances;

pub use relationships::{InteractionDeltas, InteractionResult, Relationship, RelationshipGraph};
pub use alliances::{Alliance, AllianceRegistry, Formation};
