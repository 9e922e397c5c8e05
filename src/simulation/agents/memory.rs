//! Subjective memories of witnessed events

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::simulation::types::{AgentId, Day};

/// A remembered event as one agent perceived it. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub day: Day,
    pub event_description: String,
    /// How this agent's ideology framed the event
    pub subjective_interpretation: String,
    pub emotional_impact: f32,
    pub witnesses: BTreeSet<AgentId>,
    pub believed_responsible: BTreeSet<AgentId>,
}

impl Memory {
    /// Case-insensitive keyword match on the event text
    pub fn mentions(&self, keyword_lower: &str) -> bool {
        self.event_description.to_lowercase().contains(keyword_lower)
    }
}

/// Append-only memory log, oldest first
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryLog {
    memories: Vec<Memory>,
}

impl MemoryLog {
    pub fn new() -> Self {
        MemoryLog {
            memories: Vec::new(),
        }
    }

    pub fn push(&mut self, memory: Memory) {
        debug_assert!(
            self.memories.last().map_or(true, |m| m.day <= memory.day),
            "memories must be appended chronologically"
        );
        self.memories.push(memory);
    }

    /// Lazily filter memories whose event text contains `keyword`
    pub fn recall<'a>(&'a self, keyword: &str) -> impl Iterator<Item = &'a Memory> + 'a {
        let needle = keyword.to_lowercase();
        self.memories.iter().filter(move |m| m.mentions(&needle))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Memory> {
        self.memories.iter()
    }

    pub fn last(&self) -> Option<&Memory> {
        self.memories.last()
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(day: u32, text: &str) -> Memory {
        Memory {
            day: Day(day),
            event_description: text.to_string(),
            subjective_interpretation: String::new(),
            emotional_impact: 1.0,
            witnesses: BTreeSet::new(),
            believed_responsible: BTreeSet::new(),
        }
    }

    #[test]
    fn test_recall_case_insensitive() {
        let mut log = MemoryLog::new();
        log.push(memory(1, "Someone stole FOOD from the kitchen"));
        log.push(memory(2, "A fight broke out"));
        log.push(memory(3, "Food supplies are running out"));

        let days: Vec<u32> = log.recall("food").map(|m| m.day.0).collect();
        assert_eq!(days, vec![1, 3]);
        assert_eq!(log.recall("iceberg").count(), 0);
    }

    #[test]
    fn test_recall_is_restartable() {
        let mut log = MemoryLog::new();
        log.push(memory(1, "The dog was kicked"));
        assert_eq!(log.recall("DOG").count(), 1);
        assert_eq!(log.recall("dog").count(), 1);
        assert_eq!(log.len(), 1);
    }
}
