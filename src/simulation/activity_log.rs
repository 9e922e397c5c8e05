//! Activity Log System
//!
//! The simulation reports what happens through an explicit observer passed
//! into each tick. `ActivityLog` keeps a bounded history of structured
//! entries; `TracingObserver` forwards entries to `tracing`.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::simulation::types::{AgentId, Day};

/// Maximum number of entries to keep in the activity log
pub const MAX_ACTIVITY_ENTRIES: usize = 200;

/// Category of activity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityCategory {
    /// Heading, danger, sinking
    Environment,
    /// Triggered events and their interpretation
    Event,
    /// Relationship changes
    Social,
    /// Alliance formation and breakage
    Alliance,
    /// Succession, spokespersons, mutiny
    Leadership,
    /// Protests and philosophical discussions
    Discourse,
    /// Setup and bookkeeping
    System,
}

impl ActivityCategory {
    /// Get short label for display
    pub fn label(&self) -> &'static str {
        match self {
            ActivityCategory::Environment => "ENV",
            ActivityCategory::Event => "EVT",
            ActivityCategory::Social => "SOC",
            ActivityCategory::Alliance => "ALL",
            ActivityCategory::Leadership => "LDR",
            ActivityCategory::Discourse => "DSC",
            ActivityCategory::System => "SYS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityLevel {
    Info,
    Warning,
}

/// An activity log entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub day: Day,
    pub category: ActivityCategory,
    pub level: ActivityLevel,
    /// Agent involved (if any)
    pub agent: Option<AgentId>,
    pub message: String,
}

/// Receives structured reports from the simulation
pub trait SimulationObserver {
    fn record(&mut self, entry: ActivityEntry);

    fn info(
        &mut self,
        day: Day,
        category: ActivityCategory,
        agent: Option<AgentId>,
        message: String,
    ) {
        self.record(ActivityEntry {
            day,
            category,
            level: ActivityLevel::Info,
            agent,
            message,
        });
    }

    fn warn(
        &mut self,
        day: Day,
        category: ActivityCategory,
        agent: Option<AgentId>,
        message: String,
    ) {
        self.record(ActivityEntry {
            day,
            category,
            level: ActivityLevel::Warning,
            agent,
            message,
        });
    }
}

/// Statistics about activities
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_entries: u64,
    pub warnings: u64,
    pub events: u64,
    pub leadership_changes: u64,
}

/// The activity log store
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    /// Counters for stats
    pub stats: ActivityStats,
}

impl ActivityLog {
    pub fn new() -> Self {
        ActivityLog {
            entries: VecDeque::with_capacity(MAX_ACTIVITY_ENTRIES),
            stats: ActivityStats::default(),
        }
    }

    /// Get recent entries (newest first)
    pub fn recent_entries(&self, count: usize) -> Vec<&ActivityEntry> {
        self.entries.iter().rev().take(count).collect()
    }

    /// Entries involving one agent (newest first)
    pub fn entries_for(&self, agent: AgentId, count: usize) -> Vec<&ActivityEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.agent == Some(agent))
            .take(count)
            .collect()
    }

    pub fn entries_in(&self, category: ActivityCategory) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().filter(|e| e.level == ActivityLevel::Warning)
    }

    /// Clear old entries (keep only recent days)
    pub fn clear_old(&mut self, current: Day, keep_days: u32) {
        self.entries
            .retain(|e| current.0.saturating_sub(e.day.0) < keep_days);
    }

    /// Get total entry count
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SimulationObserver for ActivityLog {
    fn record(&mut self, entry: ActivityEntry) {
        // Update stats
        self.stats.total_entries += 1;
        if entry.level == ActivityLevel::Warning {
            self.stats.warnings += 1;
        }
        match entry.category {
            ActivityCategory::Event => self.stats.events += 1,
            ActivityCategory::Leadership => self.stats.leadership_changes += 1,
            _ => {}
        }

        self.entries.push_back(entry);

        // Trim if over limit
        while self.entries.len() > MAX_ACTIVITY_ENTRIES {
            self.entries.pop_front();
        }
    }
}

/// Forwards every entry to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl SimulationObserver for TracingObserver {
    fn record(&mut self, entry: ActivityEntry) {
        let agent = entry.agent.map(|a| a.0);
        match entry.level {
            ActivityLevel::Info => tracing::info!(
                day = entry.day.0,
                category = entry.category.label(),
                agent,
                "{}",
                entry.message
            ),
            ActivityLevel::Warning => tracing::warn!(
                day = entry.day.0,
                category = entry.category.label(),
                agent,
                "{}",
                entry.message
            ),
        }
    }
}

/// Sends every entry to two observers
pub struct Tee<'a, A: SimulationObserver + ?Sized, B: SimulationObserver + ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A: SimulationObserver + ?Sized, B: SimulationObserver + ?Sized> SimulationObserver
    for Tee<'_, A, B>
{
    fn record(&mut self, entry: ActivityEntry) {
        self.first.record(entry.clone());
        self.second.record(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = ActivityLog::new();
        for day in 0..(MAX_ACTIVITY_ENTRIES as u32 + 10) {
            log.info(Day(day), ActivityCategory::Environment, None, format!("day {day}"));
        }
        assert_eq!(log.len(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(log.stats.total_entries, MAX_ACTIVITY_ENTRIES as u64 + 10);
        assert_eq!(log.recent_entries(1)[0].day, Day(MAX_ACTIVITY_ENTRIES as u32 + 9));
    }

    #[test]
    fn test_stats_and_filters() {
        let mut log = ActivityLog::new();
        log.warn(Day(1), ActivityCategory::System, Some(AgentId(3)), "duplicate".into());
        log.info(Day(1), ActivityCategory::Event, None, "theft".into());
        log.info(Day(2), ActivityCategory::Leadership, Some(AgentId(3)), "deposed".into());

        assert_eq!(log.stats.warnings, 1);
        assert_eq!(log.stats.events, 1);
        assert_eq!(log.warnings().count(), 1);
        assert_eq!(log.entries_for(AgentId(3), 10).len(), 2);
        assert_eq!(log.entries_in(ActivityCategory::Event).count(), 1);

        log.clear_old(Day(2), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_tee_records_both() {
        let mut a = ActivityLog::new();
        let mut b = ActivityLog::new();
        let mut tee = Tee { first: &mut a, second: &mut b };
        tee.info(Day(0), ActivityCategory::System, None, "start".into());
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }
}
