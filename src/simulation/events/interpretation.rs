//! How each ideology frames an event

use std::collections::BTreeSet;

use crate::simulation::agents::Agent;
use crate::simulation::types::{AgentId, Ideology};

/// Subjective reading of any misfortune, fixed per ideology
pub fn interpret(ideology: Ideology) -> &'static str {
    match ideology {
        Ideology::Authoritarian => "This disrupts order. Authority must be maintained.",
        Ideology::Revolutionary => "This is systemic oppression. We must resist!",
        Ideology::Liberal => "This violates individual rights. We need reform.",
        Ideology::Conservative => "This shows moral decay. Return to tradition.",
        Ideology::Reformist => "This shows we need gradual improvements.",
        Ideology::Anarchist => "This proves all hierarchy is corrupt.",
    }
}

/// Who `observer` holds responsible for an event.
///
/// Anti-authority outlooks blame the incumbent; authoritarians and
/// conservatives blame the radicals among the witnesses. Nobody blames
/// themselves.
pub fn assign_blame(
    observer: &Agent,
    incumbent: Option<AgentId>,
    witnesses: &BTreeSet<AgentId>,
    agents: &[Agent],
) -> BTreeSet<AgentId> {
    let mut blamed = BTreeSet::new();
    if observer.ideology.blames_leadership() {
        blamed.extend(incumbent);
    } else {
        blamed.extend(
            agents
                .iter()
                .filter(|a| a.ideology.is_radical() && witnesses.contains(&a.id))
                .map(|a| a.id),
        );
    }
    blamed.remove(&observer.id);
    blamed
}
