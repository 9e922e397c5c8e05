//! Seeded crew generation
//!
//! Agent 0 is always the captain. Everyone else draws role, outlook, groups,
//! temperament and needs from the rng, so a seed fully determines the crew.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::simulation::agents::{Agent, AgentField, Need, NeedSet};
use crate::simulation::types::{
    AgentId, GroupIdentity, HiddenAgenda, Ideology, Personality, Role,
};

const FIRST_NAMES: [&str; 24] = [
    "Ada", "Bram", "Cora", "Dov", "Elin", "Fitz", "Greta", "Hugo", "Ines", "Jory", "Kaia",
    "Lorcan", "Mira", "Nils", "Odile", "Pavel", "Quinn", "Rhea", "Soren", "Tamsin", "Ulric",
    "Vesna", "Wim", "Yara",
];

/// Needs an agent may carry besides food and warmth
const NEED_POOL: [&str; 8] = [
    "safety",
    "wage",
    "equality",
    "dignity",
    "respect",
    "morality",
    "autonomy",
    "acceptance",
];

const AGENDAS: [HiddenAgenda; 4] = [
    HiddenAgenda::SeekPower,
    HiddenAgenda::FindLove,
    HiddenAgenda::Survive,
    HiddenAgenda::CreateChaos,
];

/// Chance a crew member hides a secret motivation
const AGENDA_CHANCE: f64 = 0.3;
/// Chance of belonging to a second identity group
const EXTRA_GROUP_CHANCE: f64 = 0.4;

pub const CAPTAIN_INFLUENCE: f32 = 90.0;

fn role_title(role: Role) -> &'static str {
    match role {
        Role::Captain => "Captain",
        Role::Officer => "Officer",
        Role::Worker => "Deckhand",
        Role::Passenger => "Passenger",
        Role::Intellectual => "Professor",
        Role::Deposed => "Former Captain",
    }
}

fn random_role<R: Rng>(rng: &mut R) -> Role {
    match rng.gen_range(0..10) {
        0 => Role::Officer,
        1..=4 => Role::Worker,
        5..=8 => Role::Passenger,
        _ => Role::Intellectual,
    }
}

fn primary_group<R: Rng>(role: Role, rng: &mut R) -> GroupIdentity {
    match role {
        Role::Captain | Role::Officer => GroupIdentity::Authority,
        Role::Worker => GroupIdentity::Workers,
        _ => *[
            GroupIdentity::Women,
            GroupIdentity::Lgbtq,
            GroupIdentity::Religious,
            GroupIdentity::Indigenous,
            GroupIdentity::Merchants,
        ]
        .choose(rng)
        .unwrap_or(&GroupIdentity::Merchants),
    }
}

fn random_personality<R: Rng>(rng: &mut R) -> Personality {
    Personality::new(rng.gen(), rng.gen(), rng.gen(), rng.gen(), rng.gen())
}

fn random_needs<R: Rng>(rng: &mut R) -> NeedSet {
    let mut needs = NeedSet::new();
    needs.insert(Need::new("food", rng.gen_range(50.0..90.0)));
    needs.insert(Need::new("warmth", rng.gen_range(40.0..80.0)));
    for name in NEED_POOL.choose_multiple(rng, 2) {
        needs.insert(Need::new(*name, rng.gen_range(15.0..80.0)));
    }
    needs
}

/// The captain: authoritarian and hungry for respect
pub fn captain<R: Rng>(rng: &mut R) -> Agent {
    let name = format!("Captain {}", FIRST_NAMES.choose(rng).unwrap_or(&"Ahab"));
    let mut needs = NeedSet::new();
    needs.insert(Need::new("food", 80.0));
    needs.insert(Need::new("warmth", 70.0));
    needs.insert(Need::new("power", 90.0));
    needs.insert(Need::new("respect", 80.0));

    Agent::new(AgentId(0), name, Role::Captain, Ideology::Authoritarian)
        .with_groups([GroupIdentity::Authority])
        .with_personality(random_personality(rng))
        .with_needs(needs)
        .with_agenda(HiddenAgenda::SeekPower)
        .with_field(AgentField::Influence, CAPTAIN_INFLUENCE)
        .with_field(AgentField::SpeakingAbility, 70.0)
        .with_field(AgentField::Stress, 30.0)
        .with_field(AgentField::TrustInLeader, 100.0)
}

/// Generate `count` agents with ids `0..count`; agent 0 is the captain
pub fn generate_crew<R: Rng>(count: usize, rng: &mut R) -> Vec<Agent> {
    if count == 0 {
        return Vec::new();
    }
    let mut crew = Vec::with_capacity(count);
    crew.push(captain(rng));

    for id in 1..count {
        let role = random_role(rng);
        let ideology = *Ideology::ALL.choose(rng).unwrap_or(&Ideology::Liberal);
        let first = FIRST_NAMES.choose(rng).unwrap_or(&"Nobody");

        let mut groups = vec![primary_group(role, rng)];
        if rng.gen_bool(EXTRA_GROUP_CHANCE) {
            groups.extend(GroupIdentity::ALL.choose(rng).copied());
        }

        let mut agent = Agent::new(
            AgentId(id as u32),
            format!("{} the {}", first, role_title(role)),
            role,
            ideology,
        )
        .with_groups(groups)
        .with_personality(random_personality(rng))
        .with_needs(random_needs(rng))
        .with_field(AgentField::Stress, rng.gen_range(30.0..60.0))
        .with_field(AgentField::TrustInLeader, rng.gen_range(40.0..90.0))
        .with_field(AgentField::Influence, rng.gen_range(20.0..70.0))
        .with_field(AgentField::SpeakingAbility, rng.gen_range(20.0..80.0));

        if rng.gen_bool(AGENDA_CHANCE) {
            agent.hidden_agenda = AGENDAS.choose(rng).copied();
        }
        crew.push(agent);
    }
    crew
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_crew_is_seeded() {
        let a = generate_crew(12, &mut ChaCha8Rng::seed_from_u64(42));
        let b = generate_crew(12, &mut ChaCha8Rng::seed_from_u64(42));
        let names = |crew: &[Agent]| crew.iter().map(|a| a.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_captain_first() {
        let crew = generate_crew(8, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(crew[0].role, Role::Captain);
        assert_eq!(crew[0].influence(), CAPTAIN_INFLUENCE);
        assert!(crew[1..].iter().all(|a| a.role != Role::Captain));
        for (i, agent) in crew.iter().enumerate() {
            assert_eq!(agent.id, AgentId(i as u32));
            assert!(!agent.groups.is_empty());
            assert!(agent.needs.contains("food"));
        }
        assert!(generate_crew(0, &mut ChaCha8Rng::seed_from_u64(7)).is_empty());
    }
}
