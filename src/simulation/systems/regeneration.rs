use bevy_ecs::prelude::*;

use crate::simulation::{
    Faction, Factions, GameEventKind, GameEventLog, MatchClock, MatchOutcome, RulesConfig,
    Territory, regenerate,
};

fn regeneration_pulse(
    faction: Faction,
    clock: &MatchClock,
    outcome: MatchOutcome,
    rules: &RulesConfig,
    factions: &Factions,
    event_log: &mut GameEventLog,
    territories: &mut Query<&mut Territory>,
) {
    if outcome.is_decided() || !clock.cadence_due(rules.cadence_interval) {
        return;
    }
    let cells = regenerate(faction, factions, rules.max_energy, territories);
    event_log.push(clock.elapsed, GameEventKind::Regenerated { faction, cells });
}

pub fn player_regeneration_system(
    clock: Res<MatchClock>,
    outcome: Res<MatchOutcome>,
    rules: Res<RulesConfig>,
    factions: Res<Factions>,
    mut event_log: ResMut<GameEventLog>,
    mut territories: Query<&mut Territory>,
) {
    regeneration_pulse(
        Faction::Player,
        &clock,
        *outcome,
        &rules,
        &factions,
        &mut event_log,
        &mut territories,
    );
}

/// Runs after the bot has acted, so a freshly grown bot cell already gains.
pub fn enemy_regeneration_system(
    clock: Res<MatchClock>,
    outcome: Res<MatchOutcome>,
    rules: Res<RulesConfig>,
    factions: Res<Factions>,
    mut event_log: ResMut<GameEventLog>,
    mut territories: Query<&mut Territory>,
) {
    regeneration_pulse(
        Faction::Enemy,
        &clock,
        *outcome,
        &rules,
        &factions,
        &mut event_log,
        &mut territories,
    );
}
