use bevy_ecs::prelude::*;
use rand::prelude::SliceRandom;

use crate::simulation::{
    Board, BotRng, Engagement, Faction, Factions, GameEventLog, GridGeometry, MatchClock,
    MatchOutcome, RulesConfig, Selection, Territory, commit_engagement, select_cell,
};

/// On every cadence pulse the bot picks one of its cells at random and acts
/// on the first candidate in board order, with the same rules as the player.
#[allow(clippy::too_many_arguments)]
pub fn bot_turn_system(
    clock: Res<MatchClock>,
    outcome: Res<MatchOutcome>,
    rules: Res<RulesConfig>,
    board: Res<Board>,
    geometry: Res<GridGeometry>,
    mut rng: ResMut<BotRng>,
    mut factions: ResMut<Factions>,
    mut selection: ResMut<Selection>,
    mut event_log: ResMut<GameEventLog>,
    mut territories: Query<&mut Territory>,
) {
    if outcome.is_decided() || !clock.cadence_due(rules.cadence_interval) {
        return;
    }

    let members = factions.enemy.members();
    let Some(&actor) = members.choose(&mut rng.0) else {
        return;
    };
    select_cell(
        Faction::Enemy,
        actor,
        &board,
        &geometry,
        &rules,
        &mut selection,
        &mut event_log,
        clock.elapsed,
        &territories,
    );

    let strong_enough = territories
        .get(actor)
        .is_ok_and(|territory| territory.energy > 1);
    if !strong_enough {
        return;
    }

    let candidates = &selection.enemy.targets;
    let Some(target) = board.entities().find(|entity| candidates.contains(entity)) else {
        return;
    };

    let engagement = commit_engagement(
        Faction::Enemy,
        actor,
        target,
        &board,
        &mut factions,
        &mut event_log,
        clock.elapsed,
        &mut territories,
    );
    if engagement == Some(Engagement::Expanded) {
        select_cell(
            Faction::Enemy,
            target,
            &board,
            &geometry,
            &rules,
            &mut selection,
            &mut event_log,
            clock.elapsed,
            &territories,
        );
    }
}
