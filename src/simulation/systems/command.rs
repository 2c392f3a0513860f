use bevy_ecs::prelude::*;
use tracing::debug;

use crate::simulation::{
    Board, Camera, Engagement, Faction, Factions, GameEventKind, GameEventLog, GridGeometry,
    MatchClock, MatchOutcome, Owner, RulesConfig, Selection, Territory, TickInput,
    commit_engagement, growth_targets,
};

/// Turns primary-button presses on the board into selections and moves.
#[allow(clippy::too_many_arguments)]
pub fn player_command_system(
    input: Res<TickInput>,
    clock: Res<MatchClock>,
    outcome: Res<MatchOutcome>,
    board: Res<Board>,
    geometry: Res<GridGeometry>,
    rules: Res<RulesConfig>,
    camera: Res<Camera>,
    mut factions: ResMut<Factions>,
    mut selection: ResMut<Selection>,
    mut event_log: ResMut<GameEventLog>,
    mut territories: Query<&mut Territory>,
) {
    drop_stale_selection(&mut selection, &factions);

    if outcome.is_decided() || !clock.armed {
        return;
    }

    for _ in 0..input.primary_presses() {
        let Some(target) = board.cell_at_point(input.pointer, camera.offset, &geometry) else {
            continue;
        };
        let Ok(touched) = territories.get(target).map(|territory| *territory) else {
            continue;
        };

        let is_origin = factions.player.origin == target;
        if touched.owner == Owner::Player && (is_origin || touched.energy > 1) {
            select_cell(
                Faction::Player,
                target,
                &board,
                &geometry,
                &rules,
                &mut selection,
                &mut event_log,
                clock.elapsed,
                &territories,
            );
            continue;
        }

        let Some(actor) = selection.player.cell else {
            continue;
        };
        if !selection.player.targets.contains(&target) {
            debug!("Ignoring click on {:?}: not a growth target", target);
            continue;
        }

        let engagement = commit_engagement(
            Faction::Player,
            actor,
            target,
            &board,
            &mut factions,
            &mut event_log,
            clock.elapsed,
            &mut territories,
        );

        match engagement {
            Some(Engagement::Expanded) => select_cell(
                Faction::Player,
                target,
                &board,
                &geometry,
                &rules,
                &mut selection,
                &mut event_log,
                clock.elapsed,
                &territories,
            ),
            Some(_) => {
                selection.player.targets = growth_targets(
                    &board,
                    actor,
                    Faction::Player,
                    &geometry,
                    &rules,
                    &territories,
                );
            }
            None => {}
        }
    }
}

/// Makes `cell` the faction's selection and recomputes its growth targets.
#[allow(clippy::too_many_arguments)]
pub fn select_cell(
    faction: Faction,
    cell: Entity,
    board: &Board,
    geometry: &GridGeometry,
    rules: &RulesConfig,
    selection: &mut Selection,
    event_log: &mut GameEventLog,
    tick: u64,
    territories: &Query<&mut Territory>,
) {
    let targets = growth_targets(board, cell, faction, geometry, rules, territories);
    if let Some(coord) = board.cell(cell).map(|cell| cell.coord) {
        event_log.push(tick, GameEventKind::Selected {
            faction,
            coord,
            targets: targets.len(),
        });
    }
    let slot = selection.of_mut(faction);
    slot.cell = Some(cell);
    slot.targets = targets;
}

/// A selection whose cell was lost to the bot can no longer act.
fn drop_stale_selection(selection: &mut Selection, factions: &Factions) {
    let Some(cell) = selection.player.cell else {
        return;
    };
    if !factions.player.holds(cell) {
        selection.player.clear();
    }
}
