use bevy_ecs::prelude::*;
use tracing::info;

use crate::simulation::{Board, Factions, GameEventKind, GameEventLog, MatchClock, MatchOutcome};

/// Player wins by holding every cell but one, or by taking the bot's origin.
/// Boards of two cells or fewer never satisfy the count rule.
pub fn player_has_won(factions: &Factions, board_len: usize) -> bool {
    let by_count = board_len > 2 && factions.player.owned_count() == board_len - 1;
    let by_capture = factions.player.cells.contains(&factions.enemy.origin);
    by_count || by_capture
}

pub fn player_has_lost(factions: &Factions) -> bool {
    factions.enemy.cells.contains(&factions.player.origin)
}

/// Settles the match once; the result never changes afterwards.
pub fn outcome_system(
    clock: Res<MatchClock>,
    board: Res<Board>,
    factions: Res<Factions>,
    mut outcome: ResMut<MatchOutcome>,
    mut event_log: ResMut<GameEventLog>,
) {
    if outcome.is_decided() {
        return;
    }
    let decided = if player_has_won(&factions, board.len()) {
        MatchOutcome::Victory
    } else if player_has_lost(&factions) {
        MatchOutcome::Defeat
    } else {
        return;
    };
    *outcome = decided;
    event_log.push(clock.elapsed, GameEventKind::Decided { outcome: decided });
    info!("Match decided after {} ticks: {:?}", clock.elapsed, decided);
}
