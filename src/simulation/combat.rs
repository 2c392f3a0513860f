//! Expansion and attack rules shared by the player and the bot.

use bevy_ecs::prelude::{Entity, Query};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::simulation::{
    Board, Faction, Factions, GameEventKind, GameEventLog, GridGeometry, RulesConfig,
    Territory, distance, resolve_neighbors, rotate_to_cord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engagement {
    /// A neutral cell was claimed with one energy.
    Expanded,
    /// The defender absorbed the hit and kept the cell.
    Repelled { damage: u32 },
    /// The defender ran dry and the cell changed hands.
    Captured { damage: u32, energy: u32 },
}

/// Applies one expand/attack from `actor` onto `target` on behalf of
/// `faction`. Returns `None` when the move is not allowed: the actor has one
/// energy or less, or the target is already the faction's.
pub fn engage(actor: &mut Territory, target: &mut Territory, faction: Faction) -> Option<Engagement> {
    if actor.energy <= 1 || target.owner == faction.owner() {
        return None;
    }
    if target.is_neutral() {
        actor.energy -= 1;
        *target = Territory::owned_by(faction.owner(), 1);
        return Some(Engagement::Expanded);
    }
    let damage = actor.energy - 1;
    actor.energy -= damage;
    let remaining = i64::from(target.energy) - i64::from(damage);
    if remaining <= 0 {
        let energy = remaining.unsigned_abs() as u32;
        *target = Territory::owned_by(faction.owner(), energy);
        Some(Engagement::Captured { damage, energy })
    } else {
        target.energy = remaining as u32;
        Some(Engagement::Repelled { damage })
    }
}

/// Neighbours of `source` that `faction` could grow into or strike.
pub fn growth_targets(
    board: &Board,
    source: Entity,
    faction: Faction,
    geometry: &GridGeometry,
    rules: &RulesConfig,
    territories: &Query<&mut Territory>,
) -> Vec<Entity> {
    resolve_neighbors(board, source, geometry, rules.neighbor_strategy)
        .into_iter()
        .filter(|&neighbor| {
            territories
                .get(neighbor)
                .is_ok_and(|territory| territory.owner != faction.owner())
        })
        .collect()
}

/// Resolves `actor` acting on `target` and books the result into the rosters
/// and the event log. The outcome itself is settled by the outcome system.
#[allow(clippy::too_many_arguments)]
pub fn commit_engagement(
    faction: Faction,
    actor: Entity,
    target: Entity,
    board: &Board,
    factions: &mut Factions,
    log: &mut GameEventLog,
    tick: u64,
    territories: &mut Query<&mut Territory>,
) -> Option<Engagement> {
    let engagement = {
        let Ok([mut attacker, mut defender]) = territories.get_many_mut([actor, target]) else {
            return None;
        };
        let defender_owner = defender.owner;
        let result = engage(&mut attacker, &mut defender, faction)?;
        (result, defender_owner)
    };
    let (result, previous_owner) = engagement;

    let (Some(from), Some(to)) = (board.cell(actor), board.cell(target)) else {
        return Some(result);
    };
    let (from_coord, to_coord) = (from.coord, to.coord);

    match result {
        Engagement::Expanded => {
            factions.roster_mut(faction).cells.insert(target);
            log.push(tick, GameEventKind::Expanded {
                faction,
                from: from_coord,
                to: to_coord,
            });
        }
        Engagement::Repelled { damage } => {
            log.push(tick, GameEventKind::Attacked {
                faction,
                from: from_coord,
                to: to_coord,
                damage,
                bearing: rotate_to_cord(from.screen_pos, to.screen_pos),
                reach: distance(from.screen_pos, to.screen_pos),
            });
        }
        Engagement::Captured { damage, energy } => {
            log.push(tick, GameEventKind::Attacked {
                faction,
                from: from_coord,
                to: to_coord,
                damage,
                bearing: rotate_to_cord(from.screen_pos, to.screen_pos),
                reach: distance(from.screen_pos, to.screen_pos),
            });
            // Only the opponent's cells can be captured.
            let loser_roster = factions.roster_mut(faction.opponent());
            if loser_roster.origin == target {
                loser_roster.origin_held = false;
            } else {
                loser_roster.cells.shift_remove(&target);
            }
            let winner_roster = factions.roster_mut(faction);
            if winner_roster.origin == target {
                winner_roster.origin_held = true;
            } else {
                winner_roster.cells.insert(target);
            }

            if factions.origin_of(target) == Some(faction.opponent()) {
                log.push(tick, GameEventKind::OriginCaptured {
                    faction,
                    coord: to_coord,
                });
            } else {
                log.push(tick, GameEventKind::Captured {
                    faction,
                    coord: to_coord,
                    energy,
                });
            }
        }
    }
    debug!(
        "{} {:?} from {:?} onto {:?} (was {:?})",
        faction.name(),
        result,
        from_coord,
        to_coord,
        previous_owner
    );
    Some(result)
}

/// Adds one energy to every cell `faction` holds that is below the cap.
/// Returns how many cells grew.
pub fn regenerate(
    faction: Faction,
    factions: &Factions,
    max_energy: u32,
    territories: &mut Query<&mut Territory>,
) -> usize {
    let mut grown = 0;
    for entity in factions.roster(faction).members() {
        if let Ok(mut territory) = territories.get_mut(entity) {
            if territory.energy < max_energy {
                territory.energy += 1;
                grown += 1;
            }
        }
    }
    grown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Owner;

    #[test]
    fn attack_five_against_three_flips_defender() {
        let mut attacker = Territory::owned_by(Owner::Player, 5);
        let mut defender = Territory::owned_by(Owner::Enemy, 3);
        let result = engage(&mut attacker, &mut defender, Faction::Player);
        assert_eq!(result, Some(Engagement::Captured { damage: 4, energy: 1 }));
        assert_eq!(attacker.energy, 1);
        assert_eq!(defender, Territory::owned_by(Owner::Player, 1));
    }

    #[test]
    fn attack_conserves_damage_on_both_sides() {
        let mut attacker = Territory::owned_by(Owner::Enemy, 7);
        let mut defender = Territory::owned_by(Owner::Player, 20);
        let result = engage(&mut attacker, &mut defender, Faction::Enemy);
        assert_eq!(result, Some(Engagement::Repelled { damage: 6 }));
        assert_eq!(attacker.energy, 1);
        assert_eq!(defender, Territory::owned_by(Owner::Player, 14));
    }

    #[test]
    fn exact_depletion_flips_with_zero_energy() {
        let mut attacker = Territory::owned_by(Owner::Player, 4);
        let mut defender = Territory::owned_by(Owner::Enemy, 3);
        let result = engage(&mut attacker, &mut defender, Faction::Player);
        assert_eq!(result, Some(Engagement::Captured { damage: 3, energy: 0 }));
        assert_eq!(defender.owner, Owner::Player);
    }

    #[test]
    fn expansion_costs_one_energy() {
        let mut attacker = Territory::owned_by(Owner::Player, 2);
        let mut target = Territory::default();
        assert_eq!(engage(&mut attacker, &mut target, Faction::Player), Some(Engagement::Expanded));
        assert_eq!(attacker.energy, 1);
        assert_eq!(target, Territory::owned_by(Owner::Player, 1));
    }

    #[test]
    fn weak_or_friendly_moves_are_rejected() {
        let mut weak = Territory::owned_by(Owner::Player, 1);
        let mut neutral = Territory::default();
        assert_eq!(engage(&mut weak, &mut neutral, Faction::Player), None);
        assert_eq!(weak.energy, 1);
        assert!(neutral.is_neutral());

        let mut strong = Territory::owned_by(Owner::Player, 9);
        let mut friendly = Territory::owned_by(Owner::Player, 2);
        assert_eq!(engage(&mut strong, &mut friendly, Faction::Player), None);
        assert_eq!(strong.energy, 9);
    }

    #[test]
    fn energy_never_goes_negative_after_any_attack() {
        for a in 2..=40u32 {
            for d in 0..=40u32 {
                let mut attacker = Territory::owned_by(Owner::Enemy, a);
                let mut defender = Territory::owned_by(Owner::Player, d);
                engage(&mut attacker, &mut defender, Faction::Enemy);
                assert_eq!(attacker.energy, 1);
                let expected = (i64::from(d) - i64::from(a - 1)).unsigned_abs() as u32;
                assert_eq!(defender.energy, expected);
                assert!(defender.owner == Owner::Enemy || i64::from(d) > i64::from(a - 1));
            }
        }
    }
}
