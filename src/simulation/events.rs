//! Structured match event data and the ring buffer that keeps the recent ones.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::simulation::{BoardCoord, Faction, MatchOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    MatchStarted {
        cells: usize,
        player_origin: BoardCoord,
        enemy_origin: BoardCoord,
    },
    Selected {
        faction: Faction,
        coord: BoardCoord,
        targets: usize,
    },
    Expanded {
        faction: Faction,
        from: BoardCoord,
        to: BoardCoord,
    },
    Attacked {
        faction: Faction,
        from: BoardCoord,
        to: BoardCoord,
        damage: u32,
        /// Heading from attacker to defender in degrees; `None` when both sit
        /// on the same screen row.
        bearing: Option<f32>,
        /// Length of the root between the two cell centres, in pixels.
        reach: f32,
    },
    Captured {
        faction: Faction,
        coord: BoardCoord,
        energy: u32,
    },
    OriginCaptured {
        faction: Faction,
        coord: BoardCoord,
    },
    Regenerated {
        faction: Faction,
        cells: usize,
    },
    Decided {
        outcome: MatchOutcome,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub seq: u64,
    pub tick: u64,
    pub kind: GameEventKind,
}

impl GameEvent {
    pub fn category(&self) -> &'static str {
        match &self.kind {
            GameEventKind::MatchStarted { .. } => "Match",
            GameEventKind::Selected { .. } => "Select",
            GameEventKind::Expanded { .. } => "Expand",
            GameEventKind::Attacked { .. } => "Attack",
            GameEventKind::Captured { .. } => "Capture",
            GameEventKind::OriginCaptured { .. } => "Origin",
            GameEventKind::Regenerated { .. } => "Regen",
            GameEventKind::Decided { .. } => "Outcome",
        }
    }

    pub fn faction(&self) -> Option<Faction> {
        match &self.kind {
            GameEventKind::Selected { faction, .. }
            | GameEventKind::Expanded { faction, .. }
            | GameEventKind::Attacked { faction, .. }
            | GameEventKind::Captured { faction, .. }
            | GameEventKind::OriginCaptured { faction, .. }
            | GameEventKind::Regenerated { faction, .. } => Some(*faction),
            GameEventKind::MatchStarted { .. } | GameEventKind::Decided { .. } => None,
        }
    }

    /// Sentiment from the human player's point of view.
    pub fn sentiment(&self) -> Sentiment {
        match &self.kind {
            GameEventKind::MatchStarted { .. }
            | GameEventKind::Selected { .. }
            | GameEventKind::Regenerated { .. } => Sentiment::Neutral,
            GameEventKind::Decided { outcome } => match outcome {
                MatchOutcome::Victory => Sentiment::Positive,
                MatchOutcome::Defeat => Sentiment::Negative,
                MatchOutcome::InProgress => Sentiment::Neutral,
            },
            _ => match self.faction() {
                Some(Faction::Player) => Sentiment::Positive,
                Some(Faction::Enemy) => Sentiment::Negative,
                None => Sentiment::Neutral,
            },
        }
    }

    pub fn headline(&self) -> String {
        match &self.kind {
            GameEventKind::MatchStarted {
                cells,
                player_origin,
                enemy_origin,
            } => format!(
                "Match on {} cells, player at {}, bot at {}",
                cells, player_origin, enemy_origin
            ),
            GameEventKind::Selected {
                faction,
                coord,
                targets,
            } => format!("{} selects {} ({} targets)", faction.name(), coord, targets),
            GameEventKind::Expanded { faction, from, to } => {
                format!("{} grows {} -> {}", faction.name(), from, to)
            }
            GameEventKind::Attacked {
                faction,
                from,
                to,
                damage,
                bearing,
                reach,
            } => {
                let heading = bearing
                    .map(|deg| format!(" at {:.0}°", deg))
                    .unwrap_or_default();
                format!(
                    "{} strikes {} -> {} for {}{} across {:.0}px",
                    faction.name(),
                    from,
                    to,
                    damage,
                    heading,
                    reach
                )
            }
            GameEventKind::Captured {
                faction,
                coord,
                energy,
            } => format!("{} takes {} with {} left", faction.name(), coord, energy),
            GameEventKind::OriginCaptured { faction, coord } => {
                format!("{} captures the origin at {}", faction.name(), coord)
            }
            GameEventKind::Regenerated { faction, cells } => {
                format!("{} regenerates {} cells", faction.name(), cells)
            }
            GameEventKind::Decided { outcome } => match outcome {
                MatchOutcome::Victory => "You win!".to_string(),
                MatchOutcome::Defeat => "You lose!".to_string(),
                MatchOutcome::InProgress => "Match continues".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Resource)]
pub struct GameEventLog {
    events: VecDeque<GameEvent>,
    capacity: usize,
    next_seq: u64,
    /// Sequence number of the first event the logging system has not shown.
    pub(crate) reported: u64,
}

impl GameEventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
            reported: 0,
        }
    }

    pub fn push(&mut self, tick: u64, kind: GameEventKind) {
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(GameEvent {
            seq: self.next_seq,
            tick,
            kind,
        });
        self.next_seq += 1;
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Events with `seq >= from`, oldest first.
    pub fn since(&self, from: u64) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |event| event.seq >= from)
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn snapshot(&self) -> Vec<GameEvent> {
        self.events.iter().cloned().collect()
    }
}

impl Default for GameEventLog {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_drops_oldest_and_keeps_numbering() {
        let mut log = GameEventLog::new(3);
        for tick in 0..5 {
            log.push(tick, GameEventKind::Regenerated {
                faction: Faction::Player,
                cells: 1,
            });
        }
        assert_eq!(log.len(), 3);
        let seqs: Vec<u64> = log.iter().map(|event| event.seq).collect();
        assert_eq!(seqs, vec![2, 3, 4]);
        assert_eq!(log.next_seq(), 5);
        assert_eq!(log.since(4).count(), 1);
    }

    #[test]
    fn sentiment_follows_the_acting_faction() {
        let event = GameEvent {
            seq: 0,
            tick: 0,
            kind: GameEventKind::Captured {
                faction: Faction::Enemy,
                coord: BoardCoord::new(3, 2),
                energy: 2,
            },
        };
        assert!(matches!(event.sentiment(), Sentiment::Negative));
        assert_eq!(event.category(), "Capture");
        assert!(event.headline().contains("Bot takes"));
    }
}
