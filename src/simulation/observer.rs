//! Observer snapshots handed to the presentation layer.

use serde::Serialize;

use crate::simulation::{
    BoardCoord, GameEvent, MatchOutcome, Owner, Palette, Rgb, ScreenPos, clamp_channel,
};

/// Pixels each energy ring is shifted up and left from the one below it.
pub const RING_STEP: f32 = 3.0;
/// Amount each ring darkens its non-zero color channels.
pub const RING_SHADE: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    SelectedPlayer,
    SelectedEnemy,
    Candidate,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellSnapshot {
    pub coord: BoardCoord,
    /// Centre on screen, camera already applied.
    pub screen_pos: ScreenPos,
    pub energy: u32,
    pub owner: Owner,
    pub is_origin: bool,
    pub highlight: Highlight,
    pub color: Rgb,
    pub color_hex: String,
    pub vertices: [ScreenPos; 6],
}

#[derive(Debug, Clone, Serialize)]
pub struct EnergyRing {
    pub vertices: [ScreenPos; 6],
    pub fill: Rgb,
    pub outlined: bool,
}

impl CellSnapshot {
    /// One stacked polygon per energy point. The bottom ring sits on the
    /// cell's own outline, later ones climb towards the top-left and darken.
    pub fn energy_rings(&self) -> Vec<EnergyRing> {
        (0..self.energy)
            .map(|i| {
                let lift = i as f32 * RING_STEP;
                let shade = i as i32 * RING_SHADE;
                let darken = |channel: u8| {
                    if channel == 0 {
                        0
                    } else {
                        clamp_channel(i32::from(channel) - shade)
                    }
                };
                EnergyRing {
                    vertices: self
                        .vertices
                        .map(|vertex| ScreenPos::new(vertex.x - lift, vertex.y - lift)),
                    fill: Rgb(darken(self.color.0), darken(self.color.1), darken(self.color.2)),
                    outlined: i % 5 == 0,
                }
            })
            .collect()
    }
}

/// Fill color for a cell: selection beats candidacy, which beats ownership.
pub fn cell_color(owner: Owner, highlight: Highlight, palette: &Palette) -> Rgb {
    match highlight {
        Highlight::SelectedPlayer => palette.selected_player,
        Highlight::SelectedEnemy => palette.selected_enemy,
        Highlight::Candidate => palette.candidate,
        Highlight::None => match owner {
            Owner::Player => palette.player,
            Owner::Enemy => palette.enemy,
            Owner::Neutral => palette.neutral,
        },
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub counter: u32,
    pub armed: bool,
    pub outcome: MatchOutcome,
    pub camera: ScreenPos,
    /// Side of the square around each cell that accepts clicks.
    pub hit_box: f32,
    pub player_cells: usize,
    pub enemy_cells: usize,
    pub cells: Vec<CellSnapshot>,
    pub events: Vec<GameEvent>,
}

impl MatchSnapshot {
    pub fn cell_at(&self, coord: BoardCoord) -> Option<&CellSnapshot> {
        self.cells.iter().find(|cell| cell.coord == coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(energy: u32, color: Rgb) -> CellSnapshot {
        CellSnapshot {
            coord: BoardCoord::new(0, 0),
            screen_pos: ScreenPos::new(100.0, 100.0),
            energy,
            owner: Owner::Player,
            is_origin: false,
            highlight: Highlight::None,
            color,
            color_hex: color.to_hex(),
            vertices: [ScreenPos::new(100.0, 100.0); 6],
        }
    }

    #[test]
    fn rings_darken_only_lit_channels() {
        let rings = cell(7, Rgb(0, 0, 255)).energy_rings();
        assert_eq!(rings.len(), 7);
        assert_eq!(rings[0].fill, Rgb(0, 0, 255));
        assert_eq!(rings[6].fill, Rgb(0, 0, 219));
        assert_eq!(rings[6].vertices[0], ScreenPos::new(82.0, 82.0));
        let outlined: Vec<bool> = rings.iter().map(|ring| ring.outlined).collect();
        assert_eq!(outlined, vec![true, false, false, false, false, true, false]);
    }

    #[test]
    fn deep_stacks_clamp_at_black() {
        let rings = cell(40, Rgb(20, 20, 20)).energy_rings();
        assert_eq!(rings[39].fill, Rgb(0, 0, 0));
    }

    #[test]
    fn neutral_cells_have_no_rings() {
        assert!(cell(0, Rgb(20, 20, 20)).energy_rings().is_empty());
    }

    #[test]
    fn selection_overrides_owner_color() {
        let palette = Palette::default();
        assert_eq!(cell_color(Owner::Enemy, Highlight::None, &palette), palette.enemy);
        assert_eq!(
            cell_color(Owner::Player, Highlight::SelectedPlayer, &palette),
            palette.selected_player
        );
        assert_eq!(cell_color(Owner::Neutral, Highlight::Candidate, &palette), palette.candidate);
    }
}
