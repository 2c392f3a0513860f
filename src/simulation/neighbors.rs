//! Adjacency lookup for board cells.
//!
//! Two resolvers live here. [`indexed_neighbors`] reads the six neighbours
//! straight out of the board's coordinate map and is what the game logic uses
//! by default. [`probed_neighbors`] reproduces the screen-space probing the
//! renderer's layout was tuned against: cast a ray out of every corner and
//! keep whichever cell's hit box it lands in. Probing scans the whole board
//! for each of the six rays, so it is O(|board| × 6) per call; fine for a few
//! hundred cells, not beyond.

use bevy_ecs::prelude::Entity;
use serde::{Deserialize, Serialize};

use crate::simulation::{Board, BoardCoord, Cell, GridGeometry, Rect, ScreenPos, deg_to_rad};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeighborStrategy {
    #[default]
    Indexed,
    Probe,
}

/// Coordinates of the six cells surrounding `coord` on the filtered grid.
pub fn axial_neighbors(coord: BoardCoord) -> [BoardCoord; 6] {
    let BoardCoord { x, y } = coord;
    let (back, forward) = if y.rem_euclid(2) == 0 { (-1, 2) } else { (-2, 1) };
    [
        BoardCoord::new(x + back, y - 1),
        BoardCoord::new(x + forward, y - 1),
        BoardCoord::new(x + back, y + 1),
        BoardCoord::new(x + forward, y + 1),
        BoardCoord::new(x, y - 2),
        BoardCoord::new(x, y + 2),
    ]
}

pub fn indexed_neighbors(board: &Board, source: &Cell) -> Vec<Entity> {
    axial_neighbors(source.coord)
        .into_iter()
        .filter_map(|coord| board.entity_at(coord))
        .collect()
}

/// Six probe points around `cell`, one per corner.
pub fn probe_points(cell: &Cell, geometry: &GridGeometry) -> [ScreenPos; 6] {
    let reach = geometry.grid_length() + geometry.probe_margin;
    let mut probes = [ScreenPos::default(); 6];
    for (j, offset) in cell.vertex_offsets.iter().enumerate() {
        let heading = deg_to_rad(j as f32 * 60.0 + 120.0);
        let corner = cell.screen_pos.offset(*offset);
        probes[j] = ScreenPos::new(
            (corner.x + heading.sin() * reach).round(),
            (corner.y + heading.cos() * reach).round(),
        );
    }
    probes
}

pub fn probed_neighbors(board: &Board, source: &Cell, geometry: &GridGeometry) -> Vec<Entity> {
    let mut found: Vec<Entity> = Vec::with_capacity(6);
    for probe in probe_points(source, geometry) {
        for (entity, cell) in board.iter() {
            let hit_box = Rect::centered(cell.screen_pos, geometry.hit_box_size);
            if hit_box.contains_point(probe) && !found.contains(&entity) {
                found.push(entity);
            }
        }
    }
    found
}

/// Cells adjacent to `source`, each listed once. Unknown entities have no
/// neighbours.
pub fn resolve_neighbors(
    board: &Board,
    source: Entity,
    geometry: &GridGeometry,
    strategy: NeighborStrategy,
) -> Vec<Entity> {
    let Some(cell) = board.cell(source) else {
        return Vec::new();
    };
    match strategy {
        NeighborStrategy::Indexed => indexed_neighbors(board, cell),
        NeighborStrategy::Probe => probed_neighbors(board, cell, geometry),
    }
}
