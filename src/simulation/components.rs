//! Per-cell data: immutable geometry plus the mutable territory state.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::simulation::{BoardCoord, GridGeometry, ScreenPos};

/// Semantic owner of a cell. Color is derived from this, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Owner {
    #[default]
    Neutral,
    Player,
    Enemy,
}

/// One hexagon territory tile's fixed geometry.
#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
pub struct Cell {
    pub coord: BoardCoord,
    pub screen_pos: ScreenPos,
    pub vertex_offsets: [ScreenPos; 6],
}

impl Cell {
    pub fn new(coord: BoardCoord, geometry: &GridGeometry) -> Self {
        Self {
            coord,
            screen_pos: geometry.project(coord),
            vertex_offsets: geometry.vertex_offsets(),
        }
    }

    /// Absolute corner positions, shifted by `camera`.
    pub fn vertices(&self, camera: ScreenPos) -> [ScreenPos; 6] {
        let origin = self.screen_pos.offset(camera);
        self.vertex_offsets.map(|offset| origin.offset(offset))
    }
}

/// Mutable state of a cell: who holds it and how much energy it stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Component, Serialize, Deserialize)]
pub struct Territory {
    pub owner: Owner,
    pub energy: u32,
}

impl Territory {
    pub fn owned_by(owner: Owner, energy: u32) -> Self {
        Self { owner, energy }
    }

    pub fn is_neutral(&self) -> bool {
        self.owner == Owner::Neutral
    }
}
