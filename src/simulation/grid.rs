use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use bevy_ecs::prelude::{Entity, Resource};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::simulation::{Cell, Rect, ScreenPos, deg_to_rad};

/// Discrete (column, row) position of a cell in the source mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardCoord {
    pub x: i32,
    pub y: i32,
}

impl BoardCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for BoardCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Only every third column per row parity carries a hexagon; anything else
/// would overlap its neighbours.
pub fn passes_parity_filter(coord: BoardCoord) -> bool {
    if coord.y.rem_euclid(2) == 0 {
        coord.x.rem_euclid(3) == 0
    } else {
        (coord.x + 1).rem_euclid(3) == 0
    }
}

/// Sizes that drive projection, hit boxes and neighbour probing.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Hexagon radius used by the pixel projection.
    pub hex_size: f32,
    /// Side of the square each cell is rendered onto.
    pub surface_size: f32,
    /// Side of the square hit box centred on a cell.
    pub hit_box_size: f32,
    /// Extra reach added to the grid length when probing for neighbours.
    pub probe_margin: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            hex_size: 100.0,
            surface_size: 300.0,
            hit_box_size: 150.0,
            probe_margin: 20.0,
        }
    }
}

impl GridGeometry {
    pub fn hex_width(&self) -> f32 {
        3.0_f32.sqrt() * self.hex_size
    }

    pub fn hex_height(&self) -> f32 {
        2.0 * self.hex_size
    }

    /// Length of the connecting "root" between two neighbouring cells.
    pub fn grid_length(&self) -> f32 {
        self.hex_size * 2.0
    }

    pub fn project(&self, coord: BoardCoord) -> ScreenPos {
        let horizontal_distance = self.hex_width();
        let vertical_distance = self.hex_height() * 0.75;
        let offset = if coord.y.rem_euclid(2) == 0 {
            self.hex_width() / 2.0
        } else {
            0.0
        };
        ScreenPos::new(
            coord.x as f32 * horizontal_distance + offset,
            coord.y as f32 * vertical_distance,
        )
    }

    /// Corner offsets relative to the cell centre. Vertex `j` sits on the
    /// same heading (`j * 60 + 120` degrees) as the probe ray cast from it.
    pub fn vertex_offsets(&self) -> [ScreenPos; 6] {
        let side = self.hex_size / 2.0;
        let mut walk = [ScreenPos::default(); 6];
        for i in 1..6 {
            let heading = deg_to_rad(i as f32 * 60.0);
            walk[i] = ScreenPos::new(
                walk[i - 1].x + heading.sin() * side,
                walk[i - 1].y + heading.cos() * side,
            );
        }
        // The drawing surface is mirrored through its centre.
        let mirrored = walk.map(|p| ScreenPos::new(-p.x, -p.y));
        let cx = mirrored.iter().map(|p| p.x).sum::<f32>() / 6.0;
        let cy = mirrored.iter().map(|p| p.y).sum::<f32>() / 6.0;
        mirrored.map(|p| ScreenPos::new(p.x - cx, p.y - cy))
    }

    /// Pixel extent of the area a mask of `columns × rows` may cover,
    /// including the connecting roots. Bounds the camera.
    pub fn map_extent(&self, columns: usize, rows: usize) -> ScreenPos {
        let step = self.hex_size + self.grid_length();
        ScreenPos::new(columns as f32 * step, rows as f32 * step)
    }
}

/// Binary traversability mask indexed `M[x][y]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

/// Pixel value that marks a traversable coordinate in a map bitmap.
pub const TRAVERSABLE_PIXEL: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode map bitmap: {0}")]
    Image(#[from] image::ImageError),
}

impl Mask {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![false; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.columns && y < self.rows && self.cells[y * self.columns + x]
    }

    pub fn set(&mut self, x: usize, y: usize, traversable: bool) {
        if x < self.columns && y < self.rows {
            self.cells[y * self.columns + x] = traversable;
        }
    }

    /// Parses an ASCII atlas: line index is `y`, character index is `x`,
    /// `#` marks a traversable coordinate. Blank leading/trailing lines are
    /// ignored.
    pub fn from_ascii(atlas: &str) -> Self {
        let lines: Vec<&str> = atlas.trim_matches('\n').lines().collect();
        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let mut mask = Self::new(columns, lines.len());
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                mask.set(x, y, ch == '#');
            }
        }
        mask
    }

    /// Builds the mask from a decoded bitmap. The bitmap is turned 90°
    /// counter-clockwise first, then `M[x][y]` samples column `y`, row `x`.
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rotated = image.rotate270().to_rgba8();
        let (width, height) = rotated.dimensions();
        let mut mask = Self::new(height as usize, width as usize);
        for (column, row, pixel) in rotated.enumerate_pixels() {
            if pixel.0 == TRAVERSABLE_PIXEL {
                mask.set(row as usize, column as usize, true);
            }
        }
        mask
    }

    pub fn load(path: &Path) -> Result<Self, MapError> {
        let bytes = std::fs::read(path)?;
        let image = image::load_from_memory(&bytes)?;
        let mask = Self::from_image(&image);
        info!(
            "Loaded map {}: {}x{} mask",
            path.display(),
            mask.columns,
            mask.rows
        );
        Ok(mask)
    }
}

/// Built-in map used when no bitmap is supplied.
pub const DEFAULT_MAP: &str = r#"
....#########....
...###########...
..#############..
.###############.
#################
#################
#################
#################
#################
#################
#################
#################
#################
.###############.
..#############..
...###########...
....#########....
"#;

/// Derives the ordered cell list for `mask`. Board order is row-major.
pub fn build_board(mask: &Mask, geometry: &GridGeometry) -> Vec<Cell> {
    let mut cells = Vec::new();
    for y in 0..mask.rows() {
        for x in 0..mask.columns() {
            if !mask.get(x, y) {
                continue;
            }
            let coord = BoardCoord::new(x as i32, y as i32);
            if passes_parity_filter(coord) {
                cells.push(Cell::new(coord, geometry));
            }
        }
    }
    cells
}

/// Every cell of the running match, fixed in membership once built.
#[derive(Debug, Clone, Resource, Default)]
pub struct Board {
    entries: Vec<(Entity, Cell)>,
    by_coord: HashMap<BoardCoord, usize>,
    by_entity: HashMap<Entity, usize>,
    mask_dims: (usize, usize),
}

impl Board {
    pub fn new(entries: Vec<(Entity, Cell)>, mask_dims: (usize, usize)) -> Self {
        let mut by_coord = HashMap::with_capacity(entries.len());
        let mut by_entity = HashMap::with_capacity(entries.len());
        for (index, (entity, cell)) in entries.iter().enumerate() {
            by_coord.insert(cell.coord, index);
            by_entity.insert(*entity, index);
        }
        Self {
            entries,
            by_coord,
            by_entity,
            mask_dims,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &Cell)> {
        self.entries.iter().map(|(entity, cell)| (*entity, cell))
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.iter().map(|(entity, _)| *entity)
    }

    pub fn cell(&self, entity: Entity) -> Option<&Cell> {
        self.by_entity.get(&entity).map(|&index| &self.entries[index].1)
    }

    pub fn entity_at(&self, coord: BoardCoord) -> Option<Entity> {
        self.by_coord.get(&coord).map(|&index| self.entries[index].0)
    }

    pub fn mask_dims(&self) -> (usize, usize) {
        self.mask_dims
    }

    /// First cell, in board order, whose hit box contains `point` once the
    /// board is shifted by `camera`.
    pub fn cell_at_point(
        &self,
        point: ScreenPos,
        camera: ScreenPos,
        geometry: &GridGeometry,
    ) -> Option<Entity> {
        self.iter()
            .find(|(_, cell)| {
                Rect::centered(cell.screen_pos.offset(camera), geometry.hit_box_size)
                    .contains_point(point)
            })
            .map(|(entity, _)| entity)
    }
}
