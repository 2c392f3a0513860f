//! Shared resources and match-level data structures.

use bevy_ecs::prelude::{Entity, Resource};
use indexmap::IndexSet;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::simulation::{
    BoardCoord, Faction, GridGeometry, Mode, NeighborStrategy, Rgb, ScreenPos,
};

/// Flat launch options plus the tuning tables the core reads every tick.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_fps: u32,
    pub initial_mode: Mode,
    pub title: String,
    pub viewport: Viewport,
    pub rules: RulesConfig,
    pub grid: GridGeometry,
    pub camera: CameraConfig,
    pub palette: Palette,
    pub origins: OriginLayout,
    /// Fixed seed for the bot's choices; `None` draws from entropy.
    pub bot_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_fps: 60,
            initial_mode: Mode::MainMenu,
            title: "Root Wars".to_string(),
            viewport: Viewport::default(),
            rules: RulesConfig::default(),
            grid: GridGeometry::default(),
            camera: CameraConfig::default(),
            palette: Palette::default(),
            origins: OriginLayout::default(),
            bot_seed: None,
        }
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct RulesConfig {
    pub max_energy: u32,
    /// Regeneration and the bot fire when the tick counter is a multiple of
    /// this.
    pub cadence_interval: u32,
    /// The tick counter resets to zero once it exceeds this.
    pub counter_wrap: u32,
    /// Board clicks are ignored until the counter first hits a multiple of
    /// this.
    pub arm_interval: u32,
    pub neighbor_strategy: NeighborStrategy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_energy: 40,
            cadence_interval: 120,
            counter_wrap: 60,
            arm_interval: 30,
            neighbor_strategy: NeighborStrategy::Indexed,
        }
    }
}

#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> ScreenPos {
        ScreenPos::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Pixels the camera moves per tick while the pointer rests on an edge.
    pub navigation_speed: f32,
    /// Distance from a viewport edge that still counts as "on the edge".
    pub edge_reaction: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            navigation_speed: 30.0,
            edge_reaction: 2.0,
        }
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Palette {
    pub player: Rgb,
    pub enemy: Rgb,
    pub neutral: Rgb,
    pub outline: Rgb,
    pub selected_player: Rgb,
    pub selected_enemy: Rgb,
    pub candidate: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            player: Rgb(0, 0, 255),
            enemy: Rgb(255, 0, 0),
            neutral: Rgb(20, 20, 20),
            outline: Rgb(50, 50, 50),
            selected_player: Rgb(100, 0, 150),
            selected_enemy: Rgb(255, 255, 0),
            candidate: Rgb(0, 255, 0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginLayout {
    pub player: BoardCoord,
    pub enemy: BoardCoord,
}

impl Default for OriginLayout {
    fn default() -> Self {
        Self {
            player: BoardCoord::new(8, 15),
            enemy: BoardCoord::new(8, 1),
        }
    }
}

/// Cells held by one faction. The origin is tracked apart from the rest.
#[derive(Debug, Clone)]
pub struct Roster {
    pub origin: Entity,
    pub origin_held: bool,
    pub cells: IndexSet<Entity>,
}

impl Roster {
    pub fn new(origin: Entity) -> Self {
        Self {
            origin,
            origin_held: true,
            cells: IndexSet::new(),
        }
    }

    /// Held origin first, then the other cells in the order they were won.
    pub fn members(&self) -> Vec<Entity> {
        let origin = self.origin_held.then_some(self.origin);
        origin.into_iter().chain(self.cells.iter().copied()).collect()
    }

    pub fn owned_count(&self) -> usize {
        self.cells.len() + usize::from(self.origin_held)
    }

    pub fn holds(&self, entity: Entity) -> bool {
        (self.origin_held && self.origin == entity) || self.cells.contains(&entity)
    }
}

#[derive(Debug, Clone, Resource)]
pub struct Factions {
    pub player: Roster,
    pub enemy: Roster,
}

impl Factions {
    pub fn new(player_origin: Entity, enemy_origin: Entity) -> Self {
        Self {
            player: Roster::new(player_origin),
            enemy: Roster::new(enemy_origin),
        }
    }

    pub fn roster(&self, faction: Faction) -> &Roster {
        match faction {
            Faction::Player => &self.player,
            Faction::Enemy => &self.enemy,
        }
    }

    pub fn roster_mut(&mut self, faction: Faction) -> &mut Roster {
        match faction {
            Faction::Player => &mut self.player,
            Faction::Enemy => &mut self.enemy,
        }
    }

    pub fn origin_of(&self, entity: Entity) -> Option<Faction> {
        if self.player.origin == entity {
            Some(Faction::Player)
        } else if self.enemy.origin == entity {
            Some(Faction::Enemy)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FactionSelection {
    pub cell: Option<Entity>,
    /// Neighbours of `cell` the faction does not own yet.
    pub targets: Vec<Entity>,
}

impl FactionSelection {
    pub fn clear(&mut self) {
        self.cell = None;
        self.targets.clear();
    }
}

#[derive(Debug, Clone, Default, Resource)]
pub struct Selection {
    pub player: FactionSelection,
    pub enemy: FactionSelection,
}

impl Selection {
    pub fn of_mut(&mut self, faction: Faction) -> &mut FactionSelection {
        match faction {
            Faction::Player => &mut self.player,
            Faction::Enemy => &mut self.enemy,
        }
    }
}

/// Frame-coupled clock. `counter` wraps, `elapsed` does not.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct MatchClock {
    pub counter: u32,
    pub elapsed: u64,
    pub armed: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self {
            counter: 1,
            elapsed: 0,
            armed: false,
        }
    }
}

impl MatchClock {
    pub fn cadence_due(&self, interval: u32) -> bool {
        interval != 0 && self.counter % interval == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Resource, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[default]
    InProgress,
    Victory,
    Defeat,
}

impl MatchOutcome {
    pub fn is_decided(&self) -> bool {
        *self != MatchOutcome::InProgress
    }
}

/// Pan vector applied to every cell before it reaches the screen.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Camera {
    pub offset: ScreenPos,
    /// Pixel extent of the map; bounds how far the camera may pan.
    pub extent: ScreenPos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Press(PointerButton),
    Release(PointerButton),
    /// Wheel steps; positive scrolls up.
    Scroll(i32),
    Quit,
}

/// Everything the presentation layer sampled for one tick.
#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct TickInput {
    /// Held state for primary, secondary and middle buttons.
    pub held: [bool; 3],
    pub pointer: ScreenPos,
    pub events: Vec<InputEvent>,
    pub menu_key: bool,
}

impl TickInput {
    /// No buttons, no events, pointer parked mid-screen where it cannot pan
    /// the camera.
    pub fn resting(viewport: &Viewport) -> Self {
        Self {
            pointer: viewport.center(),
            ..Default::default()
        }
    }

    pub fn primary_held(&self) -> bool {
        self.held[0]
    }

    pub fn primary_presses(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, InputEvent::Press(PointerButton::Primary)))
            .count()
    }

    pub fn scroll_steps(&self) -> impl Iterator<Item = i32> + '_ {
        self.events.iter().filter_map(|event| match event {
            InputEvent::Scroll(steps) => Some(*steps),
            _ => None,
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.events.iter().any(|event| matches!(event, InputEvent::Quit))
    }
}

#[derive(Resource)]
pub struct BotRng(pub SmallRng);

impl BotRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_entropy()),
        }
    }
}
