use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;
use thiserror::Error;
use tracing::info;

pub mod combat;
pub mod components;
pub mod events;
pub mod faction;
pub mod geometry;
pub mod grid;
pub mod neighbors;
pub mod observer;
pub mod resources;
pub mod session;
pub mod systems;
pub mod widgets;

pub use combat::*;
pub use components::*;
pub use events::*;
pub use faction::*;
pub use geometry::*;
pub use grid::*;
pub use neighbors::*;
pub use observer::*;
pub use resources::*;
pub use session::*;
pub use systems::*;
pub use widgets::*;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{} origin {coord} is not on the board", .faction.name())]
    MissingOrigin { faction: Faction, coord: BoardCoord },
    #[error("both origins sit on {0}")]
    SharedOrigin(BoardCoord),
}

/// One running match: the ECS world holding board and rosters plus the
/// schedule that advances it a frame at a time.
pub struct Match {
    world: World,
    schedule: Schedule,
}

impl Match {
    pub fn new(config: &GameConfig, mask: &Mask) -> Result<Self, SetupError> {
        let origins = &config.origins;
        if origins.player == origins.enemy {
            return Err(SetupError::SharedOrigin(origins.player));
        }

        let mut world = World::default();
        world.insert_resource(config.rules.clone());
        world.insert_resource(config.grid.clone());
        world.insert_resource(config.camera.clone());
        world.insert_resource(config.viewport);
        world.insert_resource(config.palette.clone());
        world.insert_resource(MatchClock::default());
        world.insert_resource(MatchOutcome::default());
        world.insert_resource(Selection::default());
        world.insert_resource(TickInput::default());
        world.insert_resource(GameEventLog::default());
        world.insert_resource(BotRng::new(config.bot_seed));

        let board = seed_board(&mut world, mask, &config.grid);
        let locate = |faction: Faction, coord: BoardCoord| {
            board
                .entity_at(coord)
                .ok_or(SetupError::MissingOrigin { faction, coord })
        };
        let player_origin = locate(Faction::Player, origins.player)?;
        let enemy_origin = locate(Faction::Enemy, origins.enemy)?;

        for (entity, owner) in [(player_origin, Owner::Player), (enemy_origin, Owner::Enemy)] {
            if let Some(mut territory) = world.get_mut::<Territory>(entity) {
                *territory = Territory::owned_by(owner, 1);
            }
        }

        let camera = {
            let start = board
                .cell(player_origin)
                .map(|cell| cell.screen_pos)
                .unwrap_or_default();
            let (columns, rows) = board.mask_dims();
            Camera {
                offset: config.viewport.center().minus(start),
                extent: config.grid.map_extent(columns, rows),
            }
        };
        world.insert_resource(camera);

        {
            let mut log = world.resource_mut::<GameEventLog>();
            log.push(0, GameEventKind::MatchStarted {
                cells: board.len(),
                player_origin: origins.player,
                enemy_origin: origins.enemy,
            });
        }
        info!(
            "Match set up on {} cells ({}x{} mask)",
            board.len(),
            mask.columns(),
            mask.rows()
        );

        world.insert_resource(Factions::new(player_origin, enemy_origin));
        world.insert_resource(board);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                player_command_system,
                camera_system,
                player_regeneration_system,
                bot_turn_system,
                enemy_regeneration_system,
                outcome_system,
                logging_system,
                clock_system,
            )
                .chain(),
        );

        Ok(Self { world, schedule })
    }

    /// Advances the match one frame with the input sampled for it.
    pub fn tick(&mut self, input: &TickInput) {
        *self.world.resource_mut::<TickInput>() = input.clone();
        self.schedule.run(&mut self.world);
    }

    pub fn outcome(&self) -> MatchOutcome {
        *self.world.resource::<MatchOutcome>()
    }

    pub fn clock(&self) -> &MatchClock {
        self.world.resource::<MatchClock>()
    }

    pub fn board(&self) -> &Board {
        self.world.resource::<Board>()
    }

    pub fn factions(&self) -> &Factions {
        self.world.resource::<Factions>()
    }

    pub fn selection(&self) -> &Selection {
        self.world.resource::<Selection>()
    }

    pub fn camera(&self) -> &Camera {
        self.world.resource::<Camera>()
    }

    pub fn events(&self) -> &GameEventLog {
        self.world.resource::<GameEventLog>()
    }

    pub fn entity_at(&self, coord: BoardCoord) -> Option<Entity> {
        self.board().entity_at(coord)
    }

    pub fn territory(&self, coord: BoardCoord) -> Option<Territory> {
        let entity = self.entity_at(coord)?;
        self.world.get::<Territory>(entity).copied()
    }

    /// Screen position of a cell's centre with the camera applied, i.e.
    /// where a pointer has to be to hit it.
    pub fn screen_pos_of(&self, coord: BoardCoord) -> Option<ScreenPos> {
        let entity = self.entity_at(coord)?;
        let cell = self.board().cell(entity)?;
        Some(cell.screen_pos.offset(self.camera().offset))
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let board = self.board();
        let factions = self.factions();
        let selection = self.selection();
        let palette = self.world.resource::<Palette>();
        let camera = self.camera().offset;
        let clock = self.clock();

        let cells = board
            .iter()
            .map(|(entity, cell)| {
                let territory = self
                    .world
                    .get::<Territory>(entity)
                    .copied()
                    .unwrap_or_default();
                let highlight = if selection.player.cell == Some(entity) {
                    Highlight::SelectedPlayer
                } else if selection.enemy.cell == Some(entity) {
                    Highlight::SelectedEnemy
                } else if selection.player.targets.contains(&entity) {
                    Highlight::Candidate
                } else {
                    Highlight::None
                };
                let color = cell_color(territory.owner, highlight, palette);
                CellSnapshot {
                    coord: cell.coord,
                    screen_pos: cell.screen_pos.offset(camera),
                    energy: territory.energy,
                    owner: territory.owner,
                    is_origin: factions.origin_of(entity).is_some(),
                    highlight,
                    color,
                    color_hex: color.to_hex(),
                    vertices: cell.vertices(camera),
                }
            })
            .collect();

        MatchSnapshot {
            tick: clock.elapsed,
            counter: clock.counter,
            armed: clock.armed,
            outcome: self.outcome(),
            camera,
            hit_box: self.world.resource::<GridGeometry>().hit_box_size,
            player_cells: factions.player.owned_count(),
            enemy_cells: factions.enemy.owned_count(),
            cells,
            events: self.events().snapshot(),
        }
    }
}

fn seed_board(world: &mut World, mask: &Mask, geometry: &GridGeometry) -> Board {
    let entries = build_board(mask, geometry)
        .into_iter()
        .map(|cell| {
            let entity = world.spawn((cell.clone(), Territory::default())).id();
            (entity, cell)
        })
        .collect();
    Board::new(entries, (mask.columns(), mask.rows()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_match() -> Match {
        let config = GameConfig {
            bot_seed: Some(7),
            ..Default::default()
        };
        Match::new(&config, &Mask::from_ascii(DEFAULT_MAP)).expect("default map has both origins")
    }

    #[test]
    fn origins_start_owned_with_one_energy() {
        let game = default_match();
        let player = game.territory(BoardCoord::new(8, 15)).expect("player origin");
        let enemy = game.territory(BoardCoord::new(8, 1)).expect("enemy origin");
        assert_eq!(player, Territory::owned_by(Owner::Player, 1));
        assert_eq!(enemy, Territory::owned_by(Owner::Enemy, 1));
        assert_eq!(game.factions().player.owned_count(), 1);
        assert_eq!(game.outcome(), MatchOutcome::InProgress);
    }

    #[test]
    fn camera_starts_centred_on_the_player_origin() {
        let game = default_match();
        let pos = game.screen_pos_of(BoardCoord::new(8, 15)).expect("origin on screen");
        let centre = Viewport::default().center();
        assert!((pos.x - centre.x).abs() < 1e-3 && (pos.y - centre.y).abs() < 1e-3);
    }

    #[test]
    fn missing_origin_is_reported() {
        let result = Match::new(&GameConfig::default(), &Mask::from_ascii("#"));
        assert!(matches!(
            result,
            Err(SetupError::MissingOrigin {
                faction: Faction::Player,
                ..
            })
        ));
    }

    #[test]
    fn snapshot_lists_every_cell_in_board_order() {
        let game = default_match();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.cells.len(), game.board().len());
        let coords: Vec<BoardCoord> = snapshot.cells.iter().map(|cell| cell.coord).collect();
        let mut sorted = coords.clone();
        sorted.sort_by_key(|coord| (coord.y, coord.x));
        assert_eq!(coords, sorted);
        assert_eq!(snapshot.events.len(), 1);
    }

    #[test]
    fn snapshot_carries_the_configured_hit_box() {
        let config = GameConfig {
            grid: GridGeometry {
                hit_box_size: 90.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let game = Match::new(&config, &Mask::from_ascii(DEFAULT_MAP)).expect("default map");
        assert_eq!(game.snapshot().hit_box, 90.0);
        assert_eq!(default_match().snapshot().hit_box, 150.0);
    }
}
