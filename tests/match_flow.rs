use std::collections::HashSet;

use root_wars::simulation::{
    BoardCoord, DEFAULT_MAP, Faction, GameConfig, GameEventKind, GameSession, InputEvent, Mask,
    Match, MatchOutcome, Mode, OriginLayout, Owner, PointerButton, ScreenPos, Territory,
    TickInput, Viewport, Widget,
};

const PLAYER_ORIGIN: BoardCoord = BoardCoord::new(8, 15);
const ENEMY_ORIGIN: BoardCoord = BoardCoord::new(8, 1);

fn default_match() -> Match {
    let config = GameConfig {
        bot_seed: Some(11),
        ..Default::default()
    };
    Match::new(&config, &Mask::from_ascii(DEFAULT_MAP)).expect("default map has both origins")
}

/// Two or three cells: player root at (2, 1) touching the bot root at (3, 0),
/// optionally with a neutral cell at (0, 0) next to the player.
fn tiny_match(with_neutral: bool) -> Match {
    let map = if with_neutral { "#..#\n..#." } else { "...#\n..#." };
    let config = GameConfig {
        bot_seed: Some(3),
        origins: OriginLayout {
            player: BoardCoord::new(2, 1),
            enemy: BoardCoord::new(3, 0),
        },
        ..Default::default()
    };
    Match::new(&config, &Mask::from_ascii(map)).expect("tiny map has both origins")
}

fn idle() -> TickInput {
    TickInput::resting(&Viewport::default())
}

fn hover(pointer: ScreenPos) -> TickInput {
    TickInput {
        pointer,
        ..Default::default()
    }
}

fn idle_ticks(game: &mut Match, ticks: usize) {
    let input = idle();
    for _ in 0..ticks {
        game.tick(&input);
    }
}

fn click(game: &mut Match, coord: BoardCoord) {
    let pointer = game.screen_pos_of(coord).expect("cell is on the board");
    game.tick(&TickInput {
        held: [true, false, false],
        pointer,
        events: vec![InputEvent::Press(PointerButton::Primary)],
        menu_key: false,
    });
}

fn set_energy(game: &mut Match, coord: BoardCoord, energy: u32) {
    let entity = game.entity_at(coord).expect("cell is on the board");
    let mut territory = game
        .world_mut()
        .get_mut::<Territory>(entity)
        .expect("every cell has a territory");
    territory.energy = energy;
}

#[test]
fn territories_regenerate_on_the_sixty_first_tick() {
    let mut game = default_match();
    idle_ticks(&mut game, 60);
    assert_eq!(game.territory(PLAYER_ORIGIN).map(|t| t.energy), Some(1));

    idle_ticks(&mut game, 1);
    assert_eq!(game.territory(PLAYER_ORIGIN).map(|t| t.energy), Some(2));
    assert_eq!(game.territory(ENEMY_ORIGIN).map(|t| t.energy), Some(2));
    let pulses = game
        .events()
        .iter()
        .filter(|event| matches!(event.kind, GameEventKind::Regenerated { .. }))
        .count();
    assert_eq!(pulses, 2);
}

#[test]
fn board_ignores_clicks_until_armed() {
    let mut game = default_match();
    click(&mut game, PLAYER_ORIGIN);
    assert!(game.selection().player.cell.is_none());

    idle_ticks(&mut game, 28);
    assert!(game.clock().armed);
    click(&mut game, PLAYER_ORIGIN);
    assert_eq!(game.selection().player.cell, game.entity_at(PLAYER_ORIGIN));
    assert!(!game.selection().player.targets.is_empty());
}

#[test]
fn expansion_moves_energy_and_selection_into_the_new_cell() {
    let mut game = default_match();
    idle_ticks(&mut game, 61);
    click(&mut game, PLAYER_ORIGIN);

    let target = game.selection().player.targets[0];
    let target_coord = game.board().cell(target).expect("target is a board cell").coord;
    assert!(game.territory(target_coord).is_some_and(|t| t.is_neutral()));

    click(&mut game, target_coord);
    assert_eq!(
        game.territory(PLAYER_ORIGIN),
        Some(Territory::owned_by(Owner::Player, 1))
    );
    assert_eq!(
        game.territory(target_coord),
        Some(Territory::owned_by(Owner::Player, 1))
    );
    assert_eq!(game.factions().player.owned_count(), 2);
    assert_eq!(game.selection().player.cell, Some(target));
    assert!(
        game.events()
            .iter()
            .any(|event| matches!(event.kind, GameEventKind::Expanded { to, .. } if to == target_coord))
    );
}

#[test]
fn clicking_a_non_candidate_does_nothing() {
    let mut game = default_match();
    idle_ticks(&mut game, 61);
    click(&mut game, PLAYER_ORIGIN);
    let before = game.factions().player.owned_count();

    click(&mut game, BoardCoord::new(8, 7));
    assert_eq!(game.factions().player.owned_count(), before);
    assert!(game.territory(BoardCoord::new(8, 7)).is_some_and(|t| t.is_neutral()));
}

#[test]
fn holding_all_but_one_cell_wins() {
    let mut game = tiny_match(true);
    idle_ticks(&mut game, 61);
    click(&mut game, BoardCoord::new(2, 1));
    click(&mut game, BoardCoord::new(0, 0));

    assert_eq!(game.board().len(), 3);
    assert_eq!(game.factions().player.owned_count(), 2);
    assert_eq!(game.outcome(), MatchOutcome::Victory);
}

#[test]
fn taking_the_bot_origin_wins_and_stays_won() {
    let mut game = tiny_match(false);
    idle_ticks(&mut game, 29);
    set_energy(&mut game, BoardCoord::new(2, 1), 5);
    click(&mut game, BoardCoord::new(2, 1));
    click(&mut game, BoardCoord::new(3, 0));

    assert_eq!(
        game.territory(BoardCoord::new(3, 0)),
        Some(Territory::owned_by(Owner::Player, 3))
    );
    assert!(!game.factions().enemy.origin_held);
    assert_eq!(game.outcome(), MatchOutcome::Victory);

    idle_ticks(&mut game, 200);
    assert_eq!(game.outcome(), MatchOutcome::Victory);
    let decided = game
        .events()
        .iter()
        .filter(|event| matches!(event.kind, GameEventKind::Decided { .. }))
        .count();
    assert_eq!(decided, 1);
}

#[test]
fn losing_the_player_origin_is_a_defeat() {
    let mut game = tiny_match(false);
    set_energy(&mut game, BoardCoord::new(3, 0), 10);
    idle_ticks(&mut game, 61);

    // 10 - 1 strikes 2 for 9, leaving 7; the bot's own pulse follows.
    assert_eq!(
        game.territory(BoardCoord::new(2, 1)),
        Some(Territory::owned_by(Owner::Enemy, 8))
    );
    assert_eq!(game.outcome(), MatchOutcome::Defeat);
}

#[test]
fn a_captured_selection_is_dropped_on_the_next_tick() {
    let mut game = tiny_match(false);
    idle_ticks(&mut game, 29);
    click(&mut game, BoardCoord::new(2, 1));
    let origin = game.entity_at(BoardCoord::new(2, 1)).expect("player origin");
    assert_eq!(game.selection().player.cell, Some(origin));

    set_energy(&mut game, BoardCoord::new(3, 0), 10);
    idle_ticks(&mut game, 31);
    assert!(game.factions().enemy.holds(origin));
    assert!(!game.factions().player.holds(origin));
    assert_eq!(game.factions().player.owned_count(), 0);
    assert_eq!(game.factions().enemy.owned_count(), 2);

    let reach = game
        .events()
        .iter()
        .find_map(|event| match event.kind {
            GameEventKind::Attacked { faction: Faction::Enemy, reach, .. } => Some(reach),
            _ => None,
        })
        .expect("the bot struck the player origin");
    assert!((reach - 300.0).abs() < 0.5, "reach was {reach}");

    idle_ticks(&mut game, 1);
    assert!(game.selection().player.cell.is_none());
    assert!(game.selection().player.targets.is_empty());
}

#[test]
fn bot_expands_from_its_origin_on_the_cadence() {
    let mut game = default_match();
    set_energy(&mut game, ENEMY_ORIGIN, 5);
    idle_ticks(&mut game, 60);
    assert_eq!(game.factions().enemy.owned_count(), 1);

    idle_ticks(&mut game, 1);
    let target_coord = BoardCoord::new(6, 0);
    assert!(game.events().iter().any(|event| matches!(
        event.kind,
        GameEventKind::Expanded { faction: Faction::Enemy, from, to }
            if from == ENEMY_ORIGIN && to == target_coord
    )));
    // Both cells get the bot's pulse after the move: 5 - 1 + 1 and 1 + 1.
    assert_eq!(
        game.territory(ENEMY_ORIGIN),
        Some(Territory::owned_by(Owner::Enemy, 5))
    );
    assert_eq!(
        game.territory(target_coord),
        Some(Territory::owned_by(Owner::Enemy, 2))
    );
    let target = game.entity_at(target_coord);
    assert_eq!(game.selection().enemy.cell, target);
    assert_eq!(game.factions().enemy.owned_count(), 2);
    assert_eq!(game.factions().player.owned_count(), 1);
}

#[test]
fn bot_acts_from_any_cell_it_holds() {
    let mut game = default_match();
    set_energy(&mut game, ENEMY_ORIGIN, 40);
    idle_ticks(&mut game, 61 * 20);

    let actors: HashSet<BoardCoord> = game
        .events()
        .iter()
        .filter_map(|event| match event.kind {
            GameEventKind::Expanded { faction: Faction::Enemy, from, .. }
            | GameEventKind::Attacked { faction: Faction::Enemy, from, .. } => Some(from),
            _ => None,
        })
        .collect();
    assert!(actors.contains(&ENEMY_ORIGIN));
    assert!(actors.len() > 1, "bot only ever acted from {actors:?}");
    for coord in &actors {
        let entity = game.entity_at(*coord).expect("actor is a board cell");
        assert!(game.factions().enemy.holds(entity), "{coord:?} left the bot");
    }
}

#[test]
fn resting_pointer_leaves_the_camera_alone() {
    let mut game = default_match();
    let start = game.camera().offset;
    idle_ticks(&mut game, 100);
    assert_eq!(game.camera().offset, start);
}

#[test]
fn top_left_edge_pans_until_an_eighth_of_the_map() {
    let mut game = default_match();
    let start = game.camera().offset;
    let corner = hover(ScreenPos::new(0.0, 0.0));

    game.tick(&corner);
    let step = game.camera().offset;
    assert!((step.x - start.x - 30.0).abs() < 1e-3);
    assert!((step.y - start.y - 30.0).abs() < 1e-3);

    for _ in 0..200 {
        game.tick(&corner);
    }
    let extent = game.camera().extent;
    let settled = game.camera().offset;
    for (offset, span) in [(settled.x, extent.x), (settled.y, extent.y)] {
        assert!(offset >= span / 8.0 && offset < span / 8.0 + 30.0, "offset {offset}");
    }

    game.tick(&corner);
    assert_eq!(game.camera().offset, settled);
}

#[test]
fn bottom_right_edge_pans_until_half_the_map() {
    let mut game = default_match();
    let viewport = Viewport::default();
    let corner = hover(ScreenPos::new(viewport.width, viewport.height));
    for _ in 0..200 {
        game.tick(&corner);
    }
    let extent = game.camera().extent;
    let settled = game.camera().offset;
    assert!(settled.x <= -extent.x / 2.0 && settled.x > -extent.x / 2.0 - 30.0);
    assert!(settled.y <= -extent.y / 2.0 && settled.y > -extent.y / 2.0 - 30.0);

    game.tick(&corner);
    assert_eq!(game.camera().offset, settled);
}

#[test]
fn regeneration_stops_at_the_energy_cap() {
    let mut game = default_match();
    set_energy(&mut game, PLAYER_ORIGIN, 40);
    idle_ticks(&mut game, 61 * 3);
    assert_eq!(game.territory(PLAYER_ORIGIN).map(|t| t.energy), Some(40));
}

#[test]
fn session_plays_a_match_from_the_menu() {
    let config = GameConfig {
        bot_seed: Some(5),
        ..Default::default()
    };
    let mut session = GameSession::new(config, Mask::from_ascii(DEFAULT_MAP));
    assert_eq!(session.mode(), Mode::MainMenu);

    let play = session
        .widgets()
        .into_iter()
        .find_map(|widget| match widget {
            Widget::Button(button) if button.label.text == "Play" => Some(button),
            _ => None,
        })
        .expect("main menu has a Play button");
    let centre = ScreenPos::new(
        play.label.pos.x + play.label.size.x / 2.0,
        play.label.pos.y + play.label.size.y / 2.0,
    );
    session.tick(&TickInput {
        held: [true, false, false],
        pointer: centre,
        events: vec![InputEvent::Press(PointerButton::Primary)],
        menu_key: false,
    });
    assert_eq!(session.mode(), Mode::Game);

    let input = idle();
    for _ in 0..61 {
        session.tick(&input);
    }
    let snapshot = session.snapshot();
    let game = snapshot.game.expect("a match is running");
    assert_eq!(game.outcome, MatchOutcome::InProgress);
    assert_eq!(game.player_cells, 1);
    let origin = game
        .cells
        .iter()
        .find(|cell| cell.coord == PLAYER_ORIGIN)
        .expect("origin is in the snapshot");
    assert!(origin.is_origin);
    assert_eq!(origin.energy, 2);
    assert!(serde_json::to_string(&snapshot.widgets).is_ok());
}
