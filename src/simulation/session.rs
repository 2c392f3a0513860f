//! Top-level state machine: menus, settings and the running match.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::simulation::{
    Button, GameConfig, Label, Mask, Match, MatchOutcome, MatchSnapshot, Rgb, TextBlock,
    TickInput, Viewport, Widget,
};

/// Pixels a text block moves per wheel step.
pub const SCROLL_SCALE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    MainMenu,
    Settings,
    Info,
    Rules,
    Game,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::MainMenu => "main menu",
            Mode::Settings => "settings",
            Mode::Info => "info",
            Mode::Rules => "rules",
            Mode::Game => "game",
        }
    }
}

struct MainMenuScreen {
    title: Label,
    play: Button,
    settings: Button,
    info: Button,
    rules: Button,
    exit: Button,
}

impl MainMenuScreen {
    fn build(title: &str, viewport: &Viewport) -> Self {
        let button = |text: &str, percent: f32| Button::new(Label::new(text).percent_y(percent, viewport));
        Self {
            title: Label::new(title).percent_y(10.0, viewport),
            play: button("Play", 35.0),
            settings: button("Settings", 45.0),
            info: button("Info", 55.0),
            rules: button("Rules", 65.0),
            exit: button("Exit", 75.0),
        }
    }

    fn widgets(&self) -> Vec<Widget> {
        vec![
            Widget::Label(self.title.clone()),
            Widget::Button(self.play.clone()),
            Widget::Button(self.settings.clone()),
            Widget::Button(self.info.clone()),
            Widget::Button(self.rules.clone()),
            Widget::Button(self.exit.clone()),
        ]
    }
}

/// Built the first time settings are opened and kept for the whole session.
struct SettingsScreen {
    fps_toggle: Button,
    back: Button,
    help: TextBlock,
}

impl SettingsScreen {
    fn build(show_fps: bool, viewport: &Viewport) -> Self {
        let mut help = TextBlock::new(SETTINGS_HELP, 40.0);
        help.label = help.label.percent_y(20.0, viewport);
        help.label.pos.x = 100.0;
        Self {
            fps_toggle: Button::new(Label::new(fps_toggle_text(show_fps)).percent_y(10.0, viewport)),
            back: Button::new(Label::new("Back").percent(8.0, 8.0, viewport)),
            help,
        }
    }

    fn widgets(&self) -> Vec<Widget> {
        vec![
            Widget::Button(self.fps_toggle.clone()),
            Widget::Button(self.back.clone()),
            Widget::Text(self.help.clone()),
        ]
    }
}

/// Info and rules pages: one scrollable block and a way back.
struct PageScreen {
    text: TextBlock,
    back: Button,
}

impl PageScreen {
    fn build(text: String, percent_y: f32, viewport: &Viewport) -> Self {
        let mut block = TextBlock::new(text, 40.0);
        block.label = block.label.percent_y(percent_y, viewport);
        Self {
            text: block,
            back: Button::new(Label::new("Back").percent(8.0, 8.0, viewport)),
        }
    }

    fn widgets(&self) -> Vec<Widget> {
        vec![Widget::Text(self.text.clone()), Widget::Button(self.back.clone())]
    }
}

struct GameScreen {
    menu: Button,
    win: Label,
    lose: Label,
}

impl GameScreen {
    fn build(viewport: &Viewport) -> Self {
        let banner = |text: &str| Label::new(text).with_color(Rgb(50, 50, 50)).center(viewport);
        Self {
            menu: Button::new(Label::new("Menu").percent(8.0, 8.0, viewport)),
            win: banner("You win!"),
            lose: banner("You lose!"),
        }
    }

    fn widgets(&self, outcome: MatchOutcome) -> Vec<Widget> {
        match outcome {
            MatchOutcome::InProgress => Vec::new(),
            MatchOutcome::Victory => vec![Widget::Label(self.win.clone()), Widget::Button(self.menu.clone())],
            MatchOutcome::Defeat => vec![Widget::Label(self.lose.clone()), Widget::Button(self.menu.clone())],
        }
    }
}

const SETTINGS_HELP: &str = "Navigation\n\n\
Move the pointer to one of the sides of the screen\n\
to move the camera\n\n\n\
Key settings\n\n\
Return to main menu: Escape\n\
Select your root: Left Mouse Button\n\
Place your root on available position: Left Mouse Button\n";

const INFO_TEXT: &str = "Hello\n\n\
This is a simple RTS (Real Time Strategy) game.\n\n\
Defeat the enemy root and conquer this hexagon map!\n\n\
Runs in your terminal, one tick per frame.";

fn rules_text(max_energy: u32) -> String {
    format!(
        "Rules\n\n\
To win this game, you need to capture the enemy root.\n\
Enemy root is dyed red.\n\
To do this, you need to grow your root.\n\
Your root is dyed blue.\n\n\
When you click on your root you can choose up to 6\n\
positions where root can grow.\n\
Positions where your root can grow are dyed green.\n\n\
Every root has energy. Energy can be from 0 to {max_energy}.\n\
Root energy is a number on root.\n\
If root that you clicked has more than 1 energy,\n\
you can click on available positions\n\
where root can grow to grow your root.\n\n\
If root that you clicked has more energy than enemy root,\n\
you can grow your root on enemy root, enemy root will be destroyed."
    )
}

fn fps_toggle_text(show_fps: bool) -> &'static str {
    if show_fps { "Hide fps" } else { "Show fps" }
}

/// What the presentation layer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub running: bool,
    pub show_fps: bool,
    pub widgets: Vec<Widget>,
    pub game: Option<MatchSnapshot>,
}

pub struct GameSession {
    config: GameConfig,
    mask: Mask,
    mode: Mode,
    running: bool,
    show_fps: bool,
    main_menu: Option<MainMenuScreen>,
    settings: Option<SettingsScreen>,
    info: Option<PageScreen>,
    rules: Option<PageScreen>,
    game_screen: Option<GameScreen>,
    game: Option<Match>,
}

impl GameSession {
    pub fn new(config: GameConfig, mask: Mask) -> Self {
        let initial = config.initial_mode;
        let mut session = Self {
            config,
            mask,
            mode: Mode::MainMenu,
            running: true,
            show_fps: false,
            main_menu: None,
            settings: None,
            info: None,
            rules: None,
            game_screen: None,
            game: None,
        };
        session.change_mode(initial);
        session
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn show_fps(&self) -> bool {
        self.show_fps
    }

    pub fn game(&self) -> Option<&Match> {
        self.game.as_ref()
    }

    /// Switches screens. The transient menu, info and rules widgets are
    /// rebuilt; settings widgets survive. Entering `Game` starts a fresh
    /// match and falls back to the main menu if it cannot be set up.
    pub fn change_mode(&mut self, target: Mode) {
        self.main_menu = None;
        self.info = None;
        self.rules = None;
        self.game_screen = None;
        if target != Mode::Game {
            self.game = None;
        }

        let viewport = self.config.viewport;
        match target {
            Mode::MainMenu => {
                self.main_menu = Some(MainMenuScreen::build(&self.config.title, &viewport));
            }
            Mode::Settings => {
                if self.settings.is_none() {
                    self.settings = Some(SettingsScreen::build(self.show_fps, &viewport));
                }
            }
            Mode::Info => {
                self.info = Some(PageScreen::build(INFO_TEXT.to_string(), 10.0, &viewport));
            }
            Mode::Rules => {
                let text = rules_text(self.config.rules.max_energy);
                self.rules = Some(PageScreen::build(text, 0.0, &viewport));
            }
            Mode::Game => match Match::new(&self.config, &self.mask) {
                Ok(game) => {
                    self.game = Some(game);
                    self.game_screen = Some(GameScreen::build(&viewport));
                }
                Err(err) => {
                    warn!("Cannot start a match: {}", err);
                    self.change_mode(Mode::MainMenu);
                    return;
                }
            },
        }
        self.mode = target;
        info!("Mode changed to {}", target.label());
    }

    /// Runs one frame of whichever screen is active.
    pub fn tick(&mut self, input: &TickInput) {
        if input.quit_requested() {
            self.running = false;
            return;
        }
        let held = input.primary_held();
        let pointer = input.pointer;

        match self.mode {
            Mode::MainMenu => {
                let Some(menu) = self.main_menu.as_mut() else {
                    return;
                };
                // Every button is polled each frame so all cooldowns advance.
                let play = menu.play.clicked(held, pointer);
                let settings = menu.settings.clicked(held, pointer);
                let info = menu.info.clicked(held, pointer);
                let rules = menu.rules.clicked(held, pointer);
                let exit = menu.exit.clicked(held, pointer);
                if play {
                    self.change_mode(Mode::Game);
                }
                if settings {
                    self.change_mode(Mode::Settings);
                }
                if info {
                    self.change_mode(Mode::Info);
                }
                if rules {
                    self.change_mode(Mode::Rules);
                }
                if exit {
                    self.running = false;
                }
            }
            Mode::Settings => {
                let Some(settings) = self.settings.as_mut() else {
                    return;
                };
                for steps in input.scroll_steps() {
                    settings.help.scroll(steps, SCROLL_SCALE);
                }
                if settings.fps_toggle.clicked(held, pointer) {
                    self.show_fps = !self.show_fps;
                    settings.fps_toggle.label.set_text(fps_toggle_text(self.show_fps));
                }
                if settings.back.clicked(held, pointer) {
                    self.change_mode(Mode::MainMenu);
                }
            }
            Mode::Info => {
                let back = self
                    .info
                    .as_mut()
                    .is_some_and(|page| page.back.clicked(held, pointer));
                if back {
                    self.change_mode(Mode::MainMenu);
                }
            }
            Mode::Rules => {
                let Some(page) = self.rules.as_mut() else {
                    return;
                };
                for steps in input.scroll_steps() {
                    page.text.scroll(steps, SCROLL_SCALE);
                }
                if page.back.clicked(held, pointer) {
                    self.change_mode(Mode::MainMenu);
                }
            }
            Mode::Game => {
                if let Some(game) = self.game.as_mut() {
                    game.tick(input);
                }
                if input.menu_key {
                    self.change_mode(Mode::MainMenu);
                    return;
                }
                let decided = self.game.as_ref().is_some_and(|game| game.outcome().is_decided());
                let menu = decided
                    && self
                        .game_screen
                        .as_mut()
                        .is_some_and(|screen| screen.menu.clicked(held, pointer));
                if menu {
                    self.change_mode(Mode::MainMenu);
                }
            }
        }
    }

    /// Widgets of the active screen, in draw order.
    pub fn widgets(&self) -> Vec<Widget> {
        let widgets = match self.mode {
            Mode::MainMenu => self.main_menu.as_ref().map(MainMenuScreen::widgets),
            Mode::Settings => self.settings.as_ref().map(SettingsScreen::widgets),
            Mode::Info => self.info.as_ref().map(PageScreen::widgets),
            Mode::Rules => self.rules.as_ref().map(PageScreen::widgets),
            Mode::Game => {
                let outcome = self
                    .game
                    .as_ref()
                    .map(|game| game.outcome())
                    .unwrap_or_default();
                self.game_screen.as_ref().map(|screen| screen.widgets(outcome))
            }
        };
        widgets.unwrap_or_default()
    }

    /// Number of widgets currently alive across every screen.
    pub fn widget_count(&self) -> usize {
        let menu = self.main_menu.as_ref().map_or(0, |m| m.widgets().len());
        let settings = self.settings.as_ref().map_or(0, |s| s.widgets().len());
        let info = self.info.as_ref().map_or(0, |p| p.widgets().len());
        let rules = self.rules.as_ref().map_or(0, |p| p.widgets().len());
        menu + settings + info + rules
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            running: self.running,
            show_fps: self.show_fps,
            widgets: self.widgets(),
            game: self.game.as_ref().map(Match::snapshot),
        }
    }
}
