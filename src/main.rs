use std::fs::File;
use std::io::{self, stdout};
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::*};
use tokio::sync::Notify;
use tracing::{info, warn};

mod ui;

use root_wars::simulation::{
    DEFAULT_MAP, GameConfig, GameSession, InputEvent, Mask, Mode, PointerButton, ScreenPos,
    SessionSnapshot, TickInput,
};
use ui::PixelMap;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StartMode {
    Menu,
    Settings,
    Info,
    Rules,
    Game,
}

impl From<StartMode> for Mode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Menu => Mode::MainMenu,
            StartMode::Settings => Mode::Settings,
            StartMode::Info => Mode::Info,
            StartMode::Rules => Mode::Rules,
            StartMode::Game => Mode::Game,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Root Wars: grow your root, take the bot's", long_about = None)]
struct Cli {
    /// Frames (and game ticks) per second.
    #[arg(long, default_value_t = 60)]
    max_fps: u32,
    /// Screen to open on.
    #[arg(long, value_enum, default_value_t = StartMode::Menu)]
    mode: StartMode,
    /// PNG or BMP map; opaque black pixels are playable. Uses the built-in
    /// map when omitted.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Seed for the bot's choices.
    #[arg(long)]
    seed: Option<u64>,
    /// Where the event log goes while the terminal UI is up.
    #[arg(long, default_value = "root_wars.log")]
    log_file: PathBuf,
    /// Run this many ticks without a terminal, then print the snapshot as JSON.
    #[arg(long)]
    headless_ticks: Option<u64>,
}

/// Input gathered by the terminal loop between two simulation ticks.
#[derive(Debug, Default)]
struct InputCollector {
    held: [bool; 3],
    /// Buttons pressed since the last tick; a press released before the tick
    /// still reads as held for that tick.
    pressed: [bool; 3],
    pointer: ScreenPos,
    pending: Vec<InputEvent>,
    menu_key: bool,
}

impl InputCollector {
    fn take(&mut self) -> TickInput {
        let held = std::array::from_fn(|i| self.held[i] || self.pressed[i]);
        self.pressed = [false; 3];
        TickInput {
            held,
            pointer: self.pointer,
            events: std::mem::take(&mut self.pending),
            menu_key: std::mem::take(&mut self.menu_key),
        }
    }

    fn press(&mut self, button: PointerButton) {
        let index = button_index(button);
        self.held[index] = true;
        self.pressed[index] = true;
        self.pending.push(InputEvent::Press(button));
    }

    fn release(&mut self, button: PointerButton) {
        self.held[button_index(button)] = false;
        self.pending.push(InputEvent::Release(button));
    }
}

fn button_index(button: PointerButton) -> usize {
    match button {
        PointerButton::Primary => 0,
        PointerButton::Secondary => 1,
        PointerButton::Middle => 2,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mask = match &cli.map {
        Some(path) => Mask::load(path).with_context(|| format!("loading map {}", path.display()))?,
        None => Mask::from_ascii(DEFAULT_MAP),
    };
    let config = GameConfig {
        max_fps: cli.max_fps.max(1),
        initial_mode: cli.mode.into(),
        bot_seed: cli.seed,
        ..Default::default()
    };
    info!(
        "Starting Root Wars at {} fps on a {}x{} map",
        config.max_fps,
        mask.columns(),
        mask.rows()
    );

    if let Some(ticks) = cli.headless_ticks {
        return run_headless(config, mask, ticks);
    }
    run_terminal(config, mask).await
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if cli.headless_ticks.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        let file = File::create(&cli.log_file)
            .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn run_headless(config: GameConfig, mask: Mask, ticks: u64) -> anyhow::Result<()> {
    let idle = TickInput::resting(&config.viewport);
    let mut session = GameSession::new(config, mask);
    for _ in 0..ticks {
        if !session.is_running() {
            break;
        }
        session.tick(&idle);
    }
    let snapshot = session.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn run_terminal(config: GameConfig, mask: Mask) -> anyhow::Result<()> {
    let viewport = config.viewport;
    let tick_duration = Duration::from_secs_f64(1.0 / config.max_fps as f64);

    let input = Arc::new(Mutex::new(InputCollector::default()));
    let observer: Arc<RwLock<Option<SessionSnapshot>>> = Arc::new(RwLock::new(None));
    let shutdown_notify = Arc::new(Notify::new());

    let mut session = GameSession::new(config, mask);
    let input_for_simulation = input.clone();
    let observer_for_simulation = observer.clone();
    let notify_for_simulation = shutdown_notify.clone();
    let simulation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_duration);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let tick_input = match input_for_simulation.lock() {
                        Ok(mut collector) => collector.take(),
                        Err(_) => break,
                    };
                    session.tick(&tick_input);
                    if let Ok(mut slot) = observer_for_simulation.write() {
                        *slot = Some(session.snapshot());
                    }
                    if !session.is_running() {
                        notify_for_simulation.notify_waiters();
                        break;
                    }
                },
                _ = notify_for_simulation.notified() => break,
            }
        }
    });
    let ctrlc_notify = shutdown_notify.clone();
    let ctrl_c_task = tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        ctrlc_notify.notify_waiters();
    });

    let mut terminal = init_terminal()?;
    let mut term_guard = TerminalGuard::new();
    panic::set_hook(Box::new(|info| {
        let _ = restore_terminal();
        eprintln!("panic: {info}");
    }));

    let mut pixel_map = PixelMap {
        area: terminal.size()?,
        viewport,
    };
    let mut frames = 0u32;
    let mut fps_window = Instant::now();
    let mut fps = None;

    loop {
        if simulation_task.is_finished() || ctrl_c_task.is_finished() {
            break;
        }

        let snapshot = observer.read().ok().and_then(|slot| slot.clone());
        if let Some(snapshot) = snapshot.as_ref() {
            terminal.draw(|frame| {
                pixel_map = ui::render(frame, snapshot, viewport, fps);
            })?;
            frames += 1;
        }
        let elapsed = fps_window.elapsed();
        if elapsed >= Duration::from_secs(1) {
            fps = Some(frames as f64 / elapsed.as_secs_f64());
            frames = 0;
            fps_window = Instant::now();
        }

        if !event::poll(tick_duration)? {
            continue;
        }
        let Ok(mut collector) = input.lock() else {
            warn!("Input collector lock is poisoned");
            break;
        };
        match event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Esc => collector.menu_key = true,
                KeyCode::Char('q') => collector.pending.push(InputEvent::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    collector.pending.push(InputEvent::Quit)
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                collector.pointer = pixel_map.to_pixel(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(button) => collector.press(pointer_button(button)),
                    MouseEventKind::Up(button) => collector.release(pointer_button(button)),
                    MouseEventKind::ScrollUp => collector.pending.push(InputEvent::Scroll(1)),
                    MouseEventKind::ScrollDown => collector.pending.push(InputEvent::Scroll(-1)),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // Leaves a permit behind in case the simulation task is between polls.
    shutdown_notify.notify_one();
    simulation_task.await?;
    restore_terminal()?;
    term_guard.disarm();
    info!("Root Wars closed");

    Ok(())
}

fn init_terminal() -> io::Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout()
        .execute(EnterAlternateScreen)?
        .execute(event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout()
        .execute(LeaveAlternateScreen)?
        .execute(event::DisableMouseCapture)?;
    Ok(())
}

/// Ensures terminal is restored on panic/early-return.
struct TerminalGuard {
    armed: bool,
}

impl TerminalGuard {
    fn new() -> Self {
        Self { armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = restore_terminal();
        }
    }
}
