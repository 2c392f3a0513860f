//! Colorized match pulse logging for quick scanning of the log file.

use bevy_ecs::prelude::*;
use colored::{Color, Colorize};
use tracing::info;

use crate::simulation::{
    Factions, GameEvent, GameEventLog, MatchClock, MatchOutcome, Sentiment,
};

fn badge(label: &str, color: Color) -> String {
    format!("[{}]", label).color(color).to_string()
}

fn category_color(category: &str) -> Color {
    match category {
        "Match" => Color::BrightWhite,
        "Select" => Color::BrightBlack,
        "Expand" => Color::BrightGreen,
        "Attack" => Color::BrightRed,
        "Capture" => Color::Red,
        "Origin" => Color::BrightMagenta,
        "Regen" => Color::BrightCyan,
        "Outcome" => Color::BrightYellow,
        _ => Color::White,
    }
}

pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Gain",
        Sentiment::Neutral => "Calm",
        Sentiment::Negative => "Loss",
    }
}

pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::BrightGreen,
        Sentiment::Neutral => Color::White,
        Sentiment::Negative => Color::BrightRed,
    }
}

pub fn format_event_line(event: &GameEvent) -> String {
    let category_badge = badge(event.category(), category_color(event.category()));
    let sentiment_badge = badge(
        sentiment_label(event.sentiment()),
        sentiment_color(event.sentiment()),
    );
    let tick_badge = badge(&format!("Tick {}", event.tick), Color::BrightBlack);
    let headline = match event.faction() {
        Some(faction) => event
            .headline()
            .color(faction.logging_color())
            .bold()
            .to_string(),
        None => event.headline().bold().to_string(),
    };
    format!(
        "{} {} {} {}",
        category_badge, sentiment_badge, tick_badge, headline
    )
}

/// Emits every event recorded since the previous tick, preceded by a header
/// line with the roster sizes.
pub fn logging_system(
    clock: Res<MatchClock>,
    outcome: Res<MatchOutcome>,
    factions: Res<Factions>,
    mut event_log: ResMut<GameEventLog>,
) {
    let from = event_log.reported;
    let lines: Vec<String> = event_log.since(from).map(format_event_line).collect();
    let next = event_log.next_seq();
    event_log.reported = next;
    if lines.is_empty() {
        return;
    }

    let header_line = format!(
        "{} {} {} {} {}",
        badge("Match", Color::BrightWhite),
        badge(&format!("Tick {}", clock.elapsed), Color::BrightBlack),
        badge(
            &format!("Player {}", factions.player.owned_count()),
            Color::Blue
        ),
        badge(&format!("Bot {}", factions.enemy.owned_count()), Color::Red),
        badge(&format!("{:?}", *outcome), Color::BrightYellow),
    );

    let mut output = vec![header_line];
    output.extend(lines);
    info!("\n{}", output.join("\n"));
}
