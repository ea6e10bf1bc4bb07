//! Text rendering of view models for the terminal.
//!
//! Every function returns a `String` so the caller decides where it goes.
use std::fmt::Write as _;

use client_frontend_core::{GameView, LeaderboardRow, MessageEntry, MessageLevel};
use console::style;
use game_core::{NumberBoard, RoundPhase};

use crate::config::UiConfig;

pub fn render_view(view: &GameView, ui: &UiConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", style(format!("=== Round {} ===", view.round_id)).bold().green());
    let account = match (&view.address, view.is_admin) {
        (Some(address), true) => format!("{address} {}", style("(admin)").magenta()),
        (Some(address), false) => address.clone(),
        (None, _) => style("not connected").dim().to_string(),
    };
    let _ = writeln!(out, "{} {}", style("Account:").bold().cyan(), account);

    let phase = match view.phase {
        RoundPhase::Open { .. } => style(view.phase_label()).green(),
        RoundPhase::Ended => style(view.phase_label()).yellow(),
        RoundPhase::Inactive => style(view.phase_label()).red(),
    };
    let _ = writeln!(out, "{} {}", style("Phase:").bold().cyan(), phase);
    let _ = writeln!(out, "{} {}", style("Block:").bold().cyan(), view.block_height);
    let _ = writeln!(out, "{} {}", style("Pool:").bold().cyan(), view.pool);
    let _ = writeln!(
        out,
        "{} {} / {}",
        style("Guesses:").bold().cyan(),
        view.guess_count,
        view.max_guesses
    );

    let _ = writeln!(out);
    out.push_str(&render_board(view, ui.board_columns));
    out
}

/// Number grid; taken numbers are shown as `--`.
pub fn render_board(view: &GameView, columns: usize) -> String {
    let size = (view.available_numbers.len() + view.taken_numbers.len()) as u32;
    let size = size.min(NumberBoard::MAX_SIZE);
    let width = size.to_string().len().max(2);
    let columns = columns.max(1);

    let mut out = String::new();
    for (index, number) in (1..=size).enumerate() {
        let cell = if view.taken_numbers.contains(&number) {
            style(format!("{:>width$}", "--")).dim().to_string()
        } else {
            format!("{number:>width$}")
        };
        out.push_str(&cell);
        out.push(if (index + 1) % columns == 0 { '\n' } else { ' ' });
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} available, {} taken",
        view.available_numbers.len(),
        view.taken_numbers.len()
    );
    out
}

pub fn render_leaderboard(rows: &[LeaderboardRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("=== Leaderboard ===").bold().green());
    if rows.is_empty() {
        let _ = writeln!(out, "{}", style("No guesses yet").dim());
        return out;
    }

    let _ = writeln!(
        out,
        "{}",
        style(format!("{:>4}  {:<17}  {:>7}  {:>4}", "#", "Address", "Guesses", "Wins")).bold()
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<17}  {:>7}  {:>4}",
            row.rank, row.address, row.guesses, row.wins
        );
    }
    out
}

pub fn render_message(entry: &MessageEntry) -> String {
    let text = match entry.level {
        MessageLevel::Info => style(entry.text.as_str()).dim(),
        MessageLevel::Success => style(entry.text.as_str()).green(),
        MessageLevel::Error => style(entry.text.as_str()).red().bold(),
    };
    match entry.block_height {
        Some(height) => format!("[{height}] {text}"),
        None => text.to_string(),
    }
}
