// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! 256-color ANSI helpers for the text view.

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use runboard_core::{ColorMode, RunState};
use std::io::IsTerminal;

pub mod codes {
    /// Run titles and headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Metric values: light grey
    pub const LITERAL: u8 = 250;
    /// Context (projects, paths): medium grey
    pub const CONTEXT: u8 = 245;
    /// Muted / secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// Live and finished runs
    pub const GOOD: u8 = 114;
    /// Booting runs
    pub const BUSY: u8 = 179;
    /// Failed runs
    pub const BAD: u8 = 167;
}

/// Determine if color output should be enabled.
///
/// Priority: `--no-color` → config mode → `NO_COLOR=1` → TTY check.
pub fn enabled(mode: ColorMode, no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            if std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty()) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

/// Build clap `Styles` using the project palette.
pub fn clap_styles() -> Styles {
    Styles::styled()
        .usage(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

const RESET: &str = "\x1b[0m";

/// Wrap `text` in a 256-color escape when color is on.
pub fn paint(enabled: bool, code: u8, text: &str) -> String {
    if enabled {
        format!("\x1b[38;5;{code}m{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Palette code for a run state.
pub fn state_code(state: RunState) -> u8 {
    match state {
        RunState::Live | RunState::Finished => codes::GOOD,
        RunState::New | RunState::Booting => codes::BUSY,
        RunState::Failed => codes::BAD,
        RunState::Closed => codes::MUTED,
    }
}
