//! Colored lines printed by the interactive session.

use std::fmt::Display;

use colored::Colorize;

use crate::mode::Mode;

const SPACING: &str = "               ";

fn heart() -> String {
    "♥".red().to_string()
}

fn note() -> String {
    "♪".bright_cyan().to_string()
}

pub fn welcome() -> String {
    format!(
        "{} {} {}",
        heart(),
        "Welcome to Dropbox Gif Linker".bright_cyan(),
        heart()
    )
}

pub fn goodbye() -> String {
    format!("{} {} {}", heart(), "Goodbye".bright_cyan(), heart())
}

pub fn awaiting_input(mode: Mode) -> String {
    format!(
        "{}{SPACING}{} {} {}",
        "Waiting for input...".bright_magenta(),
        note(),
        mode.to_string().bright_cyan(),
        note()
    )
}

pub fn mode_shift(mode: Mode) -> String {
    format!("♪ mode shifted to {mode} ♪").bright_cyan().to_string()
}

pub fn link_text(text: impl Display) -> String {
    text.to_string().bright_green().to_string()
}

pub fn info(text: impl Display) -> String {
    text.to_string().yellow().to_string()
}

pub fn error(err: impl Display) -> String {
    format!("Woops! {err}").red().to_string()
}

/// `1234567` → `1,234,567`
pub fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Keep only the last four characters of a secret.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(8))
}
