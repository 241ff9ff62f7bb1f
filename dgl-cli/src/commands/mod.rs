//! Interactive commands typed at the prompt instead of a path.
//!
//! Every command accepts an optional leading `:` (`:q`, `:md`).

use crate::mode::Mode;

const EXIT: &[&str] = &["exit", "e", "quit", "q"];
const URL: &[&str] = &["url", "u"];
const MARKDOWN: &[&str] = &["md", "m"];
const BBCODE: &[&str] = &["bbcode", "b"];
const DELETE: &[&str] = &["delete", "del"];
const COUNT: &[&str] = &["count", "gifs"];
const CONFIG: &[&str] = &["config", "details"];
const VERSION: &[&str] = &["version", "v"];
const HELP: &[&str] = &["help", "?"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Switch output mode and re-emit the current record.
    Mode(Mode),
    /// Remove the current record from the cache.
    Delete,
    Count,
    Config,
    Version,
    Help,
}

impl Command {
    /// `None` means the line is not a command and should be treated as a path.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().trim_matches(['"', '\'']);
        let word = input.strip_prefix(':').unwrap_or(input);

        let table: [(&[&str], Command); 9] = [
            (EXIT, Command::Exit),
            (URL, Command::Mode(Mode::Url)),
            (MARKDOWN, Command::Mode(Mode::Markdown)),
            (BBCODE, Command::Mode(Mode::BBCode)),
            (DELETE, Command::Delete),
            (COUNT, Command::Count),
            (CONFIG, Command::Config),
            (VERSION, Command::Version),
            (HELP, Command::Help),
        ];
        table
            .into_iter()
            .find(|(names, _)| names.contains(&word))
            .map(|(_, command)| command)
    }
}

/// Command reference shown by `help`.
pub fn help_output() -> String {
    let entries: [(&[&str], &str); 9] = [
        (URL, "Shift to URL Mode"),
        (MARKDOWN, "Shift to Markdown Mode"),
        (BBCODE, "Shift to BBCode Mode"),
        (DELETE, "Delete Current Gif From Cache"),
        (COUNT, "Database Record Count"),
        (CONFIG, "Loaded Configuration"),
        (VERSION, "Version Details"),
        (EXIT, "Exit Program"),
        (HELP, "Help (This Menu)"),
    ];

    let mut output = String::from("Supported Commands:\n");
    for (names, description) in entries {
        output.push_str(&format!(" {} - {description}\n", names.join(", ")));
    }
    output
}
