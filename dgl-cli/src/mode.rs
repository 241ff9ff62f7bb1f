//! Output modes: which snippet is printed and copied for a record.

use std::fmt;

use clap::ValueEnum;

use dgl_core::ShareRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Plain public URL.
    #[default]
    Url,
    /// `![name](url)`
    #[value(name = "md", alias = "markdown")]
    Markdown,
    /// `[img]url[/img]`
    #[value(name = "bbcode")]
    BBCode,
}

impl Mode {
    pub fn render(self, record: &ShareRecord) -> String {
        match self {
            Mode::Url => record.url(),
            Mode::Markdown => record.markdown(),
            Mode::BBCode => record.bbcode(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Url => "url",
            Mode::Markdown => "md",
            Mode::BBCode => "bbcode",
        };
        f.write_str(label)
    }
}
