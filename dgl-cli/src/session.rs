//! The interactive loop: read a line, run a command or link a gif, repeat.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tabled::{settings::Style, Table, Tabled};

use dgl_core::{Config, ConfigProvider, ShareRecord};
use dgl_remote::LinkService;
use dgl_store::LivenessProbe;
use dgl_sync::{Outcome, Reconciler};

use crate::clipboard::Clipboard;
use crate::commands::{help_output, Command};
use crate::messages;
use crate::mode::Mode;

enum Flow {
    Continue,
    Exit,
}

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "setting")]
    setting: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

pub struct Session<L: LinkService, P: LivenessProbe, C: Clipboard> {
    reconciler: Reconciler<L, P>,
    clipboard: C,
    mode: Mode,
    config: Config,
}

impl<L: LinkService, P: LivenessProbe, C: Clipboard> Session<L, P, C> {
    pub fn new(reconciler: Reconciler<L, P>, clipboard: C, mode: Mode, config: Config) -> Self {
        Self {
            reconciler,
            clipboard,
            mode,
            config,
        }
    }

    /// Process `input` line by line until an exit command or end of input.
    ///
    /// Only fatal reconciliation failures (rejected credentials, broken
    /// configuration) and output errors end the loop with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", messages::welcome())?;

        let mut lines = input.lines();
        loop {
            writeln!(out, "{}", messages::awaiting_input(self.mode))?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out, "{}", messages::goodbye())?;
                return Ok(());
            };
            let line = line.context("failed to read input")?;
            if line.trim().is_empty() {
                continue;
            }

            let flow = match Command::parse(&line) {
                Some(command) => self.dispatch(command, out)?,
                None => self.link(&line, out)?,
            };
            if let Flow::Exit = flow {
                return Ok(());
            }
        }
    }

    fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Exit => {
                writeln!(out, "{}", messages::goodbye())?;
                return Ok(Flow::Exit);
            }
            Command::Mode(mode) => {
                self.mode = mode;
                writeln!(out, "{}", messages::mode_shift(mode))?;
                if let Some(record) = self.reconciler.current().cloned() {
                    self.emit(&record, out)?;
                }
            }
            Command::Delete => match self.reconciler.delete_current() {
                Ok(record) => writeln!(out, "{}", messages::info(format!("deleted {record}")))?,
                Err(err) => writeln!(out, "{}", messages::error(err))?,
            },
            Command::Count => match self.reconciler.count() {
                Ok(count) => writeln!(
                    out,
                    "{}",
                    messages::info(format!("{} total", messages::with_commas(count)))
                )?,
                Err(err) => writeln!(out, "{}", messages::error(err))?,
            },
            Command::Config => self.print_config(out)?,
            Command::Version => writeln!(
                out,
                "{}",
                messages::info(format!("dgl {}", env!("CARGO_PKG_VERSION")))
            )?,
            Command::Help => writeln!(
                out,
                "{}",
                messages::info(format!(
                    "Usage: Drag and drop a single gif at a time.\n\n{}",
                    help_output()
                ))
            )?,
        }
        Ok(Flow::Continue)
    }

    fn link<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match self.reconciler.reconcile(line) {
            Ok(done) => {
                if done.outcome == Outcome::Created {
                    tracing::info!(fingerprint = %done.record.fingerprint, "new share created");
                }
                self.emit(&done.record, out)?;
            }
            Err(err) if err.is_fatal() => {
                writeln!(out, "{}", messages::error(&err))?;
                return Err(err).context("cannot continue without valid dropbox credentials");
            }
            Err(err) => writeln!(out, "{}", messages::error(err))?,
        }
        Ok(Flow::Continue)
    }

    /// Print the record and its snippet, then copy the snippet.
    fn emit<W: Write>(&mut self, record: &ShareRecord, out: &mut W) -> Result<()> {
        let snippet = self.mode.render(record);
        writeln!(out, "{}", messages::link_text(record))?;
        writeln!(out, "{}", messages::link_text(&snippet))?;
        if let Err(err) = self.clipboard.write(&snippet) {
            tracing::warn!(error = %err, "clipboard write failed");
            writeln!(out, "{}", messages::error(format!("could not copy to clipboard: {err:#}")))?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn print_config<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let count = match self.reconciler.count() {
            Ok(count) => messages::with_commas(count),
            Err(err) => format!("unavailable ({err})"),
        };
        let rows = vec![
            ConfigRow {
                setting: "Path",
                value: self
                    .config
                    .loaded_from()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            },
            ConfigRow {
                setting: "Gifs Path",
                value: self.config.full_path().display().to_string(),
            },
            ConfigRow {
                setting: "Db Path",
                value: self.config.database_path().display().to_string(),
            },
            ConfigRow {
                setting: "Db Gifs",
                value: count,
            },
            ConfigRow {
                setting: "Token",
                value: messages::mask_token(self.config.token()),
            },
        ];
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        writeln!(out, "Current Config:\n{table}")?;
        Ok(())
    }
}
