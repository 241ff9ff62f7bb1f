//! Clipboard writes through the platform's copy utility.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

pub trait Clipboard {
    fn write(&mut self, text: &str) -> Result<()>;
}

type Candidate = (&'static str, &'static [&'static str]);

#[cfg(target_os = "macos")]
const CANDIDATES: &[Candidate] = &[("pbcopy", &[])];

#[cfg(windows)]
const CANDIDATES: &[Candidate] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", windows)))]
const CANDIDATES: &[Candidate] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Pipes text into the first available copy command.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    candidates: &'static [Candidate],
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            candidates: CANDIDATES,
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        for (program, args) in self.candidates {
            let spawned = Command::new(program)
                .args(args.iter())
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let mut child = match spawned {
                Ok(child) => child,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e).with_context(|| format!("failed to start {program}")),
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(text.as_bytes())
                    .with_context(|| format!("failed to write to {program}"))?;
            }
            let status = child
                .wait()
                .with_context(|| format!("failed to wait for {program}"))?;
            if status.success() {
                tracing::debug!(program, "copied to clipboard");
                return Ok(());
            }
            tracing::debug!(program, %status, "clipboard command failed");
        }
        bail!("no working clipboard command found")
    }
}

/// Remembers everything written.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Vec<String>,
}

#[cfg(test)]
impl Clipboard for MemoryClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        self.contents.push(text.to_string());
        Ok(())
    }
}
