//! Cleaning of raw input lines.
//!
//! Terminals paste dragged files in several shapes: shell-escaped
//! (`/a/file\ name.gif`), quoted, or with trailing whitespace. [`clean`]
//! normalises them to a plain path and rejects anything that is not a single gif.

use std::path::PathBuf;

use crate::error::InputError;

const GIF_SUFFIX: &str = ".gif";

/// Normalise one input line into a gif path.
pub fn clean(raw: &str) -> Result<PathBuf, InputError> {
    let mut clean = raw.trim().to_string();
    if !cfg!(windows) {
        clean = clean.replace('\\', "");
    }
    if is_wrapped(&clean, '\'') || is_wrapped(&clean, '"') {
        clean = clean[1..clean.len() - 1].to_string();
    }

    let lower = clean.to_lowercase();
    if lower.matches(GIF_SUFFIX).count() > 1 {
        return Err(InputError::MultipleGifs(clean));
    }
    if !lower.ends_with(GIF_SUFFIX) {
        return Err(InputError::NotAGif(clean));
    }
    Ok(PathBuf::from(clean))
}

fn is_wrapped(data: &str, quote: char) -> bool {
    data.len() >= 2 && data.starts_with(quote) && data.ends_with(quote)
}
