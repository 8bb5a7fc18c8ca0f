//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly: aligned text for humans, stable JSON for scripts. JSON
//! shapes come straight from the core's `Serialize` impls, so `dk … --json`
//! is a stable machine interface.

use serde::Serialize;
use std::io::{self, Write};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a value: JSON straight through, or via the human closure.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        human(value, &mut out)?;
    }
    Ok(())
}

/// Render a plain success message (`{"ok": message}` in JSON mode).
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct Ok<'a> {
        ok: &'a str,
    }
    render(mode, &Ok { ok: message }, |v, w| writeln!(w, "{}", v.ok))
}

/// Render an error to stderr with its machine code, matching the mode.
pub fn render_error(mode: OutputMode, code: &str, message: &str) {
    if mode.is_json() {
        #[derive(Serialize)]
        struct Err<'a> {
            error: &'a str,
            code: &'a str,
        }
        let payload = Err {
            error: message,
            code,
        };
        if let Ok(json) = serde_json::to_string_pretty(&payload) {
            eprintln!("{json}");
        }
    } else {
        eprintln!("error[{code}]: {message}");
    }
}

/// Render a left-aligned key/value line in human output.
pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<10} {}", format!("{key}:"), value.as_ref())
}

#[cfg(test)]
mod tests {
    use super::OutputMode;

    #[test]
    fn mode_predicates() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Human.is_json());
    }
}
