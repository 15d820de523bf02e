//! Output decoration for blocks and interleaved lines.
//!
//! Buffered mode renders one block per host once its execution finishes;
//! interleaved mode tags every line with its host. Both honor the
//! operator-supplied prefix and only emit ANSI colors when stdout is a
//! terminal.
//!
//! # Block Format
//!
//! ```text
//! <prefix>[<host>]$ <command>
//! <combined output>
//! ```
//!
//! On failure the first line carries the error detail instead:
//!
//! ```text
//! <prefix>[<host>]$ <command>: Error: <detail>
//! <partial output, if any>
//! ```

use crate::color::{colorize, GREEN, RED};

/// Rendering settings shared by all hosts in a run.
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Prefix prepended to every block header and tagged line.
    pub prefix: String,
    /// Whether ANSI color codes are emitted at all.
    pub color: bool,
    /// Suppress `[host]` tags on interleaved lines.
    pub quiet: bool,
}

impl Style {
    /// Render the block for a host whose command succeeded.
    pub fn success_block(&self, host: &str, command: &str, output: &[u8]) -> Vec<u8> {
        let mut block = format!(
            "{}[{}]$ {}\n",
            self.prefix,
            colorize(host, GREEN, true, self.color),
            command
        )
        .into_bytes();
        block.extend_from_slice(output);
        block
    }

    /// Render the block for a host whose command failed.
    ///
    /// Partial output captured before the failure is appended after the
    /// error line so nothing the host produced is lost.
    pub fn failure_block(&self, host: &str, command: &str, detail: &str, partial: &[u8]) -> Vec<u8> {
        let mut block = format!(
            "{}[{}]$ {}: Error: {}\n",
            self.prefix,
            colorize(host, RED, true, self.color),
            command,
            detail
        )
        .into_bytes();
        block.extend_from_slice(partial);
        block
    }

    /// Build the per-line tag for a host in interleaved mode.
    ///
    /// `code` is the host's assigned rotation color. In quiet mode the
    /// `[host]` decoration is dropped entirely and only the prefix remains.
    pub fn line_tag(&self, host: &str, code: u8) -> String {
        if self.quiet {
            return self.prefix.clone();
        }
        format!("{}[{}] ", self.prefix, colorize(host, code, true, self.color))
    }
}
