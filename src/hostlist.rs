//! Host list acquisition.
//!
//! Hosts come from one of three sources, in order of precedence:
//!
//! 1. An explicit comma-separated list (`--hosts`)
//! 2. DNS resolution of a round-robin name (`-d`)
//! 3. One host per line on piped stdin
//!
//! Hosts are opaque strings; nothing here validates them, they are passed
//! verbatim to the remote-execution subprocess.

use crate::error::{FanrunError, Result};
use std::io::BufRead;
use std::net::ToSocketAddrs;

/// Split a comma-separated host list.
///
/// Entries are trimmed and empty entries are dropped, so trailing commas
/// and stray whitespace are harmless.
///
/// # Examples
///
/// ```
/// use fanrun::hostlist::parse_csv;
///
/// assert_eq!(parse_csv("a, b,,c"), vec!["a", "b", "c"]);
/// ```
pub fn parse_csv(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(String::from)
        .collect()
}

/// Resolve a DNS name to its addresses.
///
/// A round-robin name that resolves to many addresses yields one host per
/// address. Resolution failure is fatal to the run; nothing has been
/// dispatched yet at this point.
///
/// # Errors
///
/// Returns [`FanrunError::DnsLookup`] with the underlying resolver error.
pub fn resolve_dns(name: &str) -> Result<Vec<String>> {
    let addrs = (name, 0).to_socket_addrs().map_err(|e| FanrunError::DnsLookup {
        name: name.to_string(),
        source: e,
    })?;
    Ok(addrs.map(|a| a.ip().to_string()).collect())
}

/// Read hosts line by line from a reader, usually piped stdin.
///
/// Lines are trimmed and blank lines skipped. A read error is reported as a
/// warning and reading stops, but everything read so far is still returned.
pub fn read_hosts<R: BufRead>(reader: R) -> Vec<String> {
    let mut hosts = Vec::new();
    for line in reader.lines() {
        match line {
            Ok(text) => {
                let host = text.trim();
                if !host.is_empty() {
                    hosts.push(host.to_string());
                }
            }
            Err(e) => {
                tracing::warn!("error reading host list: {}", e);
                break;
            }
        }
    }
    hosts
}

/// Whether stdin is an interactive terminal.
///
/// When it is, there is no piped host list to read; the caller prints usage
/// instead of blocking on a terminal that will never deliver hosts.
pub fn stdin_is_tty() -> bool {
    atty::is(atty::Stream::Stdin)
}
