//! # Fanrun
//!
//! Run one shell command on many remote hosts at the same time.
//!
//! Fanrun fans a command out over an `ssh`-like subprocess, one invocation
//! per host, with a bounded worker pool. Results come back either as one
//! block per host once that host finishes (the default), or as live
//! interleaved lines tagged with their host (`-i`).
//!
//! ## Quick Example
//!
//! ```bash
//! # One block per host, fastest host first
//! fanrun --hosts web1,web2,web3 uptime
//!
//! # Live interleaved lines, each tagged [host] in a rotating color
//! cat hosts.txt | fanrun -i tail -f /var/log/app.log
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into these modules:
//!
//! - [`dispatch`]: the worker pool, output fan-in, and completion tracking
//! - [`remote`]: buffered and streaming subprocess execution adapters
//! - [`linewriter`]: the serialized line sink used in interleaved mode
//! - [`render`]: block and line formatting with prefix and host tags
//! - [`color`]: ANSI decoration and the per-host color rotation
//! - [`hostlist`]: host acquisition from flags, DNS, or stdin
//! - [`cli`]: command-line argument parsing with clap
//! - [`config`]: TOML configuration for defaults
//! - [`loader`]: config file discovery and loading
//! - [`error`]: error types

pub mod cli;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hostlist;
pub mod linewriter;
pub mod loader;
pub mod remote;
pub mod render;

pub use config::Config;
pub use dispatch::{Block, Schedule};
pub use error::{FanrunError, Result};
pub use linewriter::{LineSink, LineWriter};
pub use remote::RemoteCommand;
pub use render::Style;
