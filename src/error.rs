//! Error types for fanrun.
//!
//! All errors in fanrun are represented by [`FanrunError`], which covers
//! configuration issues, host-list resolution, and output plumbing.
//! Per-host execution failures are deliberately not errors: they are
//! rendered inline and folded into the exit status instead.

use thiserror::Error;

/// All possible errors that can occur in fanrun.
#[derive(Error, Debug)]
pub enum FanrunError {
    /// Could not determine the user's config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// DNS lookup of a round-robin host name failed.
    #[error("Error looking up {name}: {source}")]
    DnsLookup {
        /// The name that failed to resolve.
        name: String,
        /// The underlying resolver error.
        source: std::io::Error,
    },

    /// The output writer was used after it had shut down.
    #[error("Output writer is closed")]
    WriterClosed,

    /// A worker thread panicked during dispatch.
    #[error("Worker thread panicked")]
    WorkerPanic,
}

/// Convenient Result type alias for fanrun operations.
pub type Result<T> = std::result::Result<T, FanrunError>;
