//! Fanrun CLI entry point.
//!
//! This binary provides the `fanrun` command for running one shell command
//! on many hosts concurrently over ssh.

use clap::Parser;
use fanrun::cli::Cli;
use fanrun::color::ColorCycle;
use fanrun::config::{Config, DEFAULT_PARALLEL};
use fanrun::dispatch::{self, Block, Schedule};
use fanrun::error::Result;
use fanrun::linewriter::LineWriter;
use fanrun::remote::RemoteCommand;
use fanrun::render::Style;
use fanrun::{hostlist, loader};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(failed) => {
            if failed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Set up stderr logging; `-v` raises the level to debug.
fn init_tracing(verbose: bool) {
    let default = if verbose { "fanrun=debug" } else { "fanrun=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main application logic.
///
/// Returns whether any host failed, which becomes the process exit status.
fn run(cli: Cli) -> Result<bool> {
    if cli.command.is_empty() {
        println!("usage: fanrun <command>");
        return Ok(false);
    }

    let config = loader::load_default_config()?;
    let command = cli.command_string();

    let hosts = match gather_hosts(&cli)? {
        Some(hosts) => hosts,
        // Interactive stdin with no host flags: usage was printed, no work.
        None => return Ok(false),
    };
    if hosts.is_empty() {
        return Ok(false);
    }

    let schedule = schedule(&cli, &config);
    tracing::info!(
        command = %command,
        hosts = hosts.len(),
        schedule = ?schedule,
        "dispatching"
    );

    let style = Style {
        prefix: cli
            .prefix
            .clone()
            .or_else(|| config.defaults.prefix.clone())
            .unwrap_or_default(),
        color: atty::is(atty::Stream::Stdout),
        quiet: cli.quiet || config.defaults.quiet,
    };
    let remote = RemoteCommand::new(
        config.remote.program.as_deref().unwrap_or("ssh"),
        config.remote.args.clone(),
    );

    if cli.interleave || config.defaults.interleave {
        run_interleaved(&hosts, schedule, &command, &remote, &style)
    } else {
        run_blocks(&hosts, schedule, &command, &remote, &style)
    }
}

/// Pick the scheduling shape: `-m` selects the sequential-groups variant,
/// otherwise a worker pool of the configured parallelism.
fn schedule(cli: &Cli, config: &Config) -> Schedule {
    if let Some(group) = cli.group {
        return Schedule::Batch(group);
    }
    let parallel = cli
        .parallel
        .or(config.defaults.parallel)
        .unwrap_or(DEFAULT_PARALLEL);
    Schedule::Pool(parallel)
}

/// Collect the host list from flags, DNS, or piped stdin.
///
/// Returns `None` when stdin is an interactive terminal and no host flag
/// was given; usage has been printed and there is no work to do.
fn gather_hosts(cli: &Cli) -> Result<Option<Vec<String>>> {
    if let Some(ref csv) = cli.hosts {
        return Ok(Some(hostlist::parse_csv(csv)));
    }
    if let Some(ref name) = cli.dns {
        return Ok(Some(hostlist::resolve_dns(name)?));
    }
    if hostlist::stdin_is_tty() {
        println!("usage: you must pipe a list of hosts into fanrun or use --hosts.");
        return Ok(None);
    }
    Ok(Some(hostlist::read_hosts(std::io::stdin().lock())))
}

/// Buffered mode: one contiguous block per host, completion order.
fn run_blocks(
    hosts: &[String],
    schedule: Schedule,
    command: &str,
    remote: &RemoteCommand,
    style: &Style,
) -> Result<bool> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    dispatch::run_buffered(hosts, schedule, &mut out, |host| {
        let outcome = remote.run_buffered(host, command);
        match outcome.error {
            None => {
                tracing::debug!(host, "completed");
                Block {
                    text: style.success_block(host, command, &outcome.output),
                    failed: false,
                }
            }
            Some(detail) => {
                tracing::debug!(host, error = %detail, "remote execution failed");
                Block {
                    text: style.failure_block(host, command, &detail, &outcome.output),
                    failed: true,
                }
            }
        }
    })
}

/// Interleaved mode: lines stream through one serialized writer as they
/// are produced, each tagged with its host in a rotating color.
fn run_interleaved(
    hosts: &[String],
    schedule: Schedule,
    command: &str,
    remote: &RemoteCommand,
    style: &Style,
) -> Result<bool> {
    let writer = LineWriter::new(std::io::stdout());
    let sink = writer.sink();
    let cycle = ColorCycle::new();

    let failed = dispatch::run_streaming(hosts, schedule, |host| {
        let tag = style.line_tag(host, cycle.next());
        match remote.run_streaming(host, command, &sink, &tag) {
            None => {
                tracing::debug!(host, "completed");
                true
            }
            Some(detail) => {
                tracing::warn!(host, error = %detail, "remote execution failed");
                false
            }
        }
    })?;

    // All producers are gone once dispatch returns; close drains the queue
    // and joins the consumer before the exit status is reported.
    drop(sink);
    writer.close()?;
    Ok(failed)
}
