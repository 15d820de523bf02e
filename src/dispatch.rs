//! Concurrent dispatch of one command across many hosts.
//!
//! The dispatcher owns a bounded pool of worker threads pulling hosts from a
//! shared queue, runs the per-host execution closure, and coordinates
//! completion: a run is done only once every worker has finished and all
//! output has been drained. A single shared failure flag, set by any worker
//! whose host failed, decides the process exit status afterwards.
//!
//! # Scheduling
//!
//! Two mutually exclusive shapes exist, tagged by [`Schedule`]:
//!
//! - [`Schedule::Pool`] (default): at most P workers pull from the shared
//!   queue, so concurrently open remote-execution handles never exceed
//!   min(P, N) regardless of host count.
//! - [`Schedule::Batch`]: hosts are partitioned into sequential groups of at
//!   most M; each group runs fully concurrent and the next group only starts
//!   after the previous one has finished. Burstier, but occasionally wanted
//!   when group boundaries matter.
//!
//! # Buffered Output
//!
//! In buffered mode every worker produces one [`Block`] per host once that
//! host's execution completes. Blocks travel over a bounded channel to
//! exactly one consumer (the calling thread), which writes each block in a
//! single write so blocks never interleave. Arrival order is completion
//! order, not host-list order: fast hosts print first.

use crate::error::{FanrunError, Result};
use crossbeam::channel::bounded;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

/// How hosts are assigned to concurrent executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Worker pool of at most this many threads sharing one queue.
    Pool(usize),
    /// Sequential groups of at most this many fully-concurrent hosts.
    Batch(usize),
}

/// One host's rendered output, sent from a worker to the drain loop.
#[derive(Debug)]
pub struct Block {
    /// The complete rendered block, written to the output in one piece.
    pub text: Vec<u8>,
    /// Whether this host's execution failed.
    pub failed: bool,
}

/// Clamp a configured concurrency degree to something usable.
///
/// Zero (or a misconfigured value) becomes 1; anything beyond the host
/// count is capped so no idle workers are spawned.
fn effective_width(requested: usize, hosts: usize) -> usize {
    requested.max(1).min(hosts)
}

/// Run `make_block` for every host, draining rendered blocks to `out`.
///
/// Returns whether any host failed. An empty host list is a no-op reporting
/// success. Each host is processed exactly once; one host's failure never
/// skips or aborts the others.
pub fn run_buffered<W, F>(hosts: &[String], schedule: Schedule, out: &mut W, make_block: F) -> Result<bool>
where
    W: Write,
    F: Fn(&str) -> Block + Sync,
{
    if hosts.is_empty() {
        return Ok(false);
    }
    match schedule {
        Schedule::Pool(p) => pool_buffered(hosts, p, out, &make_block),
        Schedule::Batch(m) => batch_buffered(hosts, m, out, &make_block),
    }
}

/// Run `execute` for every host in streaming mode.
///
/// `execute` returns whether the host succeeded; output is the closure's
/// business (it streams through a [`crate::linewriter::LineSink`]). Returns
/// whether any host failed.
pub fn run_streaming<F>(hosts: &[String], schedule: Schedule, execute: F) -> Result<bool>
where
    F: Fn(&str) -> bool + Sync,
{
    if hosts.is_empty() {
        return Ok(false);
    }
    match schedule {
        Schedule::Pool(p) => pool_streaming(hosts, p, &execute),
        Schedule::Batch(m) => batch_streaming(hosts, m, &execute),
    }
}

fn pool_buffered<W, F>(hosts: &[String], parallel: usize, out: &mut W, make_block: &F) -> Result<bool>
where
    W: Write,
    F: Fn(&str) -> Block + Sync,
{
    let width = effective_width(parallel, hosts.len());
    let failed = AtomicBool::new(false);
    let (host_tx, host_rx) = bounded::<&str>(width);
    let (block_tx, block_rx) = bounded::<Block>(width);

    let drained = crossbeam::thread::scope(|s| -> Result<()> {
        for _ in 0..width {
            let host_rx = host_rx.clone();
            let block_tx = block_tx.clone();
            let failed = &failed;
            s.spawn(move |_| {
                for host in host_rx.iter() {
                    let block = make_block(host);
                    if block.failed {
                        failed.store(true, Ordering::Relaxed);
                    }
                    if block_tx.send(block).is_err() {
                        break;
                    }
                }
            });
        }
        // Workers hold the only remaining clones; the channels close once
        // they all finish, which is what ends the drain loop below.
        drop(host_rx);
        drop(block_tx);

        s.spawn(move |_| {
            for host in hosts {
                if host_tx.send(host.as_str()).is_err() {
                    break;
                }
            }
        });

        for block in block_rx.iter() {
            out.write_all(&block.text)?;
        }
        out.flush()?;
        Ok(())
    })
    .map_err(|_| FanrunError::WorkerPanic)?;
    drained?;

    Ok(failed.into_inner())
}

fn batch_buffered<W, F>(hosts: &[String], group: usize, out: &mut W, make_block: &F) -> Result<bool>
where
    W: Write,
    F: Fn(&str) -> Block + Sync,
{
    let group = group.max(1);
    let failed = AtomicBool::new(false);

    for chunk in hosts.chunks(group) {
        let (block_tx, block_rx) = bounded::<Block>(chunk.len());
        let drained = crossbeam::thread::scope(|s| -> Result<()> {
            for host in chunk {
                let block_tx = block_tx.clone();
                let failed = &failed;
                s.spawn(move |_| {
                    let block = make_block(host.as_str());
                    if block.failed {
                        failed.store(true, Ordering::Relaxed);
                    }
                    let _ = block_tx.send(block);
                });
            }
            drop(block_tx);

            for block in block_rx.iter() {
                out.write_all(&block.text)?;
            }
            Ok(())
        })
        .map_err(|_| FanrunError::WorkerPanic)?;
        drained?;
    }
    out.flush()?;

    Ok(failed.into_inner())
}

fn pool_streaming<F>(hosts: &[String], parallel: usize, execute: &F) -> Result<bool>
where
    F: Fn(&str) -> bool + Sync,
{
    let width = effective_width(parallel, hosts.len());
    let failed = AtomicBool::new(false);
    let (host_tx, host_rx) = bounded::<&str>(width);

    crossbeam::thread::scope(|s| {
        for _ in 0..width {
            let host_rx = host_rx.clone();
            let failed = &failed;
            s.spawn(move |_| {
                for host in host_rx.iter() {
                    if !execute(host) {
                        failed.store(true, Ordering::Relaxed);
                    }
                }
            });
        }
        drop(host_rx);

        for host in hosts {
            if host_tx.send(host.as_str()).is_err() {
                break;
            }
        }
        drop(host_tx);
    })
    .map_err(|_| FanrunError::WorkerPanic)?;

    Ok(failed.into_inner())
}

fn batch_streaming<F>(hosts: &[String], group: usize, execute: &F) -> Result<bool>
where
    F: Fn(&str) -> bool + Sync,
{
    let group = group.max(1);
    let failed = AtomicBool::new(false);

    for chunk in hosts.chunks(group) {
        crossbeam::thread::scope(|s| {
            for host in chunk {
                let failed = &failed;
                s.spawn(move |_| {
                    if !execute(host.as_str()) {
                        failed.store(true, Ordering::Relaxed);
                    }
                });
            }
        })
        .map_err(|_| FanrunError::WorkerPanic)?;
    }

    Ok(failed.into_inner())
}
