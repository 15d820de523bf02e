//! Remote command execution via an ssh-like subprocess.
//!
//! One subprocess is spawned per host as `<program> <args…> <host>
//! <command>`. The program defaults to `ssh` and can be overridden in the
//! config, which also makes the adapters testable with a plain shell.
//!
//! Two adapters cover the two output modes:
//!
//! - [`RemoteCommand::run_buffered`] blocks until the process exits and
//!   returns its combined output in one piece.
//! - [`RemoteCommand::run_streaming`] forwards output line by line to a
//!   [`LineSink`] as it is produced, and reports the outcome only after the
//!   process has exited and both streams are fully drained.

use crate::linewriter::LineSink;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};

/// The remote-execution subprocess invoked once per host.
#[derive(Debug, Clone)]
pub struct RemoteCommand {
    program: String,
    args: Vec<String>,
}

/// Result of a buffered execution on one host.
#[derive(Debug)]
pub struct BufferedOutcome {
    /// Combined stdout and stderr captured from the process.
    pub output: Vec<u8>,
    /// Error detail if the execution failed, `None` on success.
    pub error: Option<String>,
}

impl Default for RemoteCommand {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            args: Vec::new(),
        }
    }
}

impl RemoteCommand {
    /// Create an adapter for the given program and leading arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, host: &str, command: &str) -> Command {
        let mut c = Command::new(&self.program);
        c.args(&self.args).arg(host).arg(command);
        c
    }

    /// Run the command on `host` and capture all output.
    ///
    /// Spawn errors and non-zero exits are both reported through
    /// [`BufferedOutcome::error`]; whatever output was captured before the
    /// failure is preserved. One host's failure is ordinary data here, never
    /// an error of the run.
    pub fn run_buffered(&self, host: &str, command: &str) -> BufferedOutcome {
        match self.command(host, command).output() {
            Ok(out) => {
                let mut combined = out.stdout;
                combined.extend_from_slice(&out.stderr);
                let error = if out.status.success() {
                    None
                } else {
                    Some(out.status.to_string())
                };
                BufferedOutcome {
                    output: combined,
                    error,
                }
            }
            Err(e) => BufferedOutcome {
                output: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Run the command on `host`, forwarding each output line to `sink`.
    ///
    /// `tag` is prepended to every line before it is queued, so the host
    /// label travels with the line regardless of interleaving. Both stdout
    /// and stderr are read as they are produced; the return value is only
    /// computed after the process exits and both readers have finished, so
    /// fast-failing commands never lose trailing output.
    ///
    /// Returns the error detail on failure, `None` on success.
    pub fn run_streaming(&self, host: &str, command: &str, sink: &LineSink, tag: &str) -> Option<String> {
        let mut child = match self
            .command(host, command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return Some(e.to_string()),
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Scope joins both readers, so the streams are drained before wait.
        let readers = crossbeam::thread::scope(|s| {
            if let Some(out) = stdout {
                s.spawn(move |_| forward_lines(out, sink, tag));
            }
            if let Some(err) = stderr {
                s.spawn(move |_| forward_lines(err, sink, tag));
            }
        });
        if readers.is_err() {
            tracing::warn!(host, "output reader thread panicked");
        }

        match child.wait() {
            Ok(status) if status.success() => None,
            Ok(status) => Some(status.to_string()),
            Err(e) => Some(e.to_string()),
        }
    }
}

/// Forward lines from one process stream to the sink until EOF.
///
/// A read error stops this stream but does not abort the host; everything
/// read so far has already been forwarded.
fn forward_lines<R: Read>(stream: R, sink: &LineSink, tag: &str) {
    for line in BufReader::new(stream).lines() {
        match line {
            Ok(text) => {
                if sink.write_line(&format!("{}{}", tag, text)).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!("error reading remote output: {}", e);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linewriter::LineWriter;
    use std::sync::{Arc, Mutex};

    /// Shell stand-in for ssh: ignores the host/command arguments and runs
    /// the script given as `-c`.
    fn fake_ssh(script: &str) -> RemoteCommand {
        RemoteCommand::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_buffered_success_captures_output() {
        let outcome = fake_ssh("printf 'one\\ntwo\\n'").run_buffered("h", "ignored");
        assert!(outcome.error.is_none());
        assert_eq!(outcome.output, b"one\ntwo\n");
    }

    #[test]
    fn test_buffered_combines_stdout_and_stderr() {
        let outcome = fake_ssh("echo out; echo err >&2").run_buffered("h", "ignored");
        assert!(outcome.error.is_none());
        let text = String::from_utf8(outcome.output).unwrap();
        assert!(text.contains("out\n"));
        assert!(text.contains("err\n"));
    }

    #[test]
    fn test_buffered_nonzero_exit_keeps_partial_output() {
        let outcome = fake_ssh("echo partial; exit 3").run_buffered("h", "ignored");
        let err = outcome.error.expect("non-zero exit should be an error");
        assert!(err.contains("exit status"), "unexpected detail: {}", err);
        assert_eq!(outcome.output, b"partial\n");
    }

    #[test]
    fn test_buffered_spawn_failure() {
        let remote = RemoteCommand::new("definitely-not-a-real-program-fanrun", Vec::new());
        let outcome = remote.run_buffered("h", "ignored");
        assert!(outcome.error.is_some());
        assert!(outcome.output.is_empty());
    }

    #[test]
    fn test_streaming_tags_every_line() {
        let cap = Capture::default();
        let writer = LineWriter::new(cap.clone());
        let sink = writer.sink();
        let err = fake_ssh("printf 'a\\nb\\n'").run_streaming("h", "ignored", &sink, "[h] ");
        drop(sink);
        writer.close().unwrap();

        assert!(err.is_none());
        let text = String::from_utf8(cap.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "[h] a\n[h] b\n");
    }

    #[test]
    fn test_streaming_drains_before_reporting_failure() {
        let cap = Capture::default();
        let writer = LineWriter::new(cap.clone());
        let sink = writer.sink();
        let err = fake_ssh("echo last gasp; exit 1").run_streaming("h", "ignored", &sink, "");
        drop(sink);
        writer.close().unwrap();

        assert!(err.is_some());
        let text = String::from_utf8(cap.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "last gasp\n");
    }

    #[test]
    fn test_streaming_forwards_stderr() {
        let cap = Capture::default();
        let writer = LineWriter::new(cap.clone());
        let sink = writer.sink();
        let err = fake_ssh("echo oops >&2").run_streaming("h", "ignored", &sink, "[h] ");
        drop(sink);
        writer.close().unwrap();

        assert!(err.is_none());
        let text = String::from_utf8(cap.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "[h] oops\n");
    }
}
