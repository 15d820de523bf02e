//! Serialized line-oriented output shared by many producer threads.
//!
//! In interleaved mode every worker forwards remote output line by line.
//! [`LineWriter`] owns a single background consumer thread that performs the
//! actual writes, so each line lands in the output stream as one atomic
//! write no matter how many producers are active. Producers hold cheap
//! [`LineSink`] handles backed by one bounded channel: when the queue fills
//! up, fast producers block instead of dropping lines.
//!
//! # Shutdown
//!
//! Call [`LineWriter::close`] after every producer has finished (dropped its
//! sink). Close drains the queue, flushes the underlying stream, and joins
//! the consumer thread; only then is the output complete.

use crate::error::{FanrunError, Result};
use crossbeam::channel::{bounded, Sender};
use std::io::Write;
use std::thread::JoinHandle;

/// Default depth of the line queue before producers block.
const QUEUE_DEPTH: usize = 256;

/// Single-consumer writer that serializes concurrent line writes.
pub struct LineWriter {
    tx: Sender<String>,
    handle: JoinHandle<()>,
}

impl LineWriter {
    /// Create a writer draining into `out` with the default queue depth.
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self::with_capacity(out, QUEUE_DEPTH)
    }

    /// Create a writer with an explicit queue depth.
    ///
    /// The depth bounds how far producers can run ahead of the consumer;
    /// once full, [`LineSink::write_line`] blocks until space frees up.
    pub fn with_capacity<W: Write + Send + 'static>(mut out: W, depth: usize) -> Self {
        let (tx, rx) = bounded::<String>(depth.max(1));
        let handle = std::thread::spawn(move || {
            for line in rx.iter() {
                if let Err(e) = writeln!(out, "{}", line) {
                    tracing::warn!("failed to write output line: {}", e);
                }
            }
            if let Err(e) = out.flush() {
                tracing::warn!("failed to flush output: {}", e);
            }
        });
        Self { tx, handle }
    }

    /// Get a producer handle for this writer.
    ///
    /// Sinks are cheap to clone and safe to use from any thread.
    pub fn sink(&self) -> LineSink {
        LineSink {
            tx: self.tx.clone(),
        }
    }

    /// Flush remaining lines and shut the writer down.
    ///
    /// Blocks until all outstanding [`LineSink`] handles have been dropped
    /// and the consumer has drained the queue. Must be called before the
    /// output is considered complete.
    pub fn close(self) -> Result<()> {
        drop(self.tx);
        self.handle.join().map_err(|_| FanrunError::WorkerPanic)
    }
}

/// Producer handle for a [`LineWriter`].
#[derive(Clone)]
pub struct LineSink {
    tx: Sender<String>,
}

impl LineSink {
    /// Queue one line for output.
    ///
    /// `line` should not include a trailing newline; the consumer appends
    /// one. Blocks while the queue is full. Fails with
    /// [`FanrunError::WriterClosed`] if the consumer has gone away.
    pub fn write_line(&self, line: &str) -> Result<()> {
        self.tx
            .send(line.to_string())
            .map_err(|_| FanrunError::WriterClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Write target that records everything for later inspection.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(String::from)
                .collect()
        }
    }

    #[test]
    fn test_single_producer_order_preserved() {
        let cap = Capture::default();
        let writer = LineWriter::new(cap.clone());
        let sink = writer.sink();
        for i in 0..20 {
            sink.write_line(&format!("line {}", i)).unwrap();
        }
        drop(sink);
        writer.close().unwrap();

        let expected: Vec<String> = (0..20).map(|i| format!("line {}", i)).collect();
        assert_eq!(cap.lines(), expected);
    }

    #[test]
    fn test_concurrent_producers_lines_stay_intact() {
        let cap = Capture::default();
        let writer = LineWriter::new(cap.clone());

        let mut handles = Vec::new();
        for t in 0..4 {
            let sink = writer.sink();
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    sink.write_line(&format!("producer {} line {}", t, i)).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        writer.close().unwrap();

        let lines = cap.lines();
        assert_eq!(lines.len(), 200);
        // Every line is intact and per-producer order is preserved.
        for t in 0..4 {
            let mine: Vec<&String> = lines
                .iter()
                .filter(|l| l.starts_with(&format!("producer {} ", t)))
                .collect();
            assert_eq!(mine.len(), 50);
            for (i, line) in mine.iter().enumerate() {
                assert_eq!(**line, format!("producer {} line {}", t, i));
            }
        }
    }

    #[test]
    fn test_full_queue_blocks_without_dropping() {
        let cap = Capture::default();
        let writer = LineWriter::with_capacity(cap.clone(), 2);
        let sink = writer.sink();
        for i in 0..500 {
            sink.write_line(&format!("{}", i)).unwrap();
        }
        drop(sink);
        writer.close().unwrap();
        assert_eq!(cap.lines().len(), 500);
    }

    #[test]
    fn test_close_flushes_queued_lines() {
        let cap = Capture::default();
        let writer = LineWriter::new(cap.clone());
        let sink = writer.sink();
        sink.write_line("last words").unwrap();
        drop(sink);
        writer.close().unwrap();
        assert_eq!(cap.lines(), vec!["last words".to_string()]);
    }
}
