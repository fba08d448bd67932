//! Asynchronous rotating binary log writer.
//!
//! ## Purpose
//!
//! Persist every accepted datagram without ever stalling the capture thread
//! on disk I/O in the steady state, and without ever dropping a record
//! under overload:
//!
//! - A bounded queue sits between the capture thread and the background
//!   workers. When it fills, `append` blocks; records are never discarded,
//!   because a silent gap would corrupt offline sequence analysis.
//! - Entries are fully assembled (record header + truncated payload) before
//!   enqueue, so workers write exactly one contiguous buffer per record and
//!   timestamps reflect ingest time, not write time.
//! - The segment set rotates by size and is capped by count; both the
//!   rotation and all writes happen under one mutex, which also pins disk
//!   order to enqueue order: a worker dequeues while holding the sink, so
//!   with a single producer the file is in `packet_id` order even with
//!   several workers (extra workers are failover, not parallelism).
//!
//! ## Failure semantics
//!
//! Open failure at startup is fatal. A mid-run write error is retried a
//! bounded number of times; after that the writer marks itself failed,
//! keeps draining the queue so a blocked producer always unblocks, and
//! every subsequent `append` returns `WriterFailed`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use pitchcap_types::config::WRITE_RETRY_LIMIT;
use tracing::{debug, error, info, warn};

use crate::config::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};

/// Entries drained while a worker already holds the sink, per wakeup.
const DRAIN_BATCH: usize = 256;

/// Pause between write retries on the same record.
const RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// How long a worker waits on the queue before releasing the sink to its
/// peers and re-checking for shutdown.
const IDLE_WAIT: Duration = Duration::from_millis(100);

enum WriteRequest {
    /// One fully assembled log entry.
    Record(Vec<u8>),
    /// Push buffered bytes to the OS. No fsync.
    Flush,
}

/// Size-rotated, count-capped segment set.
///
/// The current segment keeps the base name; older segments carry an index
/// before the extension, `.log` being newest: `packets_binary.log`,
/// `packets_binary.1.log`, `packets_binary.2.log`, ...
struct RotatingSink {
    dir: PathBuf,
    base_name: String,
    max_size: u64,
    max_files: usize,
    file: BufWriter<File>,
    current_size: u64,
}

impl RotatingSink {
    fn open(dir: &Path, base_name: &str, max_size: u64, max_files: usize) -> std::io::Result<Self> {
        let path = dir.join(base_name);
        let file = File::create(&path)?;
        let sink = Self {
            dir: dir.to_path_buf(),
            base_name: base_name.to_string(),
            max_size,
            max_files,
            file: BufWriter::new(file),
            current_size: 0,
        };
        Ok(sink)
    }

    /// Path of segment `index`; 0 is the current file.
    fn segment_path(&self, index: usize) -> PathBuf {
        if index == 0 {
            return self.dir.join(&self.base_name);
        }
        let (stem, ext) = match self.base_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, ext),
            None => (self.base_name.as_str(), "log"),
        };
        self.dir.join(format!("{stem}.{index}.{ext}"))
    }

    fn write_entry(&mut self, entry: &[u8]) -> std::io::Result<()> {
        if self.current_size > 0 && self.current_size + entry.len() as u64 > self.max_size {
            self.rotate()?;
        }
        self.file.write_all(entry)?;
        self.current_size += entry.len() as u64;
        Ok(())
    }

    /// Close the current segment, shift the set by one index and open a
    /// fresh current segment, evicting the oldest at the cap.
    fn rotate(&mut self) -> std::io::Result<()> {
        self.file.flush()?;

        let oldest = self.segment_path(self.max_files - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (0..self.max_files - 1).rev() {
            let from = self.segment_path(index);
            if from.exists() {
                fs::rename(&from, self.segment_path(index + 1))?;
            }
        }

        self.file = BufWriter::new(File::create(self.segment_path(0))?);
        self.current_size = 0;
        debug!(dir = %self.dir.display(), "rotated binary log segment");
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

/// Handle owned by the capture thread.
pub struct BinaryLogWriter {
    tx: Option<Sender<WriteRequest>>,
    failed: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl BinaryLogWriter {
    /// Create the segment set and start the background workers. An open
    /// failure here aborts the pipeline.
    pub fn open(config: &CaptureConfig) -> CaptureResult<Self> {
        let sink = RotatingSink::open(
            &config.log_dir,
            &config.log_base_name,
            config.log_file_size,
            config.log_file_count,
        )
        .map_err(|e| {
            CaptureError::io(format!("creating {}", config.log_path().display()), e)
        })?;

        let sink = Arc::new(Mutex::new(sink));
        let failed = Arc::new(AtomicBool::new(false));
        let (tx, rx) = bounded::<WriteRequest>(config.queue_size);

        let workers = (0..config.writer_threads)
            .map(|id| {
                let rx = rx.clone();
                let sink = Arc::clone(&sink);
                let failed = Arc::clone(&failed);
                thread::Builder::new()
                    .name(format!("binlog-writer-{id}"))
                    .spawn(move || worker_loop(rx, sink, failed))
                    .map_err(|e| CaptureError::io("spawning writer thread", e))
            })
            .collect::<CaptureResult<Vec<_>>>()?;

        info!(
            path = %config.log_path().display(),
            segment_mb = config.log_file_size / (1024 * 1024),
            segments = config.log_file_count,
            queue = config.queue_size,
            threads = config.writer_threads,
            "binary log writer started"
        );

        Ok(Self {
            tx: Some(tx),
            failed,
            workers,
        })
    }

    /// Enqueue one assembled entry. Blocks when the queue is full; fails
    /// fast once the writer has given up on the segment set.
    pub fn append(&self, entry: Vec<u8>) -> CaptureResult<()> {
        if self.failed.load(Ordering::Relaxed) {
            return Err(CaptureError::WriterFailed);
        }
        let tx = self.tx.as_ref().ok_or(CaptureError::QueueClosed)?;
        tx.send(WriteRequest::Record(entry))
            .map_err(|_| CaptureError::QueueClosed)?;
        // The send may have blocked across the failure; report it rather
        // than letting the caller keep feeding a dead writer.
        if self.failed.load(Ordering::Relaxed) {
            return Err(CaptureError::WriterFailed);
        }
        Ok(())
    }

    /// Ask the workers to push buffered bytes to the OS.
    pub fn flush(&self) -> CaptureResult<()> {
        if self.failed.load(Ordering::Relaxed) {
            return Err(CaptureError::WriterFailed);
        }
        let tx = self.tx.as_ref().ok_or(CaptureError::QueueClosed)?;
        tx.send(WriteRequest::Flush)
            .map_err(|_| CaptureError::QueueClosed)
    }

    pub fn is_healthy(&self) -> bool {
        !self.failed.load(Ordering::Relaxed)
    }

    /// Close the queue, drain it, flush and join the workers.
    pub fn shutdown(mut self) -> CaptureResult<()> {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(WriteRequest::Flush);
            drop(tx);
        }
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        if self.failed.load(Ordering::Relaxed) {
            Err(CaptureError::WriterFailed)
        } else {
            Ok(())
        }
    }
}

fn worker_loop(
    rx: Receiver<WriteRequest>,
    sink: Arc<Mutex<RotatingSink>>,
    failed: Arc<AtomicBool>,
) {
    loop {
        // Dequeue while holding the sink: one worker pops and writes at a
        // time, so records hit disk in enqueue order.
        let mut guard = sink.lock();
        match rx.recv_timeout(IDLE_WAIT) {
            Ok(request) => {
                handle_request(&mut guard, &failed, request);
                for _ in 0..DRAIN_BATCH {
                    match rx.try_recv() {
                        Ok(request) => handle_request(&mut guard, &failed, request),
                        Err(_) => break,
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let mut guard = sink.lock();
    if !failed.load(Ordering::Relaxed) {
        if let Err(e) = guard.flush() {
            error!(error = %e, "final binary log flush failed");
            failed.store(true, Ordering::Relaxed);
        }
    }
}

fn handle_request(sink: &mut RotatingSink, failed: &AtomicBool, request: WriteRequest) {
    // A failed writer keeps consuming so a producer blocked on the full
    // queue always unblocks; the records are discarded.
    if failed.load(Ordering::Relaxed) {
        return;
    }
    let result = match request {
        WriteRequest::Record(entry) => write_with_retry(sink, &entry),
        WriteRequest::Flush => sink.flush(),
    };
    if let Err(e) = result {
        error!(error = %e, "binary log write failed after retries; writer marked failed");
        failed.store(true, Ordering::Relaxed);
    }
}

fn write_with_retry(sink: &mut RotatingSink, entry: &[u8]) -> std::io::Result<()> {
    let mut attempt = 0;
    loop {
        match sink.write_entry(entry) {
            Ok(()) => return Ok(()),
            Err(e) => {
                attempt += 1;
                if attempt >= WRITE_RETRY_LIMIT {
                    return Err(e);
                }
                warn!(error = %e, attempt, "binary log write failed, retrying");
                thread::sleep(RETRY_BACKOFF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir, segment_size: u64, queue: usize, threads: usize) -> CaptureConfig {
        CaptureConfig {
            log_dir: dir.path().to_path_buf(),
            log_file_size: segment_size,
            log_file_count: 50,
            queue_size: queue,
            writer_threads: threads,
            ..CaptureConfig::default()
        }
    }

    #[test]
    fn segment_paths_insert_index_before_extension() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingSink::open(dir.path(), "packets_binary.log", 1024, 3).unwrap();
        assert_eq!(
            sink.segment_path(0).file_name().unwrap(),
            "packets_binary.log"
        );
        assert_eq!(
            sink.segment_path(2).file_name().unwrap(),
            "packets_binary.2.log"
        );
    }

    #[test]
    fn rotation_shifts_and_evicts_at_cap() {
        let dir = TempDir::new().unwrap();
        let mut sink = RotatingSink::open(dir.path(), "packets_binary.log", 100, 3).unwrap();

        // Four 60-byte entries: each write past the first rotates.
        for fill in [1u8, 2, 3, 4] {
            sink.write_entry(&[fill; 60]).unwrap();
        }
        sink.flush().unwrap();

        // Cap of 3 segments: current, .1, .2 - the first entry is gone.
        assert_eq!(fs::read(sink.segment_path(0)).unwrap(), vec![4u8; 60]);
        assert_eq!(fs::read(sink.segment_path(1)).unwrap(), vec![3u8; 60]);
        assert_eq!(fs::read(sink.segment_path(2)).unwrap(), vec![2u8; 60]);
        assert!(!sink.segment_path(3).exists());
    }

    #[test]
    fn oversized_entry_still_writes_into_fresh_segment() {
        let dir = TempDir::new().unwrap();
        let mut sink = RotatingSink::open(dir.path(), "packets_binary.log", 100, 3).unwrap();
        sink.write_entry(&[7u8; 150]).unwrap();
        sink.flush().unwrap();
        assert_eq!(fs::read(sink.segment_path(0)).unwrap().len(), 150);
    }

    #[test]
    fn writer_persists_entries_in_order() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 1 << 20, 64, 4);
        let writer = BinaryLogWriter::open(&config).unwrap();
        for i in 0..100u32 {
            writer.append(i.to_le_bytes().to_vec()).unwrap();
        }
        writer.shutdown().unwrap();

        let bytes = fs::read(dir.path().join(&config.log_base_name)).unwrap();
        assert_eq!(bytes.len(), 400);
        for i in 0..100u32 {
            let at = i as usize * 4;
            assert_eq!(bytes[at..at + 4], i.to_le_bytes());
        }
    }

    #[test]
    fn clean_shutdown_flushes_and_reports_healthy() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 1 << 20, 4, 1);
        let writer = BinaryLogWriter::open(&config).unwrap();
        writer.append(vec![1, 2, 3]).unwrap();
        writer.flush().unwrap();
        assert!(writer.is_healthy());
        writer.shutdown().unwrap();
        assert_eq!(
            fs::read(dir.path().join(&config.log_base_name)).unwrap(),
            vec![1, 2, 3]
        );
    }
}
