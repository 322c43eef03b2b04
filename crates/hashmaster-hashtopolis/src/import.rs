//! Chunked bulk import of precracked hashes (`hashlist/importCracked`)
//!
//! Processing flow:
//! 1. Stream the file line by line (terminators kept, bytes untouched)
//! 2. Batch lines until the next one would push the batch past the size limit
//! 3. Submit each batch base64-encoded, add the server's counters to the totals
//! 4. Submit whatever is left at end-of-file, however small
//!
//! The remaining-time estimate is the server's last per-chunk processing
//! time multiplied by the number of chunks still expected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::AddAssign;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hashmaster_core::{ApiError, ProgressContext, fmt_num, shutdown_flag};
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::models::de;
use crate::request::Request;

/// Default batch limit in MiB
pub const DEFAULT_CHUNK_SIZE_MB: u64 = 10;

/// Largest accepted batch limit in MiB
pub const MAX_CHUNK_SIZE_MB: u64 = 4096;

/// Separator between hash and plain in imported lines
pub const SEPARATOR: &str = ":";

/// Per-chunk processing time assumed before the server reports one
const ASSUMED_CHUNK_SECONDS: u64 = 60;

/// Initial capacity for the per-line read buffer
const LINE_BUF_CAPACITY: usize = 4096;

/// Counters the server returns for every imported chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCounters {
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub lines_processed: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub new_cracked: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub already_cracked: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub invalid_lines: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub not_found: u64,
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub too_long_plains: u64,
}

impl AddAssign for ImportCounters {
    fn add_assign(&mut self, other: Self) {
        self.lines_processed += other.lines_processed;
        self.new_cracked += other.new_cracked;
        self.already_cracked += other.already_cracked;
        self.invalid_lines += other.invalid_lines;
        self.not_found += other.not_found;
        self.too_long_plains += other.too_long_plains;
    }
}

/// `importCracked` response for one chunk
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkReport {
    #[serde(flatten)]
    pub counters: ImportCounters,
    /// Server-side processing time in seconds
    #[serde(default, deserialize_with = "de::u64_lenient")]
    pub process_time: u64,
}

/// Progress snapshot handed to the caller after each chunk
#[derive(Debug, Clone, Copy)]
pub struct ImportProgress {
    /// 1-based index of the chunk just submitted
    pub chunk: u64,
    /// Chunks still expected (never negative; the estimate can be exceeded)
    pub remaining_chunks: u64,
    pub estimated_chunks: u64,
    pub process_time: Duration,
    pub time_remaining: Duration,
    pub totals: ImportCounters,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub chunks_submitted: u64,
    pub totals: ImportCounters,
    pub elapsed: Duration,
    /// Stopped early on a shutdown request
    pub interrupted: bool,
}

/// Accumulates lines into size-bounded batches.
///
/// A line is appended unless the batch is non-empty and the line would push
/// it past the limit; then the batch is handed out first. A single line
/// larger than the limit therefore forms a batch of its own.
#[derive(Debug)]
pub struct ChunkBatcher {
    limit: usize,
    buf: Vec<u8>,
}

impl ChunkBatcher {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            buf: Vec::new(),
        }
    }

    /// Add a line; returns the full batch that had to be flushed first, if any
    pub fn push(&mut self, line: &[u8]) -> Option<Vec<u8>> {
        let flushed = if !self.buf.is_empty() && self.buf.len() + line.len() > self.limit {
            Some(std::mem::take(&mut self.buf))
        } else {
            None
        };
        self.buf.extend_from_slice(line);
        flushed
    }

    /// Remaining partial batch at end of input
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }

    pub fn pending_bytes(&self) -> usize {
        self.buf.len()
    }
}

/// Expected number of chunks for a file of `file_size` bytes
pub fn estimated_chunks(file_size: u64, chunk_bytes: u64) -> u64 {
    file_size.div_ceil(chunk_bytes.max(1))
}

/// Human-readable remaining time in seconds, minutes or hours
pub fn fmt_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.0} seconds")
    } else if secs < 3600.0 {
        format!("{:.2} minutes", secs / 60.0)
    } else {
        format!("{:.2} hours", secs / 3600.0)
    }
}

/// Stream `path` through a [`ChunkBatcher`] and hand each batch to `submit`.
///
/// `on_chunk` is called after every accepted chunk with the running totals.
/// The first failed chunk aborts the import with its error; a set `stop`
/// flag ends it after the chunk in flight.
pub fn import_file(
    path: &Path,
    chunk_bytes: usize,
    stop: &AtomicBool,
    mut submit: impl FnMut(&[u8]) -> Result<ChunkReport, ApiError>,
    mut on_chunk: impl FnMut(&ImportProgress),
) -> Result<ImportSummary> {
    let started = Instant::now();
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let file_size = file
        .metadata()
        .with_context(|| format!("Cannot stat {}", path.display()))?
        .len();
    let estimated = estimated_chunks(file_size, chunk_bytes as u64);

    let mut reader = BufReader::new(file);
    let mut batcher = ChunkBatcher::new(chunk_bytes);
    let mut line = Vec::with_capacity(LINE_BUF_CAPACITY);
    let mut totals = ImportCounters::default();
    let mut chunks_submitted = 0u64;

    let mut send = |batch: &[u8], totals: &mut ImportCounters| -> Result<()> {
        let report = submit(batch).with_context(|| {
            format!(
                "Chunk {} ({} bytes) failed after {} lines processed",
                chunks_submitted + 1,
                batch.len(),
                fmt_num(totals.lines_processed)
            )
        })?;
        chunks_submitted += 1;
        *totals += report.counters;

        let remaining_chunks = estimated.saturating_sub(chunks_submitted);
        let process_time = Duration::from_secs(report.process_time);
        on_chunk(&ImportProgress {
            chunk: chunks_submitted,
            remaining_chunks,
            estimated_chunks: estimated.max(chunks_submitted),
            process_time,
            time_remaining: Duration::from_secs(report.process_time.saturating_mul(remaining_chunks)),
            totals: *totals,
        });
        Ok(())
    };

    // Checked before every submission, the final partial batch included
    let stopped = || stop.load(Ordering::Relaxed);
    let mut interrupted = false;
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .with_context(|| format!("Read error in {}", path.display()))?;
        if read == 0 {
            break;
        }
        if let Some(batch) = batcher.push(&line) {
            if stopped() {
                interrupted = true;
                break;
            }
            send(&batch, &mut totals)?;
        }
    }
    if !interrupted {
        if let Some(batch) = batcher.finish() {
            if stopped() {
                interrupted = true;
            } else {
                send(&batch, &mut totals)?;
            }
        }
    }

    Ok(ImportSummary {
        chunks_submitted,
        totals,
        elapsed: started.elapsed(),
        interrupted,
    })
}

fn progress_line(p: &ImportProgress) -> String {
    format!(
        "ChunksRemaining: {} - TimeRemaining: {} - ProcessTime: {}s - NewCracks: {} - AlreadyCracked: {} - LinesProcessed: {} - InvalidLines: {} - NotFound: {} - TooLongPlains: {}",
        p.remaining_chunks,
        fmt_remaining(p.time_remaining),
        p.process_time.as_secs(),
        fmt_num(p.totals.new_cracked),
        fmt_num(p.totals.already_cracked),
        fmt_num(p.totals.lines_processed),
        fmt_num(p.totals.invalid_lines),
        fmt_num(p.totals.not_found),
        fmt_num(p.totals.too_long_plains),
    )
}

/// `hashlist/importCracked` request carrying one batch, base64-encoded
fn import_request(hashlist_id: u64, data: &[u8]) -> Request {
    Request::new("hashlist", "importCracked")
        .with("hashlistId", hashlist_id)
        .with("separator", SEPARATOR)
        .with("data", STANDARD.encode(data))
}

/// Batch limit in bytes; `mb` is clamped to `1..=MAX_CHUNK_SIZE_MB`
fn chunk_bytes(mb: u64) -> u64 {
    mb.clamp(1, MAX_CHUNK_SIZE_MB) * 1024 * 1024
}

impl Client {
    /// `hashlist/importCracked` for one batch of `hash:plain` lines
    pub fn import_cracked_chunk(&self, hashlist_id: u64, data: &[u8]) -> Result<ChunkReport, ApiError> {
        self.submit_as(import_request(hashlist_id, data))
    }

    /// Import a precracked `hash:plain` file into a hashlist in chunks of
    /// `chunk_size_mb` MiB, reporting progress through `progress`.
    pub fn import_cracked_file(
        &self,
        hashlist_id: u64,
        path: &Path,
        chunk_size_mb: u64,
        progress: &ProgressContext,
    ) -> Result<ImportSummary> {
        let chunk_size_mb = chunk_size_mb.clamp(1, MAX_CHUNK_SIZE_MB);
        let batch_bytes = chunk_bytes(chunk_size_mb);
        let file_size = std::fs::metadata(path)
            .with_context(|| format!("Cannot stat {}", path.display()))?
            .len();
        let estimated = estimated_chunks(file_size, batch_bytes);
        log::info!(
            "Processing file: {} ({} bytes, ~{estimated} chunks of {chunk_size_mb} MiB)",
            path.display(),
            fmt_num(file_size)
        );
        log::info!(
            "Total Process Time: {} (assuming {ASSUMED_CHUNK_SECONDS}s per chunk)",
            fmt_remaining(Duration::from_secs(ASSUMED_CHUNK_SECONDS * estimated))
        );

        let pb = progress.chunk_bar("import", estimated);
        let is_tty = progress.is_tty();
        let summary = import_file(
            path,
            batch_bytes as usize,
            shutdown_flag(),
            |batch| self.import_cracked_chunk(hashlist_id, batch),
            |p| {
                if is_tty {
                    pb.set_length(p.estimated_chunks);
                    pb.set_position(p.chunk);
                    pb.set_message(format!(
                        "~{} left, {} new",
                        fmt_remaining(p.time_remaining),
                        fmt_num(p.totals.new_cracked)
                    ));
                } else {
                    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                    log::info!("{timestamp} ::: {}", progress_line(p));
                }
            },
        );
        pb.finish_and_clear();

        let summary = summary?;
        if summary.interrupted {
            log::warn!(
                "Import interrupted after {} chunks; re-running submits the whole file again",
                summary.chunks_submitted
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn report(lines: u64, new: u64, secs: u64) -> ChunkReport {
        ChunkReport {
            counters: ImportCounters {
                lines_processed: lines,
                new_cracked: new,
                ..Default::default()
            },
            process_time: secs,
        }
    }

    fn write_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn count_lines(batch: &[u8]) -> u64 {
        let newlines = batch.iter().filter(|&&b| b == b'\n').count() as u64;
        if batch.last() == Some(&b'\n') {
            newlines
        } else {
            newlines + 1
        }
    }

    #[test]
    fn batcher_flushes_before_overflow() {
        let mut b = ChunkBatcher::new(10);
        assert!(b.push(b"aaaa\n").is_none());
        assert!(b.push(b"bbbb\n").is_none()); // exactly 10
        let flushed = b.push(b"cc\n").unwrap();
        assert_eq!(flushed, b"aaaa\nbbbb\n");
        assert_eq!(b.pending_bytes(), 3);
        assert_eq!(b.finish().unwrap(), b"cc\n");
        assert!(b.finish().is_none());
    }

    #[test]
    fn batcher_oversized_line_is_own_batch() {
        let mut b = ChunkBatcher::new(4);
        assert!(b.push(b"0123456789\n").is_none());
        assert_eq!(b.push(b"x\n").unwrap(), b"0123456789\n");
        assert_eq!(b.finish().unwrap(), b"x\n");
    }

    #[test]
    fn estimated_chunks_rounds_up() {
        assert_eq!(estimated_chunks(0, 10), 0);
        assert_eq!(estimated_chunks(10, 10), 1);
        assert_eq!(estimated_chunks(11, 10), 2);
    }

    #[test]
    fn remaining_time_units() {
        assert_eq!(fmt_remaining(Duration::from_secs(45)), "45 seconds");
        assert_eq!(fmt_remaining(Duration::from_secs(90)), "1.50 minutes");
        assert_eq!(fmt_remaining(Duration::from_secs(5400)), "1.50 hours");
    }

    #[test]
    fn counters_from_server_json() {
        let body = serde_json::json!({
            "section": "hashlist", "request": "importCracked", "response": "OK",
            "linesProcessed": 3, "newCracked": 2, "alreadyCracked": 1,
            "invalidLines": 0, "notFound": 0, "processTime": 4, "tooLongPlains": 0
        });
        let r: ChunkReport = serde_json::from_value(body).unwrap();
        assert_eq!(r.counters.lines_processed, 3);
        assert_eq!(r.counters.already_cracked, 1);
        assert_eq!(r.process_time, 4);
    }

    #[test]
    fn import_batches_and_totals() {
        // 6 lines of 10 bytes, limit 25 → chunks of 2, 2, 2
        let contents = b"hash0:pw0\nhash1:pw1\nhash2:pw2\nhash3:pw3\nhash4:pw4\nhash5:pw5\n";
        let file = write_file(contents);
        let stop = AtomicBool::new(false);
        let mut batches: Vec<Vec<u8>> = Vec::new();
        let mut snapshots = Vec::new();

        let summary = import_file(
            file.path(),
            25,
            &stop,
            |batch| {
                batches.push(batch.to_vec());
                Ok(report(count_lines(batch), 1, 30))
            },
            |p| snapshots.push(*p),
        )
        .unwrap();

        assert_eq!(batches.len(), 3);
        assert_eq!(batches.concat(), contents.to_vec());
        assert_eq!(summary.chunks_submitted, 3);
        assert_eq!(summary.totals.lines_processed, 6);
        assert_eq!(summary.totals.new_cracked, 3);
        assert!(!summary.interrupted);

        // estimate: ceil(60 / 25) = 3 chunks
        assert_eq!(snapshots[0].remaining_chunks, 2);
        assert_eq!(snapshots[0].time_remaining, Duration::from_secs(60));
        assert_eq!(snapshots[2].remaining_chunks, 0);
        assert_eq!(snapshots[2].time_remaining, Duration::ZERO);
    }

    #[test]
    fn final_partial_batch_submitted() {
        let file = write_file(b"a:1\nb:2\nc:3");
        let stop = AtomicBool::new(false);
        let mut batches: Vec<Vec<u8>> = Vec::new();

        let summary = import_file(
            file.path(),
            1024 * 1024,
            &stop,
            |batch| {
                batches.push(batch.to_vec());
                Ok(report(count_lines(batch), 0, 1))
            },
            |_| {},
        )
        .unwrap();

        assert_eq!(batches, vec![b"a:1\nb:2\nc:3".to_vec()]);
        assert_eq!(summary.chunks_submitted, 1);
        assert_eq!(summary.totals.lines_processed, 3);
    }

    #[test]
    fn empty_file_submits_nothing() {
        let file = write_file(b"");
        let stop = AtomicBool::new(false);
        let summary = import_file(
            file.path(),
            10,
            &stop,
            |_| panic!("nothing to submit"),
            |_| {},
        )
        .unwrap();
        assert_eq!(summary.chunks_submitted, 0);
        assert_eq!(summary.totals, ImportCounters::default());
    }

    #[test]
    fn failed_chunk_aborts() {
        let file = write_file(b"aaaa:1\nbbbb:2\ncccc:3\n");
        let stop = AtomicBool::new(false);
        let mut calls = 0;
        let err = import_file(
            file.path(),
            8,
            &stop,
            |_| {
                calls += 1;
                if calls == 2 {
                    Err(ApiError::rejected("Hashtopolis", "Invalid hashlist!"))
                } else {
                    Ok(report(1, 1, 1))
                }
            },
            |_| {},
        )
        .unwrap_err();
        assert_eq!(calls, 2);
        let msg = format!("{err:#}");
        assert!(msg.contains("Chunk 2"));
        assert!(msg.contains("Invalid hashlist!"));
    }

    #[test]
    fn stop_flag_ends_after_current_chunk() {
        let file = write_file(b"aaaa:1\nbbbb:2\ncccc:3\n");
        let stop = AtomicBool::new(false);
        let mut calls = 0;
        let summary = import_file(
            file.path(),
            8,
            &stop,
            |_| {
                calls += 1;
                stop.store(true, Ordering::Relaxed);
                Ok(report(1, 0, 1))
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(calls, 1);
        assert!(summary.interrupted);
        assert_eq!(summary.chunks_submitted, 1);
    }

    #[test]
    fn stop_set_before_start_submits_nothing() {
        let file = write_file(b"a:1\nb:2\n");
        let stop = AtomicBool::new(true);
        let summary = import_file(
            file.path(),
            1024,
            &stop,
            |_| panic!("stopped before the first chunk"),
            |_| {},
        )
        .unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.chunks_submitted, 0);
        assert_eq!(summary.totals, ImportCounters::default());
    }

    #[test]
    fn stop_skips_final_partial_batch() {
        // limit 8: "aaaa:1\n" goes out when "bbbb:2\n" arrives, the rest is the tail
        let file = write_file(b"aaaa:1\nbbbb:2\n");
        let stop = AtomicBool::new(false);
        let mut batches: Vec<Vec<u8>> = Vec::new();
        let summary = import_file(
            file.path(),
            8,
            &stop,
            |batch| {
                batches.push(batch.to_vec());
                stop.store(true, Ordering::Relaxed);
                Ok(report(1, 0, 1))
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(batches, vec![b"aaaa:1\n".to_vec()]);
        assert!(summary.interrupted);
        assert_eq!(summary.chunks_submitted, 1);
    }

    #[test]
    fn import_request_fields() {
        let batch = b"5f4dcc3b5aa765d61d8327deb882cf99:password\n\xff\xfe:raw\n";
        let req = import_request(42, batch);
        assert_eq!(req.section(), "hashlist");
        assert_eq!(req.name(), "importCracked");
        assert_eq!(req.field("hashlistId"), Some(&serde_json::Value::from(42u64)));
        assert_eq!(req.field("separator"), Some(&serde_json::Value::from(":")));
        let data = req.field("data").and_then(|v| v.as_str()).unwrap();
        assert_eq!(STANDARD.decode(data).unwrap(), batch.to_vec());
    }

    #[test]
    fn chunk_bytes_clamped() {
        assert_eq!(chunk_bytes(0), 1024 * 1024);
        assert_eq!(chunk_bytes(10), 10 * 1024 * 1024);
        assert_eq!(chunk_bytes(u64::MAX), MAX_CHUNK_SIZE_MB * 1024 * 1024);
    }
}
