//! # Usage Module
//!
//! Computes spend over time windows from Claude Code's native JSONL
//! transcripts (`~/.claude/projects/**/*.jsonl`).
//!
//! ## Key Functions
//!
//! - `parse_usage_line`: Extracts a priced usage record from one transcript line
//! - `scan_file` / `scan_transcripts`: Uncached sums above a cutoff
//! - `TranscriptScanner`: Rolling-window and since-midnight totals, memoized in
//!   the on-disk cache for five minutes
//!
//! Every valid assistant record counts on its own. Transcripts log actual
//! token usage, so unlike the ledger there is no per-session collapsing.

use chrono::{DateTime, Duration, Local, Utc};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::DiskCache;
use crate::models::{TranscriptLine, UsageRecord};
use crate::utils::local_midnight;

/// Freshness window for cached totals.
pub const TRANSCRIPT_CACHE_TTL_MINUTES: i64 = 5;

/// Directories holding tool output artifacts, never transcripts.
pub const TOOL_RESULTS_DIR: &str = "tool-results";

/// Parse one transcript line into a usage record.
///
/// Returns `None` unless the line is an assistant turn with a real model id
/// (non-empty, not a `<synthetic>` placeholder) and an RFC 3339 timestamp.
/// Missing token counts are zero.
pub fn parse_usage_line(line: &str) -> Option<UsageRecord> {
    let t = line.trim();
    if t.is_empty() {
        return None;
    }
    let parsed: TranscriptLine = serde_json::from_str(t).ok()?;
    if parsed.r#type.as_deref() != Some("assistant") {
        return None;
    }
    let message = parsed.message?;
    let model = message.model.filter(|m| !m.is_empty() && !m.starts_with('<'))?;
    let ts = DateTime::parse_from_rfc3339(parsed.timestamp.as_deref()?)
        .ok()?
        .with_timezone(&Utc);
    let usage = message.usage.unwrap_or_default();
    Some(UsageRecord {
        model,
        input: usage.input_tokens,
        output: usage.output_tokens,
        cache_create: usage.cache_creation_input_tokens,
        cache_read: usage.cache_read_input_tokens,
        ts,
    })
}

/// Sum the cost of records in `path` stamped after `cutoff`.
/// Unreadable files and malformed lines contribute nothing.
pub fn scan_file(path: &Path, cutoff: DateTime<Utc>) -> f64 {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return 0.0,
    };
    let reader = BufReader::new(file);
    let mut total = 0.0;
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) if e.kind() == ErrorKind::InvalidData => continue,
            Err(_) => break,
        };
        let Some(record) = parse_usage_line(&line) else {
            continue;
        };
        if record.ts > cutoff {
            total += record.cost();
        }
    }
    total
}

/// Walk every root and sum all `.jsonl` records stamped after `cutoff`.
///
/// `tool-results` directories are not descended into. Symlinked transcripts
/// are read through their target. Files last modified
/// before the cutoff are skipped unopened, on the assumption that a file
/// cannot hold records newer than its own mtime. Missing roots count as zero.
pub fn scan_transcripts(roots: &[PathBuf], cutoff: DateTime<Utc>) -> f64 {
    let mut total = 0.0;
    let mut files_scanned = 0usize;
    for root in roots {
        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == TOOL_RESULTS_DIR));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if entry.file_type().is_dir()
                || entry.path().extension().and_then(|s| s.to_str()) != Some("jsonl")
            {
                continue;
            }
            // Follows symlinks, unlike the walker's own metadata
            let meta = match fs::metadata(entry.path()) {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let mtime: DateTime<Utc> = match meta.modified() {
                Ok(t) => t.into(),
                Err(_) => continue,
            };
            if mtime < cutoff {
                continue;
            }
            files_scanned += 1;
            total += scan_file(entry.path(), cutoff);
        }
    }
    tracing::debug!(files_scanned, total, %cutoff, "scanned transcripts");
    total
}

/// Windowed transcript totals backed by the disk cache.
#[derive(Clone, Debug)]
pub struct TranscriptScanner {
    roots: Vec<PathBuf>,
    cache: DiskCache,
}

impl TranscriptScanner {
    pub fn new(roots: Vec<PathBuf>, cache: DiskCache) -> Self {
        Self { roots, cache }
    }

    /// Scanner over the `projects` directory of each Claude data root.
    pub fn for_claude_paths(paths: &[PathBuf], cache: DiskCache) -> Self {
        Self::new(paths.iter().map(|p| p.join("projects")).collect(), cache)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Cost over the trailing `duration`, cached per duration.
    pub fn calculate_period(&self, duration: Duration) -> f64 {
        let key = format!("transcript-cost:{duration}");
        self.cached_total(&key, Utc::now() - duration)
    }

    /// Cost since local midnight. The key carries the date, so after midnight
    /// a fresh key is used and yesterday's value is never read again.
    pub fn calculate_today(&self) -> f64 {
        let now = Local::now();
        let key = format!("transcript-cost:today:{}", now.date_naive());
        self.cached_total(&key, local_midnight(now))
    }

    fn cached_total(&self, key: &str, cutoff: DateTime<Utc>) -> f64 {
        let ttl = Duration::minutes(TRANSCRIPT_CACHE_TTL_MINUTES);
        match self.cache.get(key, ttl) {
            Ok(data) => {
                if let Some(v) = std::str::from_utf8(&data)
                    .ok()
                    .and_then(|s| s.trim().parse::<f64>().ok())
                {
                    tracing::trace!(key, total = v, "transcript cost cache hit");
                    return v;
                }
                tracing::debug!(key, "unparseable cached total, rescanning");
            }
            Err(e) if e.is_miss() => tracing::trace!(key, reason = %e, "transcript cost cache miss"),
            Err(e) => tracing::debug!(key, error = %e, "transcript cost cache unreadable"),
        }

        let total = scan_transcripts(&self.roots, cutoff);
        if let Err(e) = self.cache.set(key, total.to_string().as_bytes(), ttl) {
            tracing::debug!(key, error = %e, "could not store transcript cost");
        }
        total
    }
}
