//! # Ledger Module
//!
//! Append-only JSONL log of live session cost snapshots.
//!
//! Each line is one [`LedgerEntry`]. A session appears once per report, and
//! its cost only grows, so windowed totals count the newest snapshot per
//! session rather than the sum of all snapshots.
//!
//! The log is kept bounded by compaction: lines older than
//! [`RETENTION_DAYS`] are dropped by rewriting the file to a temporary path in
//! the same directory and renaming it over the original. Compaction runs at
//! most once per [`COMPACTION_INTERVAL_HOURS`], tracked by the modification
//! time of a `<ledger>.compacted` marker file. Two invocations may both
//! decide to compact; the rename keeps either outcome consistent.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{CostError, Result};
use crate::models::LedgerEntry;

pub const RETENTION_DAYS: i64 = 31;
pub const COMPACTION_INTERVAL_HOURS: i64 = 1;

/// Outcome of one compaction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionReport {
    pub kept: usize,
    /// Expired plus unparseable lines
    pub dropped: usize,
}

#[derive(Clone, Debug)]
pub struct CostLedger {
    path: PathBuf,
}

impl CostLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar whose mtime records the last compaction.
    pub fn marker_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".compacted");
        PathBuf::from(name)
    }

    /// Append one entry as a single line, then compact if the marker is stale.
    ///
    /// A failed compaction does not fail the append; it is logged and retried
    /// on a later append.
    pub fn append(&self, entry: &LedgerEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CostError::storage(parent, e))?;
        }
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CostError::storage(&self.path, e))?;
        file.write_all(&line)
            .map_err(|e| CostError::storage(&self.path, e))?;
        drop(file);

        if let Err(e) = self.maybe_compact() {
            tracing::warn!(error = %e, ledger = %self.path.display(), "ledger compaction failed");
        }
        Ok(())
    }

    /// Compact only when the marker is missing or older than the interval.
    pub fn maybe_compact(&self) -> Result<Option<CompactionReport>> {
        if !self.compaction_due() {
            return Ok(None);
        }
        self.compact().map(Some)
    }

    fn compaction_due(&self) -> bool {
        let modified = match fs::metadata(self.marker_path()).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return true,
        };
        let age = Utc::now() - DateTime::<Utc>::from(modified);
        age > Duration::hours(COMPACTION_INTERVAL_HOURS)
    }

    /// Drop entries older than the retention horizon and malformed lines.
    ///
    /// Works on a snapshot read of the file; the rewrite becomes visible in a
    /// single rename. The marker is touched even when nothing was dropped.
    pub fn compact(&self) -> Result<CompactionReport> {
        let mut report = CompactionReport::default();
        if let Some(data) = self.read_snapshot()? {
            let cutoff = Utc::now() - Duration::days(RETENTION_DAYS);
            let mut retained = Vec::with_capacity(data.len());
            for raw in data.split(|b| *b == b'\n') {
                let line = raw.trim_ascii();
                if line.is_empty() {
                    continue;
                }
                match parse_ledger_line(line) {
                    Some(entry) if entry.timestamp > cutoff => {
                        retained.extend_from_slice(line);
                        retained.push(b'\n');
                        report.kept += 1;
                    }
                    _ => report.dropped += 1,
                }
            }
            self.replace_contents(&retained)?;
        }
        self.touch_marker()?;
        tracing::debug!(
            ledger = %self.path.display(),
            kept = report.kept,
            dropped = report.dropped,
            "compacted ledger"
        );
        Ok(report)
    }

    /// Every parseable entry in file order. A missing ledger is empty.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let Some(data) = self.read_snapshot()? else {
            return Ok(Vec::new());
        };
        Ok(data
            .split(|b| *b == b'\n')
            .filter_map(parse_ledger_line)
            .collect())
    }

    /// Total cost of sessions reported within `duration` of now.
    ///
    /// Per session only the newest snapshot counts. On equal timestamps the
    /// later line wins.
    pub fn calculate_period(&self, duration: Duration) -> Result<f64> {
        let cutoff = Utc::now() - duration;
        let mut latest: HashMap<String, (DateTime<Utc>, f64)> = HashMap::new();
        for entry in self.entries()? {
            if entry.timestamp <= cutoff {
                continue;
            }
            let newer = latest
                .get(&entry.session_id)
                .is_none_or(|(ts, _)| entry.timestamp >= *ts);
            if newer {
                latest.insert(entry.session_id, (entry.timestamp, entry.cost));
            }
        }
        Ok(latest.values().map(|(_, cost)| cost).sum())
    }

    fn read_snapshot(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CostError::storage(&self.path, e)),
        }
    }

    fn replace_contents(&self, contents: &[u8]) -> Result<()> {
        let tmp = self.temp_path();
        let written = File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(contents)?;
                f.sync_all()
            })
            .and_then(|_| fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(CostError::storage(&self.path, e));
        }
        Ok(())
    }

    // Same directory as the ledger so the rename never crosses filesystems
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".tmp-{}", std::process::id()));
        PathBuf::from(name)
    }

    fn touch_marker(&self) -> Result<()> {
        let marker = self.marker_path();
        File::create(&marker)
            .and_then(|f| f.set_modified(SystemTime::now()))
            .map_err(|e| CostError::storage(&marker, e))
    }
}

/// Parse one ledger line; `None` for blank or malformed lines.
pub fn parse_ledger_line(line: &[u8]) -> Option<LedgerEntry> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice(line) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::trace!(error = %e, "skipping malformed ledger line");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_in(tmp: &TempDir) -> CostLedger {
        CostLedger::new(tmp.path().join("costs").join("history.jsonl"))
    }

    #[test]
    fn append_creates_parent_and_file() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger_in(&tmp);
        ledger.append(&LedgerEntry::now("test-123", 0.45)).unwrap();
        assert!(ledger.path().exists());
        // First append compacts, since there is no marker yet
        assert!(ledger.marker_path().exists());
    }

    #[test]
    fn appended_line_is_plain_json() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger_in(&tmp);
        let ts = DateTime::parse_from_rfc3339("2026-02-15T14:48:28.920Z")
            .unwrap()
            .with_timezone(&Utc);
        ledger.append(&LedgerEntry::new("abc", 1.25, ts)).unwrap();
        let text = fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(
            text,
            "{\"session_id\":\"abc\",\"cost\":1.25,\"timestamp\":\"2026-02-15T14:48:28.920Z\"}\n"
        );
    }

    #[test]
    fn parse_skips_garbage() {
        assert!(parse_ledger_line(b"").is_none());
        assert!(parse_ledger_line(b"   ").is_none());
        assert!(parse_ledger_line(b"{not json").is_none());
        assert!(parse_ledger_line(b"{\"session_id\":\"s\",\"cost\":1.0}").is_none());
        assert!(
            parse_ledger_line(
                b"{\"session_id\":\"s\",\"cost\":1.0,\"timestamp\":\"2026-01-01T00:00:00.5Z\"}\r"
            )
            .is_some()
        );
    }

    #[test]
    fn missing_ledger_totals_zero() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger_in(&tmp);
        assert_eq!(ledger.calculate_period(Duration::hours(24)).unwrap(), 0.0);
        assert!(ledger.entries().unwrap().is_empty());
    }

    #[test]
    fn compaction_of_missing_ledger_only_touches_marker() {
        let tmp = TempDir::new().unwrap();
        let ledger = CostLedger::new(tmp.path().join("history.jsonl"));
        assert_eq!(ledger.compact().unwrap(), CompactionReport::default());
        assert!(!ledger.path().exists());
        assert!(ledger.marker_path().exists());
    }

    #[test]
    fn marker_and_temp_live_beside_ledger() {
        let ledger = CostLedger::new("/data/costs/history.jsonl");
        assert_eq!(
            ledger.marker_path(),
            PathBuf::from("/data/costs/history.jsonl.compacted")
        );
        assert_eq!(ledger.temp_path().parent(), ledger.path().parent());
    }
}
