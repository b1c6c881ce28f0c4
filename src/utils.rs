use chrono::{DateTime, Duration, Local, NaiveTime, Utc};
use std::io::Read;
use std::path::PathBuf;

/// Cached totals and other cache entries older than this are pruned at startup.
pub const CACHE_PRUNE_DAYS: i64 = 30;

/// Claude data roots that contain a `projects` directory.
///
/// An explicit comma-separated list wins when at least one entry is usable;
/// otherwise `~/.claude` then `$XDG_CONFIG_HOME/claude` are probed.
pub fn claude_paths(override_env: Option<&str>) -> Vec<PathBuf> {
    let mut paths = vec![];
    if let Some(list) = override_env {
        for p in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let pb = PathBuf::from(p);
            if pb.join("projects").is_dir() {
                paths.push(pb);
            }
        }
        if !paths.is_empty() {
            return paths;
        }
    }
    let home = home_dir();
    let xdg_config = directories::BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| home.join(".config"));
    // Prefer ~/.claude, then XDG config
    for base in [home.join(".claude"), xdg_config.join("claude")] {
        if base.join("projects").is_dir() && !paths.contains(&base) {
            paths.push(base);
        }
    }
    paths
}

fn home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~"))
}

/// `<user cache dir>/claude-statusline`
pub fn default_cache_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.cache_dir().to_path_buf())
        .unwrap_or_else(|| home_dir().join(".cache"))
        .join("claude-statusline")
}

/// `~/.claude/statusline/costs/history.jsonl`
pub fn default_ledger_path() -> PathBuf {
    home_dir()
        .join(".claude")
        .join("statusline")
        .join("costs")
        .join("history.jsonl")
}

pub fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn format_currency(v: f64) -> String {
    format!("{v:.2}")
}

/// Start of the local calendar day containing `now`, in UTC.
pub fn local_midnight(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump; use the current offset
        None => (midnight - Duration::seconds(now.offset().local_minus_utc() as i64)).and_utc(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(format_currency(0.0), "0.00");
        assert_eq!(format_currency(0.02375), "0.02");
        assert_eq!(format_currency(12.3456), "12.35");
    }

    #[test]
    fn midnight_is_not_after_now() {
        let now = Local::now();
        let midnight = local_midnight(now);
        assert!(midnight <= now.with_timezone(&Utc));
        assert!(now.with_timezone(&Utc) - midnight < Duration::hours(25));
        assert_eq!(midnight.with_timezone(&Local).date_naive(), now.date_naive());
    }

    #[test]
    fn override_paths_require_projects_dir() {
        let good = TempDir::new().unwrap();
        std::fs::create_dir(good.path().join("projects")).unwrap();
        let bad = TempDir::new().unwrap();
        let list = format!("{}, ,{}", bad.path().display(), good.path().display());
        assert_eq!(claude_paths(Some(&list)), vec![good.path().to_path_buf()]);
    }

    #[test]
    fn default_paths_end_in_expected_names() {
        assert!(default_cache_dir().ends_with("claude-statusline"));
        assert!(default_ledger_path().ends_with(".claude/statusline/costs/history.jsonl"));
    }
}
