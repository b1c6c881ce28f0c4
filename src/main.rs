use anyhow::{Context, Result};
use chrono::Duration;
#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

use claude_costline::cache::DiskCache;
use claude_costline::cli::Args;
#[cfg(not(feature = "colors"))]
use claude_costline::display::color_shim::ColorizeShim;
use claude_costline::display::{print_json_output, print_text_output, CostSummary};
use claude_costline::ledger::CostLedger;
use claude_costline::logging::init_logging;
use claude_costline::models::{HookJson, LedgerEntry};
use claude_costline::usage::TranscriptScanner;
use claude_costline::utils::{
    claude_paths, default_cache_dir, default_ledger_path, read_stdin, CACHE_PRUNE_DAYS,
};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let stdin = read_stdin()?;
    if stdin.trim_ascii().is_empty() {
        println!(
            "Claude Code\n{} {}",
            "❯".cyan(),
            "[waiting for valid input]".dimmed()
        );
        return Ok(());
    }
    let hook: HookJson = serde_json::from_slice(&stdin).context("parse hook json")?;

    let paths = claude_paths(args.claude_config_dir.as_deref());
    let cache = DiskCache::new(args.cache_dir.clone().unwrap_or_else(default_cache_dir));
    // A missing cache dir on first run is expected
    if let Err(e) = cache.prune(Duration::days(CACHE_PRUNE_DAYS)) {
        tracing::debug!(error = %e, "cache prune skipped");
    }
    let ledger = CostLedger::new(
        args.ledger_path
            .clone()
            .unwrap_or_else(default_ledger_path),
    );

    // Live cost reporter: persist the snapshot before any totals are read
    let live = hook.live_cost();
    if !args.no_ledger && !hook.session_id.is_empty() && live > 0.0 {
        if let Err(e) = ledger.append(&LedgerEntry::now(&hook.session_id, live)) {
            tracing::warn!(error = %e, "could not record session cost");
        }
    }

    let scanner = TranscriptScanner::for_claude_paths(&paths, cache);
    let ledger_day = ledger
        .calculate_period(Duration::hours(24))
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read cost ledger");
            0.0
        });
    let summary = CostSummary {
        live,
        today: scanner.calculate_today(),
        week: scanner.calculate_period(Duration::days(7)),
        month: scanner.calculate_period(Duration::days(30)),
        ledger_day,
    };

    if args.json {
        print_json_output(&hook, &summary)?;
        return Ok(());
    }

    print_text_output(&summary, args.labels);

    if args.debug {
        eprintln!();
        eprintln!("{}", "=== Debug Information ===".bright_black());
        eprintln!(
            "Session: {} (live ${:.2})",
            if hook.session_id.is_empty() {
                "<none>"
            } else {
                hook.session_id.as_str()
            },
            live
        );
        eprintln!(
            "Transcript roots: {:?}",
            scanner
                .roots()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
        );
        eprintln!(
            "Today: ${:.2} · 7d: ${:.2} · 30d: ${:.2}",
            summary.today, summary.week, summary.month
        );
        eprintln!(
            "Ledger: {} (24h: ${:.2}, recording: {})",
            ledger.path().display(),
            summary.ledger_day,
            if args.no_ledger { "off" } else { "on" }
        );
        eprintln!("{}", "========================".bright_black());
    }
    Ok(())
}
