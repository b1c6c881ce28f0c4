//! # Display Module
//!
//! Formats the cost figures as a colored status line or a JSON object.

#[cfg(feature = "colors")]
use owo_colors::OwoColorize;

// Shim for no-color builds so the same method chains compile
#[cfg(not(feature = "colors"))]
pub mod color_shim {
    use std::fmt::{self, Display, Formatter};

    #[derive(Clone)]
    pub struct Plain(pub String);

    impl Display for Plain {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    pub trait ColorizeShim {
        fn as_str(&self) -> &str;

        fn bright_black(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_white(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bright_cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn cyan(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn red(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn yellow(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn white(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn bold(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
        fn dimmed(&self) -> Plain {
            Plain(self.as_str().to_string())
        }
    }

    impl ColorizeShim for &str {
        fn as_str(&self) -> &str {
            self
        }
    }
    impl ColorizeShim for String {
        fn as_str(&self) -> &str {
            self.as_str()
        }
    }
    impl ColorizeShim for Plain {
        fn as_str(&self) -> &str {
            &self.0
        }
    }
}

#[cfg(not(feature = "colors"))]
use color_shim::ColorizeShim as OwoColorize;

use crate::cli::LabelsArg;
use crate::models::HookJson;
use crate::utils::format_currency;

/// Every figure the cost line shows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostSummary {
    /// Live session cost reported by Claude Code
    pub live: f64,
    /// Transcripts since local midnight
    pub today: f64,
    /// Transcripts, trailing 7 days
    pub week: f64,
    /// Transcripts, trailing 30 days
    pub month: f64,
    /// Ledger, trailing 24 hours
    pub ledger_day: f64,
}

fn colorize_spend(v: f64) -> String {
    let s = format_currency(v);
    if v >= 100.0 {
        s.bold().red().to_string()
    } else if v >= 50.0 {
        s.bold().yellow().to_string()
    } else if v >= 20.0 {
        s.yellow().to_string()
    } else {
        s.white().to_string()
    }
}

/// The status line text, without a trailing newline.
///
/// The 24-hour ledger total appears after the live cost when it is non-zero.
pub fn format_text_line(summary: &CostSummary, labels: LabelsArg) -> String {
    let names: [&str; 5] = match labels {
        LabelsArg::Short => ["LIVE", "DAY", "TODAY", "7DAY", "30DAY"],
        LabelsArg::Long => ["session", "24h ledger", "today", "7 days", "30 days"],
    };
    let sep = format!(" {} ", "·".bright_black().dimmed());
    let live = format!(
        "{} {}{}",
        names[0].bright_black().dimmed(),
        "$".bold().bright_white(),
        format_currency(summary.live).bold().bright_white()
    );
    let segment = |name: &str, v: f64| {
        format!(
            "{} {}{}",
            name.bright_black().dimmed(),
            "$".white(),
            colorize_spend(v)
        )
    };
    let mut parts = vec![live];
    // Ledger total is shown only once something has been recorded
    if summary.ledger_day > 0.0 {
        parts.push(segment(names[1], summary.ledger_day));
    }
    parts.extend(
        [summary.today, summary.week, summary.month]
            .into_iter()
            .zip(names[2..].iter().copied())
            .map(|(v, name)| segment(name, v)),
    );
    format!("{} {}", "❯".bright_cyan(), parts.join(sep.as_str()))
}

pub fn print_text_output(summary: &CostSummary, labels: LabelsArg) {
    println!("{}", format_text_line(summary, labels));
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn build_json_output(hook: &HookJson, summary: &CostSummary) -> serde_json::Value {
    serde_json::json!({
        "session_id": hook.session_id,
        "model": hook.model.as_ref().map(|m| serde_json::json!({
            "id": m.id,
            "display_name": m.display_name,
        })),
        "cost": {
            "live": round_cents(summary.live),
            "today": round_cents(summary.today),
            "week": round_cents(summary.week),
            "month": round_cents(summary.month),
            "ledger_24h": round_cents(summary.ledger_day),
        },
    })
}

pub fn print_json_output(hook: &HookJson, summary: &CostSummary) -> anyhow::Result<()> {
    let json = build_json_output(hook, summary);
    println!("{}", serde_json::to_string(&json)?);
    Ok(())
}
