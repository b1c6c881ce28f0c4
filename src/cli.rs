use std::path::PathBuf;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelsArg {
    Short,
    Long,
}

#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Force Claude data path(s), comma-separated. Defaults to ~/.claude and ~/.config/claude
    #[arg(long, env = "CLAUDE_CONFIG_DIR")]
    pub claude_config_dir: Option<String>,

    /// Directory for cached window totals
    #[arg(long, env = "CLAUDE_STATUSLINE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Cost ledger file (JSONL)
    #[arg(long, env = "CLAUDE_STATUSLINE_LEDGER")]
    pub ledger_path: Option<PathBuf>,

    /// Do not record the live session cost in the ledger
    #[arg(long)]
    pub no_ledger: bool,

    /// Emit JSON instead of colored text
    #[arg(long)]
    pub json: bool,

    /// Label verbosity for text output: short|long
    #[arg(long, value_enum, default_value_t = LabelsArg::Short)]
    pub labels: LabelsArg,

    /// Debug mode: log to stderr and print a summary after the status line
    #[arg(long, env = "CLAUDE_DEBUG")]
    pub debug: bool,
}

impl Args {
    pub fn parse() -> Self {
        <Args as clap::Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn defaults() {
        let args = Args::try_parse_from(["claude_costline"]).unwrap();
        assert!(!args.json);
        assert!(!args.no_ledger);
        assert_eq!(args.labels, LabelsArg::Short);
    }

    #[test]
    fn explicit_flags() {
        let args = Args::try_parse_from([
            "claude_costline",
            "--json",
            "--labels",
            "long",
            "--ledger-path",
            "/tmp/l.jsonl",
            "--no-ledger",
        ])
        .unwrap();
        assert!(args.json && args.no_ledger);
        assert_eq!(args.labels, LabelsArg::Long);
        assert_eq!(args.ledger_path, Some(PathBuf::from("/tmp/l.jsonl")));
    }

    #[test]
    #[serial]
    fn paths_from_env() {
        unsafe {
            env::set_var("CLAUDE_STATUSLINE_LEDGER", "/tmp/env-ledger.jsonl");
            env::set_var("CLAUDE_STATUSLINE_CACHE_DIR", "/tmp/env-cache");
        }
        let args = Args::try_parse_from(["claude_costline"]).unwrap();
        assert_eq!(args.ledger_path, Some(PathBuf::from("/tmp/env-ledger.jsonl")));
        assert_eq!(args.cache_dir, Some(PathBuf::from("/tmp/env-cache")));

        // Flags beat the environment
        let args =
            Args::try_parse_from(["claude_costline", "--ledger-path", "/tmp/flag.jsonl"]).unwrap();
        assert_eq!(args.ledger_path, Some(PathBuf::from("/tmp/flag.jsonl")));

        unsafe {
            env::remove_var("CLAUDE_STATUSLINE_LEDGER");
            env::remove_var("CLAUDE_STATUSLINE_CACHE_DIR");
        }
    }
}
