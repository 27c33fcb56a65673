use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pulseguide_ai::MatchMode;
use pulseguide_core::{BenefitCategory, HealthPlan};

#[derive(Debug, Parser)]
#[command(
    name = "pulseguide",
    version,
    about = "Risk scoring, citations and audit for benefits chat replies"
)]
pub struct Cli {
    /// Audit log location. JSON lines, or a DuckDB file (`.duckdb`) when
    /// built with the `duckdb` feature.
    #[arg(
        long,
        global = true,
        env = "PULSEGUIDE_AUDIT_LOG",
        default_value = "pulseguide-audit.jsonl"
    )]
    pub audit_log: PathBuf,

    /// Pattern matching: `substring` or `word-boundary`.
    #[arg(
        long,
        global = true,
        env = "PULSEGUIDE_MATCH_MODE",
        default_value = "substring"
    )]
    pub match_mode: MatchMode,

    /// Emit JSON instead of cards.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a piece of text.
    Classify {
        text: String,
    },
    /// List policy documents matching a query.
    Retrieve {
        query: String,
        #[arg(long, default_value = "all")]
        plan: HealthPlan,
        /// Benefit category: health, dental, vision, retirement, leave,
        /// compliance or all.
        #[arg(long, default_value = "all")]
        category: BenefitCategory,
    },
    /// Enhance one completed exchange and append it to the audit log.
    Enhance(EnhanceArgs),
    /// Inspect or export the audit log.
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
    },
    /// Interactive chat over stdin.
    Chat(ChatArgs),
}

#[derive(Debug, Args)]
pub struct EnhanceArgs {
    #[arg(long)]
    pub query: String,

    #[arg(long)]
    pub reply: String,

    #[arg(long, default_value = "all")]
    pub plan: HealthPlan,

    #[arg(long, default_value = "all")]
    pub category: BenefitCategory,
}

#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    List,
    Clear,
    /// Write all entries to PATH: Parquet for `.parquet`, JSON lines otherwise.
    Export {
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub plan: HealthPlan,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "PULSEGUIDE_API_BASE", default_value = "https://api.openai.com")]
    pub api_base: String,

    #[arg(long, env = "PULSEGUIDE_MODEL", default_value = "gpt-3.5-turbo")]
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_enhance_with_plan() {
        let cli = Cli::try_parse_from([
            "pulseguide",
            "enhance",
            "--query",
            "what is my copay",
            "--reply",
            "$20",
            "--plan",
            "ppo",
        ])
        .unwrap();
        match cli.command {
            Command::Enhance(args) => {
                assert_eq!(args.plan, HealthPlan::Ppo);
                assert_eq!(args.category, BenefitCategory::All);
                assert_eq!(args.reply, "$20");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pulseguide",
            "classify",
            "I feel harassed",
            "--match-mode",
            "word-boundary",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.match_mode, MatchMode::WordBoundary);
        assert!(cli.json);
    }

    #[test]
    fn parses_retrieve_category() {
        let cli = Cli::try_parse_from(["pulseguide", "retrieve", "fmla", "--category", "leave"])
            .unwrap();
        match cli.command {
            Command::Retrieve { plan, category, .. } => {
                assert_eq!(plan, HealthPlan::All);
                assert_eq!(category, BenefitCategory::TimeOff);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(
            Cli::try_parse_from(["pulseguide", "retrieve", "fmla", "--category", "pets"]).is_err()
        );
    }

    #[test]
    fn rejects_unknown_plan() {
        assert!(Cli::try_parse_from(["pulseguide", "retrieve", "copay", "--plan", "epo"]).is_err());
    }

    #[test]
    fn audit_export_path() {
        let cli = Cli::try_parse_from(["pulseguide", "audit", "export", "out.parquet"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Audit { command: AuditCommand::Export { ref path } } if path.ends_with("out.parquet")
        ));
    }
}
