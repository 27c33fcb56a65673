mod cli;
mod display;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use pulseguide_ai::{DocumentIndex, MatchMode, ResponseEnhancer, RiskClassifier};
use pulseguide_chat::{ChatError, ConversationOrchestrator, EmployeeProfile, OpenAiClient, Thread};
use pulseguide_core::{AuditLog, AuditSink};
use pulseguide_store::JsonlAuditLog;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use cli::{AuditCommand, ChatArgs, Cli, Command, EnhanceArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;
    info!("pulseguide v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Classify { ref text } => {
            let risk = RiskClassifier::new(cli.match_mode).classify(text);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&risk)?);
            } else {
                display::print_assessment(&risk);
            }
        }
        Command::Retrieve {
            ref query,
            plan,
            category,
        } => {
            let index = DocumentIndex::seeded().context("failed to build document index")?;
            let docs = index.retrieve_filtered(query, plan, category);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&docs)?);
            } else {
                display::print_documents(&docs);
            }
        }
        Command::Enhance(ref args) => cmd_enhance(&cli, args)?,
        Command::Audit { ref command } => cmd_audit(&cli, command)?,
        Command::Chat(ref args) => cmd_chat(&cli, args).await?,
    }

    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

// ── Audit backend ──

/// The configured audit log, shared as both a sink for the enhancer and a
/// readable log for the `audit` commands.
enum AuditStore {
    Jsonl(Arc<JsonlAuditLog>),
    #[cfg(feature = "duckdb")]
    Duck(Arc<pulseguide_store::DuckAuditLog>),
}

impl AuditStore {
    fn open(path: &Path) -> anyhow::Result<Self> {
        #[cfg(feature = "duckdb")]
        if path.extension().is_some_and(|ext| ext == "duckdb") {
            let log = pulseguide_store::DuckAuditLog::open_persistent(path)
                .with_context(|| format!("failed to open DuckDB audit log {}", path.display()))?;
            return Ok(Self::Duck(Arc::new(log)));
        }
        Ok(Self::Jsonl(Arc::new(JsonlAuditLog::open(path))))
    }

    fn sink(&self) -> Arc<dyn AuditSink> {
        match self {
            Self::Jsonl(log) => log.clone() as Arc<dyn AuditSink>,
            #[cfg(feature = "duckdb")]
            Self::Duck(log) => log.clone() as Arc<dyn AuditSink>,
        }
    }

    fn log(&self) -> &dyn AuditLog {
        match self {
            Self::Jsonl(log) => &**log,
            #[cfg(feature = "duckdb")]
            Self::Duck(log) => &**log,
        }
    }
}

fn build_enhancer(
    mode: MatchMode,
    index: Arc<DocumentIndex>,
    audit: &AuditStore,
) -> Arc<ResponseEnhancer> {
    Arc::new(ResponseEnhancer::new(
        RiskClassifier::new(mode),
        index,
        audit.sink(),
    ))
}

// ── Commands ──

fn cmd_enhance(cli: &Cli, args: &EnhanceArgs) -> anyhow::Result<()> {
    let audit = AuditStore::open(&cli.audit_log)?;
    let index = Arc::new(DocumentIndex::seeded().context("failed to build document index")?);
    let enhancer = build_enhancer(cli.match_mode, index, &audit);

    let result = enhancer.enhance_filtered(&args.query, &args.reply, args.plan, args.category);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_enhanced(&result);
    }
    Ok(())
}

fn cmd_audit(cli: &Cli, command: &AuditCommand) -> anyhow::Result<()> {
    let audit = AuditStore::open(&cli.audit_log)?;
    let log = audit.log();

    match command {
        AuditCommand::List => {
            let entries = log.entries().context("failed to read audit log")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                display::print_audit_log(&entries);
            }
        }
        AuditCommand::Clear => {
            let n = log.len().context("failed to read audit log")?;
            log.clear().context("failed to clear audit log")?;
            println!("Cleared {n} audit entries.");
        }
        AuditCommand::Export { path } => {
            let entries = log.entries().context("failed to read audit log")?;
            if path.extension().is_some_and(|ext| ext == "parquet") {
                pulseguide_store::write_parquet(path, &entries)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            } else {
                pulseguide_store::write_jsonl(path, &entries)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            println!("Exported {} entries to {}", entries.len(), path.display());
        }
    }
    Ok(())
}

async fn cmd_chat(cli: &Cli, args: &ChatArgs) -> anyhow::Result<()> {
    let api_key = args.api_key.clone().ok_or(ChatError::MissingApiKey)?;
    let client = OpenAiClient::new(&args.api_base, api_key, &args.model)
        .context("failed to build completion client")?;

    let audit = AuditStore::open(&cli.audit_log)?;
    let index = Arc::new(DocumentIndex::seeded().context("failed to build document index")?);
    let enhancer = build_enhancer(cli.match_mode, index.clone(), &audit);
    let orchestrator = ConversationOrchestrator::new(client, index, enhancer);

    let profile = EmployeeProfile {
        name: args.name.clone(),
        plan: args.plan,
    };
    let mut thread = Thread::new(format!("cli-{}", Utc::now().timestamp()), Some(profile));
    println!(
        "Chatting as {} ({} plan). Type 'exit' to quit.",
        args.name, args.plan
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        match orchestrator.send(&mut thread, text).await {
            Ok(result) => {
                println!("\n{}\n", result.render());
                if result.needs_human_escalation {
                    println!(
                        "[escalated to HR: {}]\n",
                        result.risk.triggers().join(", ")
                    );
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    info!(turns = thread.messages().len() / 2, "chat session ended");
    Ok(())
}
