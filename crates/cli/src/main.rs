mod cli;
mod pipeline;
mod terminal;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use tenderlens_core::config::{load_dotenv, Config};
use tenderlens_core::{AnalysisFlow, Document};
use tenderlens_ingest::TextExtractor;
use tenderlens_llm::Analyzer;
use tenderlens_report::REPORT_FILE_NAME;
use tenderlens_storage::{ConstraintStore, FileConstraintStore, SessionConstraints};

use crate::cli::{CliArgs, Command, ConstraintsAction};
use crate::pipeline::Pipeline;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let terminal = Terminal::new();

    let config = Config::from_env();
    config.log_summary();

    if let Err(e) = run(args.command, &terminal, config).await {
        error!("Command failed: {:#}", e);
        terminal.print_error(&format!("{:#}", e))?;
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Command, terminal: &Terminal, config: Config) -> Result<()> {
    let store = FileConstraintStore::from_config(&config);
    let pipeline = Pipeline::new(TextExtractor::from_config(&config.ocr), Box::new(store));

    match command {
        Command::Constraints { action } => run_constraints(&pipeline, terminal, action),
        Command::Extract { file } => run_extract(&pipeline, terminal, &file),
        Command::Analyze {
            file,
            flow,
            rules,
            save_rules,
            export,
            yes,
            model,
            api_key,
        } => {
            let mut config = config;
            if let Some(model) = model {
                config.llm.model = model;
            }
            if let Some(key) = api_key {
                config.llm.api_key = key;
            }
            let request = AnalyzeRequest {
                file,
                flow,
                session: rules.iter().collect(),
                save_rules,
                export: export.unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME)),
                auto_approve: yes,
            };
            run_analyze(&pipeline, terminal, &config, request).await
        }
    }
}

struct AnalyzeRequest {
    file: PathBuf,
    flow: AnalysisFlow,
    session: SessionConstraints,
    save_rules: Vec<String>,
    export: PathBuf,
    auto_approve: bool,
}

fn run_constraints(pipeline: &Pipeline, terminal: &Terminal, action: ConstraintsAction) -> Result<()> {
    match action {
        ConstraintsAction::List => {
            terminal.print_header("Saved constraints")?;
            terminal.print_rules(&pipeline.store().rules())?;
        }
        ConstraintsAction::Add { rule } => {
            if rule.trim().is_empty() {
                bail!("constraint is empty, nothing saved");
            }
            pipeline.save_constraint(&rule).context("failed to save constraint")?;
            terminal.print_info("Constraint saved.")?;
        }
    }
    Ok(())
}

fn run_extract(pipeline: &Pipeline, terminal: &Terminal, file: &Path) -> Result<()> {
    let doc = Document::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let prepared = pipeline.prepare(&doc)?;
    terminal.print_document(
        &doc.filename,
        prepared.extracted.method.as_str(),
        &prepared.language,
        prepared.extracted.text.chars().count(),
    )?;
    terminal.print_text(&prepared.extracted.text)?;
    Ok(())
}

async fn run_analyze(
    pipeline: &Pipeline,
    terminal: &Terminal,
    config: &Config,
    request: AnalyzeRequest,
) -> Result<()> {
    for rule in &request.save_rules {
        if rule.trim().is_empty() {
            continue;
        }
        pipeline.save_constraint(rule).context("failed to save constraint")?;
        info!(rule = %rule.trim(), "Constraint saved");
    }

    let doc = Document::read(&request.file)
        .with_context(|| format!("failed to read {}", request.file.display()))?;

    let prepared = pipeline.prepare(&doc)?;
    terminal.print_document(
        &doc.filename,
        prepared.extracted.method.as_str(),
        &prepared.language,
        prepared.extracted.text.chars().count(),
    )?;

    let analyzer = Analyzer::from_config(&config.llm)
        .context("cannot analyze; set OPENAI_API_KEY or add openai_api_key to the secrets file")?;

    let spinner = terminal.start_spinner("Analyzing...")?;
    let result = pipeline
        .analyze(&analyzer, request.flow, &request.session, &prepared)
        .await;
    spinner.stop();

    let mut summary = result?;

    terminal.print_header(&format!("{} summary", request.flow))?;
    terminal.print_summary(summary.text())?;

    let approved = request.auto_approve
        || terminal
            .confirm("Approve this summary and export it?")
            .context("failed to read confirmation")?;
    if !approved {
        terminal.print_info("Summary not approved; nothing exported.")?;
        return Ok(());
    }
    summary.approve();

    if let Some(path) = pipeline::export(&summary, &request.export)? {
        terminal.print_info(&format!("Saved {}", path.display()))?;
    }
    Ok(())
}
