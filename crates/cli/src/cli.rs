use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tenderlens_core::AnalysisFlow;

/// Construction project document analysis.
///
/// Extracts text from PDF/DOCX project documents (OCR for scanned PDFs),
/// asks an LLM for a summary steered by saved constraints, and exports the
/// approved summary to a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "tenderlens", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a project document and optionally export the summary
    Analyze {
        /// PDF or DOCX file to analyze
        file: PathBuf,

        /// Analysis flow: book or cost
        #[arg(long, default_value = "book")]
        flow: AnalysisFlow,

        /// Temporary rule for this run only (repeatable)
        #[arg(long = "rule")]
        rules: Vec<String>,

        /// Rule to save permanently before analyzing (repeatable)
        #[arg(long = "save-rule")]
        save_rules: Vec<String>,

        /// Where to write the spreadsheet (default: ./project_summary.xlsx)
        #[arg(long)]
        export: Option<PathBuf>,

        /// Approve the summary without asking
        #[arg(long, short = 'y')]
        yes: bool,

        /// Model name override
        #[arg(long)]
        model: Option<String>,

        /// API key (overrides env var and secrets file)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the extracted text of a document without analyzing it
    Extract {
        /// PDF or DOCX file
        file: PathBuf,
    },

    /// Manage saved constraints
    Constraints {
        #[command(subcommand)]
        action: ConstraintsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConstraintsAction {
    /// List saved constraints in the order they were added
    List,
    /// Save a new constraint
    Add {
        /// Rule text
        rule: String,
    },
}
