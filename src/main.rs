//! outcomes-import CLI
//!
//! Submits spreadsheets to the outcomes server and follows their progress.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;

use outcomes_import_lib::modules::data_import::commands::{self, ImportFileRequest};
use outcomes_import_lib::modules::data_import::domain::{
    Confirmation, ConflictStrategy, StaticConfirmation,
};
use outcomes_import_lib::modules::data_import::presentation;
use outcomes_import_lib::shared::config::AppConfig;
use outcomes_import_lib::shared::utils::init_logger;
use outcomes_import_lib::AppContext;

#[derive(Debug, Parser)]
#[command(name = "outcomes-import")]
#[command(about = "Import spreadsheets into the outcomes system", long_about = None)]
struct Cli {
    /// Server base URL, overrides OUTCOMES_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// CSRF token sent with every request, overrides OUTCOMES_CSRF_TOKEN
    #[arg(long, global = true)]
    csrf_token: Option<String>,

    /// Server page to read the CSRF token from when none is given
    #[arg(long, global = true)]
    csrf_page: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Upload a spreadsheet and wait for the import to finish
    Import(ImportArgs),
    /// Check a spreadsheet without importing anything
    Validate(ValidateArgs),
    /// Show the current progress of a submitted import
    Status(StatusArgs),
}

#[derive(Debug, Args)]
struct ImportArgs {
    /// Spreadsheet to import
    file: Option<PathBuf>,

    /// keep_existing, use_theirs or merge
    #[arg(long, default_value = "use_theirs")]
    strategy: ConflictStrategy,

    /// Server-side adapter that interprets the spreadsheet
    #[arg(long)]
    adapter: Option<String>,

    /// Run the import without saving anything
    #[arg(long)]
    dry_run: bool,

    /// Delete ALL existing data before importing
    #[arg(long)]
    delete_existing: bool,

    /// Do not ask before deleting existing data
    #[arg(short, long)]
    yes: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Spreadsheet to check
    file: Option<PathBuf>,

    #[arg(long)]
    adapter: Option<String>,
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Progress id printed when the import was submitted
    progress_id: String,
}

/// Asks on the terminal and accepts only an explicit yes
struct PromptConfirmation;

impl Confirmation for PromptConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() {
    init_logger();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    if let Some(token) = cli.csrf_token {
        config = config.with_csrf_token(token);
    }
    if cli.csrf_page.is_some() {
        config.csrf_page = cli.csrf_page;
    }

    let ctx = AppContext::initialize(config)?;
    spawn_event_printer(&ctx);

    match cli.command {
        Commands::Import(args) => {
            let confirmation: Box<dyn Confirmation> = if args.yes {
                Box::new(StaticConfirmation(true))
            } else {
                Box::new(PromptConfirmation)
            };
            let request = ImportFileRequest {
                path: args.file,
                conflict_strategy: args.strategy,
                dry_run: args.dry_run,
                adapter_name: args.adapter,
                delete_existing: args.delete_existing,
            };

            let done = commands::import_file(&ctx, request, confirmation.as_ref()).await?;
            print!(
                "{}",
                presentation::render_import_report(&done.report, done.job.dry_run())
            );
        }
        Commands::Validate(args) => {
            let report = commands::validate_file(&ctx, args.file.as_deref(), args.adapter).await?;
            print!("{}", presentation::render_validation_report(&report));
        }
        Commands::Status(args) => {
            let status = commands::check_status(&ctx, &args.progress_id).await?;
            println!("{}", presentation::render_progress(&status.view));
            if let Some(report) = &status.report {
                print!("{}", presentation::render_import_report(report, false));
            }
            if let Some(error) = &status.error {
                println!("Import failed: {}", error);
            }
        }
    }

    Ok(())
}

/// Mirror progress events to stderr while a command runs
fn spawn_event_printer(ctx: &AppContext) {
    let mut events = ctx.events.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(envelope) => {
                    if let Some(line) = presentation::render_event(&envelope.payload) {
                        eprintln!("{}", line);
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });
}
