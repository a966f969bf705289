//! FEC import runner.
//!
//! Parses and validates an FEC export against a company's chart of
//! accounts, prints the import summary as JSON, and optionally commits
//! the validated entries.
//!
//! Usage:
//!   importer <company-id> <file> [--commit] [--all-or-nothing]

use std::process::ExitCode;
use std::str::FromStr;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grandlivre_core::fec::{CancelFlag, ImportPipeline};
use grandlivre_db::repositories::{
    AccountRepository, CommitPolicy, EntryRepository, JournalRepository, PeriodRepository,
};
use grandlivre_shared::AppConfig;
use grandlivre_shared::types::CompanyId;

struct Args {
    company_id: CompanyId,
    file: String,
    commit: bool,
    all_or_nothing: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut commit = false;
    let mut all_or_nothing = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--commit" => commit = true,
            "--all-or-nothing" => all_or_nothing = true,
            _ => positional.push(arg),
        }
    }

    let [company_id, file] = positional.as_slice() else {
        anyhow::bail!("usage: importer <company-id> <file> [--commit] [--all-or-nothing]");
    };

    Ok(Args {
        company_id: CompanyId::from_str(company_id)?,
        file: file.clone(),
        commit,
        all_or_nothing,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grandlivre=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;

    // Load configuration and connect
    let config = AppConfig::load()?;
    let db = grandlivre_db::connect(&config.database.url).await?;
    info!("Connected to database");

    // As-of views for the whole run: a concurrent chart-of-accounts edit
    // does not affect an import already underway.
    let accounts = AccountRepository::new(db.clone());
    let journals = JournalRepository::new(db.clone());
    let periods = PeriodRepository::new(db.clone());
    let snapshot = accounts.snapshot(args.company_id).await?;
    let journal_list = journals.list_journals(args.company_id).await?;

    // The validator needs an open-period verdict per entry date; resolve
    // the open ranges once up front to keep the pipeline synchronous.
    let open_ranges = periods.list_open_ranges(args.company_id).await?;

    let text = tokio::fs::read_to_string(&args.file).await?;
    let pipeline = ImportPipeline::new(config.import.default_currency.clone());
    let outcome = pipeline.run(
        &text,
        &snapshot,
        &journal_list,
        |date| open_ranges.iter().any(|(start, end)| date >= *start && date <= *end),
        &CancelFlag::new(),
    )?;

    println!("{}", serde_json::to_string_pretty(&outcome.summary)?);

    let valid = outcome.valid_entries().count();
    let failed = outcome.summary.num_entries - valid;
    info!(valid, failed, "import validated");

    if args.commit {
        let policy = if args.all_or_nothing {
            CommitPolicy::AllOrNothing
        } else {
            CommitPolicy::PerEntry
        };
        let entries = EntryRepository::new(db);
        let committed = entries
            .commit_import(&outcome.candidates, &snapshot, policy)
            .await?;
        info!(
            posted = committed.posted.len(),
            failed = committed.failed.len(),
            "import committed"
        );
        for (key, number) in &committed.posted {
            println!("posted {key} as {number}");
        }
        for (key, error) in &committed.failed {
            eprintln!("failed {key}: {error}");
        }
    }

    // Non-zero exit when anything needs operator attention.
    if failed > 0 || !outcome.summary.errors.is_empty() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
