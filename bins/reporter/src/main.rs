//! Financial report runner.
//!
//! Generates a report for a company and period from posted ledger lines
//! and prints it as JSON. Scheduled jobs drive this per company/period;
//! with `--record`, the artifact metadata is persisted for the external
//! renderer to pick up.
//!
//! Usage:
//!   reporter <company-id> <report-type> <period-start> <period-end> [--record]
//!
//! Report types: trial_balance, balance_sheet, income_statement,
//! vat_summary, aged_receivables, aged_payables.

use std::str::FromStr;

use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grandlivre_core::reports::{
    AgeingKind, GeneratedReport, ReportEngine, ReportStatus, ReportType,
};
use grandlivre_db::repositories::{AccountRepository, EntryRepository, ReportRepository};
use grandlivre_shared::AppConfig;
use grandlivre_shared::types::{CompanyId, ReportId, UserId};

struct Args {
    company_id: CompanyId,
    report_type: ReportType,
    period_start: NaiveDate,
    period_end: NaiveDate,
    record: bool,
    user_id: Option<UserId>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut record = false;
    let mut user_id = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--record" => record = true,
            "--user" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--user requires a value"))?;
                user_id = Some(UserId::from_str(&value)?);
            }
            _ => positional.push(arg),
        }
    }

    let [company_id, report_type, period_start, period_end] = positional.as_slice() else {
        anyhow::bail!(
            "usage: reporter <company-id> <report-type> <period-start> <period-end> \
             [--record] [--user <user-id>]"
        );
    };

    Ok(Args {
        company_id: CompanyId::from_str(company_id)?,
        report_type: ReportType::from_str(report_type).map_err(|err| anyhow::anyhow!(err))?,
        period_start: period_start.parse()?,
        period_end: period_end.parse()?,
        record,
        user_id,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    let config = AppConfig::load()?;
    let db = grandlivre_db::connect(&config.database.url).await?;
    info!("Connected to database");

    let accounts = AccountRepository::new(db.clone());
    let entries = EntryRepository::new(db.clone());

    let snapshot = accounts.snapshot(args.company_id).await?;
    let lines = entries
        .query_posted_lines(args.company_id, args.period_start, args.period_end)
        .await?;

    let json = match args.report_type {
        ReportType::TrialBalance => serde_json::to_value(ReportEngine::trial_balance(
            &lines,
            &snapshot,
            args.period_start,
            args.period_end,
        )?)?,
        ReportType::BalanceSheet => serde_json::to_value(ReportEngine::balance_sheet(
            &lines,
            &snapshot,
            args.period_start,
            args.period_end,
        )?)?,
        ReportType::IncomeStatement => serde_json::to_value(ReportEngine::income_statement(
            &lines,
            &snapshot,
            args.period_start,
            args.period_end,
        )?)?,
        ReportType::VatSummary => serde_json::to_value(ReportEngine::vat_summary(
            &lines,
            &snapshot,
            args.period_start,
            args.period_end,
        )?)?,
        ReportType::AgedReceivables => serde_json::to_value(ReportEngine::aged_balances(
            AgeingKind::Receivables,
            &lines,
            &snapshot,
            args.period_end,
        ))?,
        ReportType::AgedPayables => serde_json::to_value(ReportEngine::aged_balances(
            AgeingKind::Payables,
            &lines,
            &snapshot,
            args.period_end,
        ))?,
    };

    println!("{}", serde_json::to_string_pretty(&json)?);

    if args.record {
        let reports = ReportRepository::new(db);
        let artifact = GeneratedReport {
            id: ReportId::new(),
            company_id: args.company_id,
            report_type: args.report_type,
            period_start: args.period_start,
            period_end: args.period_end,
            file_format: "json".to_string(),
            // Scheduled runs have no interactive user behind them.
            generated_by: args.user_id.unwrap_or_default(),
            status: ReportStatus::Completed,
        };
        reports.record(&artifact).await?;
        info!(artifact_id = %artifact.id, "report artifact recorded");
    }

    Ok(())
}
