//! The report aggregation engine.
//!
//! A pure read-side aggregator: it walks posted lines already fetched for
//! a period, never mutates ledger state, and holds no cross-call state.
//! Given the same ledger snapshot and period it produces identical output
//! on every run (rows are ordered by account number).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::error;

use crate::coa::{AccountSnapshot, classify};
use crate::ledger::entry::EntryStatus;

use super::ageing::{AgedEntry, AgeingKind, AgeingReport, band_index};
use super::error::ReportError;
use super::template::{
    StatementReport, balance_sheet_template, income_statement_template,
};
use super::types::{
    AccountAggregate, PostedLine, ReportLine, ReportOutcome, TrialBalance, VatReport,
};

/// Service generating financial reports from posted lines.
pub struct ReportEngine;

impl ReportEngine {
    /// Generates the trial balance for a period.
    ///
    /// Beyond the per-entry invariant enforced at posting time, the
    /// period-wide sums are re-checked here: a mismatch means ledger
    /// corruption and surfaces as an integrity error, never a silent zero.
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted date range or a period-wide
    /// debit/credit mismatch.
    pub fn trial_balance(
        lines: &[PostedLine],
        snapshot: &AccountSnapshot,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<ReportOutcome<TrialBalance>, ReportError> {
        if period_start > period_end {
            return Err(ReportError::InvalidDateRange {
                start: period_start,
                end: period_end,
            });
        }

        let in_period: Vec<&PostedLine> = lines
            .iter()
            .filter(|line| line.status.is_reportable())
            .filter(|line| line.entry_date >= period_start && line.entry_date <= period_end)
            .collect();

        if in_period.is_empty() {
            return Ok(ReportOutcome::Empty);
        }

        let rows = Self::aggregate(&in_period, snapshot);
        let total_debit: Decimal = rows.iter().map(|row| row.total_debit).sum();
        let total_credit: Decimal = rows.iter().map(|row| row.total_credit).sum();

        if total_debit != total_credit {
            error!(
                %total_debit,
                %total_credit,
                %period_start,
                %period_end,
                "trial balance mismatch across posted entries"
            );
            return Err(ReportError::TrialBalanceMismatch {
                total_debit,
                total_credit,
            });
        }

        Ok(ReportOutcome::Ready(TrialBalance {
            period_start,
            period_end,
            rows,
            total_debit,
            total_credit,
        }))
    }

    /// Generates the balance sheet for a period.
    ///
    /// Built on the trial balance (inheriting its integrity check) and the
    /// declarative balance sheet template.
    ///
    /// # Errors
    ///
    /// Propagates trial balance errors and template evaluation errors.
    pub fn balance_sheet(
        lines: &[PostedLine],
        snapshot: &AccountSnapshot,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<ReportOutcome<StatementReport>, ReportError> {
        Self::statement(
            &balance_sheet_template(),
            lines,
            snapshot,
            period_start,
            period_end,
        )
    }

    /// Generates the income statement for a period.
    ///
    /// # Errors
    ///
    /// Propagates trial balance errors and template evaluation errors.
    pub fn income_statement(
        lines: &[PostedLine],
        snapshot: &AccountSnapshot,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<ReportOutcome<StatementReport>, ReportError> {
        Self::statement(
            &income_statement_template(),
            lines,
            snapshot,
            period_start,
            period_end,
        )
    }

    fn statement(
        template: &super::template::ReportTemplate,
        lines: &[PostedLine],
        snapshot: &AccountSnapshot,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<ReportOutcome<StatementReport>, ReportError> {
        match Self::trial_balance(lines, snapshot, period_start, period_end)? {
            ReportOutcome::Empty => Ok(ReportOutcome::Empty),
            ReportOutcome::Ready(trial) => {
                let report = template.evaluate(&trial.rows, period_start, period_end)?;
                Ok(ReportOutcome::Ready(report))
            }
        }
    }

    /// Generates the VAT summary for a period.
    ///
    /// # Errors
    ///
    /// Propagates trial balance errors.
    pub fn vat_summary(
        lines: &[PostedLine],
        snapshot: &AccountSnapshot,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<ReportOutcome<VatReport>, ReportError> {
        let trial = match Self::trial_balance(lines, snapshot, period_start, period_end)? {
            ReportOutcome::Empty => return Ok(ReportOutcome::Empty),
            ReportOutcome::Ready(trial) => trial,
        };

        let mut collected = Decimal::ZERO;
        let mut deductible = Decimal::ZERO;
        let mut turnover_base = Decimal::ZERO;
        for row in &trial.rows {
            if row.account_number.starts_with("4457") {
                collected += row.total_credit - row.total_debit;
            } else if row.account_number.starts_with("4456") {
                deductible += row.total_debit - row.total_credit;
            }
            if row.account_number.starts_with('7') {
                turnover_base += row.total_credit - row.total_debit;
            }
        }

        Ok(ReportOutcome::Ready(VatReport {
            period_start,
            period_end,
            collected,
            deductible,
            net: collected - deductible,
            turnover_base,
        }))
    }

    /// Generates an aged receivables or payables report.
    ///
    /// Open items are posted entries not yet reconciled, on customer
    /// (`41*`) or supplier (`40*`) accounts. The outstanding amount per
    /// entry is bucketed by days since its due date at `as_of`; entries
    /// without a due date age from their entry date.
    pub fn aged_balances(
        kind: AgeingKind,
        lines: &[PostedLine],
        snapshot: &AccountSnapshot,
        as_of: NaiveDate,
    ) -> ReportOutcome<AgeingReport> {
        let reportable: Vec<&PostedLine> = lines
            .iter()
            .filter(|line| line.status.is_reportable())
            .collect();
        if reportable.is_empty() {
            return ReportOutcome::Empty;
        }

        // One open item per (entry, account), keyed for deterministic order.
        let mut open: BTreeMap<(String, NaiveDate, grandlivre_shared::types::EntryId), AgedEntry> =
            BTreeMap::new();

        for line in reportable {
            if line.status != EntryStatus::Posted {
                continue;
            }
            let Some(account) = snapshot.get(line.account_id) else {
                continue;
            };
            if !account.number.starts_with(kind.account_prefix()) {
                continue;
            }

            let due_date = line.due_date.unwrap_or(line.entry_date);
            let amount = kind.outstanding(line.debit, line.credit);
            let key = (account.number.clone(), due_date, line.entry_id);
            let item = open.entry(key).or_insert_with(|| AgedEntry {
                entry_id: line.entry_id,
                account_number: account.number.clone(),
                account_name: account.name.clone(),
                reference: line.reference.clone(),
                due_date,
                days_outstanding: (as_of - due_date).num_days().max(0),
                outstanding: Decimal::ZERO,
                band: band_index((as_of - due_date).num_days()),
            });
            item.outstanding += amount;
        }

        let mut band_totals = [Decimal::ZERO; 4];
        let mut total = Decimal::ZERO;
        let entries: Vec<AgedEntry> = open
            .into_values()
            .filter(|item| !item.outstanding.is_zero())
            .inspect(|item| {
                band_totals[item.band] += item.outstanding;
                total += item.outstanding;
            })
            .collect();

        ReportOutcome::Ready(AgeingReport {
            kind,
            as_of,
            entries,
            band_totals,
            total,
        })
    }

    /// Flattens a trial balance into derived report lines, one per
    /// account, with the oriented amount and PCG classification.
    #[must_use]
    pub fn account_lines(trial: &TrialBalance) -> Vec<ReportLine> {
        trial
            .rows
            .iter()
            .map(|row| {
                let classification = classify(&row.account_number);
                let amount = match classification.account_type() {
                    Some(account_type) => {
                        account_type.balance_change(row.total_debit, row.total_credit)
                    }
                    None => row.balance(),
                };
                ReportLine {
                    account_number: row.account_number.clone(),
                    account_name: row.account_name.clone(),
                    amount,
                    classification,
                }
            })
            .collect()
    }

    /// Aggregates lines per account, ordered by account number.
    fn aggregate(lines: &[&PostedLine], snapshot: &AccountSnapshot) -> Vec<AccountAggregate> {
        let mut by_account: BTreeMap<String, AccountAggregate> = BTreeMap::new();

        for line in lines {
            let (number, name) = snapshot.get(line.account_id).map_or_else(
                || (format!("?{}", line.account_id), "(unknown account)".to_string()),
                |account| (account.number.clone(), account.name.clone()),
            );

            let aggregate = by_account
                .entry(number.clone())
                .or_insert_with(|| AccountAggregate {
                    account_number: number,
                    account_name: name,
                    total_debit: Decimal::ZERO,
                    total_credit: Decimal::ZERO,
                });
            aggregate.total_debit += line.debit;
            aggregate.total_credit += line.credit;
        }

        by_account.into_values().collect()
    }
}
