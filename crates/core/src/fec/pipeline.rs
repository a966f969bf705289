//! The FEC import pipeline.
//!
//! Runs a delimited ledger export through the stages
//! `Parsing -> RowValidation -> Grouping -> EntryValidation -> Ready | Failed`.
//! Row and entry problems are accumulated and reported with their source
//! line numbers; only file-level problems abort the run. The pipeline never
//! writes to the ledger: it hands validated candidate entries to a separate
//! commit step.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use grandlivre_shared::types::{AccountId, JournalId};

use crate::coa::{AccountSnapshot, Journal};
use crate::ledger::entry::{DraftEntry, DraftLine};
use crate::ledger::validation::{IssueCode, ValidationIssue, ValidationReport, validate_entry};

use super::error::ImportError;
use super::parser;
use super::row::{FecRow, ImportIssue, Severity};

/// Cooperative cancellation flag shared with the caller.
///
/// An import checks the flag between row and entry boundaries, so
/// cancelling never leaves a candidate half-built.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a fresh, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pipeline stage reached by an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    /// Splitting the file into rows.
    Parsing,
    /// Validating individual rows.
    RowValidation,
    /// Grouping rows into candidate entries.
    Grouping,
    /// Running candidate entries through the entry validator.
    EntryValidation,
    /// All stages completed.
    Ready,
}

/// Key grouping rows into one candidate entry.
///
/// Rows sharing `(journal, date, reference)` belong to one entry. A reused
/// reference on the same day can coincidentally merge unrelated rows; the
/// rule is kept as the format prescribes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Journal code.
    pub journal_code: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Piece reference; rows without one group under the empty key.
    pub reference: Option<String>,
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.journal_code,
            self.entry_date,
            self.reference.as_deref().unwrap_or("-")
        )
    }
}

/// One candidate entry produced by grouping, with its validation outcome.
///
/// Failed candidates are retained so the operator sees exactly which
/// entries need fixing; they are never silently dropped.
#[derive(Debug, Clone)]
pub struct CandidateEntry {
    /// Display key (`journal/date/reference`).
    pub key: String,
    /// The proposed entry.
    pub draft: DraftEntry,
    /// Validation outcome.
    pub report: ValidationReport,
    /// Source line numbers of the rows that formed this candidate.
    pub line_numbers: Vec<u64>,
}

impl CandidateEntry {
    /// Returns true if the candidate passed entry validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.is_ok()
    }
}

/// Aggregate outcome of an import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Stage the run reached (`Ready` unless cancelled mid-way).
    pub stage: ImportStage,
    /// Number of candidate entries after grouping.
    pub num_entries: usize,
    /// Distinct account numbers across valid rows.
    pub num_accounts: usize,
    /// Distinct journal codes across valid rows.
    pub num_journals: usize,
    /// Sum of row debits.
    pub total_debit: Decimal,
    /// Sum of row credits.
    pub total_credit: Decimal,
    /// Global debit minus credit; zero for a well-formed FEC file.
    pub balance: Decimal,
    /// Keys of candidates that failed the balance rule.
    pub unbalanced_entries: Vec<String>,
    /// Error-severity problems.
    pub errors: Vec<ImportIssue>,
    /// Warning-severity problems.
    pub warnings: Vec<ImportIssue>,
    /// True when the run was cancelled before completing.
    pub partial: bool,
}

/// Result of a completed (or cancelled) pipeline run.
#[derive(Debug)]
pub struct ImportOutcome {
    /// The summary artifact.
    pub summary: ImportSummary,
    /// Every candidate entry, valid or not, in file order.
    pub candidates: Vec<CandidateEntry>,
}

impl ImportOutcome {
    /// Iterates the candidates that passed validation, in file order.
    ///
    /// This is what the commit step consumes.
    pub fn valid_entries(&self) -> impl Iterator<Item = &CandidateEntry> {
        self.candidates.iter().filter(|c| c.is_valid())
    }
}

/// The FEC import pipeline.
pub struct ImportPipeline {
    default_currency: String,
}

impl ImportPipeline {
    /// Creates a pipeline assigning `default_currency` to imported lines.
    #[must_use]
    pub fn new(default_currency: impl Into<String>) -> Self {
        Self {
            default_currency: default_currency.into(),
        }
    }

    /// Runs the pipeline on a text blob.
    ///
    /// `snapshot` and `journals` are the as-of view of the company's chart
    /// of accounts and journals; `period_open` is consulted per entry date.
    /// The pipeline only reads; committing the valid candidates is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error only when the file as a whole is unusable (empty,
    /// no delimiter, missing required columns, no data rows).
    pub fn run<P>(
        &self,
        text: &str,
        snapshot: &AccountSnapshot,
        journals: &[Journal],
        period_open: P,
        cancel: &CancelFlag,
    ) -> Result<ImportOutcome, ImportError>
    where
        P: Fn(NaiveDate) -> bool,
    {
        // Parsing.
        let raw_rows = parser::parse(text)?;
        debug!(rows = raw_rows.len(), "FEC file parsed");

        let mut issues: Vec<ImportIssue> = Vec::new();
        let mut rows: Vec<FecRow> = Vec::new();
        let mut cancelled_at: Option<ImportStage> = None;

        // RowValidation: partial-failure tolerant, keeps going on bad rows.
        for raw in &raw_rows {
            if cancel.is_cancelled() {
                cancelled_at = Some(ImportStage::RowValidation);
                break;
            }
            if let Some(row) = raw.validate(&mut issues) {
                rows.push(row);
            }
        }

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut account_numbers: HashSet<&str> = HashSet::new();
        let mut journal_codes: HashSet<&str> = HashSet::new();
        for row in &rows {
            total_debit += row.debit;
            total_credit += row.credit;
            account_numbers.insert(row.account_number.as_str());
            journal_codes.insert(row.journal_code.as_str());
        }

        // Grouping: file order is preserved, first row of a key anchors it.
        let mut groups: Vec<(GroupKey, Vec<&FecRow>)> = Vec::new();
        let mut group_index: HashMap<GroupKey, usize> = HashMap::new();
        if cancelled_at.is_none() {
            for row in &rows {
                let key = GroupKey {
                    journal_code: row.journal_code.clone(),
                    entry_date: row.entry_date,
                    reference: row.reference.clone(),
                };
                match group_index.get(&key) {
                    Some(&idx) => groups[idx].1.push(row),
                    None => {
                        group_index.insert(key.clone(), groups.len());
                        groups.push((key, vec![row]));
                    }
                }
            }
        }

        let journal_by_code: HashMap<&str, JournalId> = journals
            .iter()
            .map(|journal| (journal.code.as_str(), journal.id))
            .collect();

        // EntryValidation.
        let mut candidates: Vec<CandidateEntry> = Vec::new();
        let mut unbalanced_entries: Vec<String> = Vec::new();
        for (key, group_rows) in &groups {
            if cancel.is_cancelled() {
                cancelled_at.get_or_insert(ImportStage::EntryValidation);
                break;
            }

            let candidate = self.build_candidate(
                key,
                group_rows,
                snapshot,
                &journal_by_code,
                &period_open,
                &mut issues,
            );
            if candidate.report.has_code(IssueCode::Unbalanced) {
                unbalanced_entries.push(candidate.key.clone());
            }
            if !candidate.is_valid() {
                let codes: Vec<&str> = candidate
                    .report
                    .issues
                    .iter()
                    .map(|issue| issue.code.as_str())
                    .collect();
                issues.push(ImportIssue::entry(
                    Severity::Error,
                    candidate.key.clone(),
                    format!("Entry failed validation: {}", codes.join(", ")),
                ));
            }
            candidates.push(candidate);
        }

        // Summary.
        let balance = total_debit - total_credit;
        if cancelled_at.is_none() && !balance.is_zero() {
            issues.push(ImportIssue::file(
                Severity::Warning,
                format!(
                    "File debits and credits differ by {balance}; the export is likely missing rows"
                ),
            ));
        }

        let (errors, warnings): (Vec<ImportIssue>, Vec<ImportIssue>) = issues
            .into_iter()
            .partition(|issue| issue.severity == Severity::Error);

        let stage = cancelled_at.unwrap_or(ImportStage::Ready);
        let summary = ImportSummary {
            stage,
            num_entries: candidates.len(),
            num_accounts: account_numbers.len(),
            num_journals: journal_codes.len(),
            total_debit,
            total_credit,
            balance,
            unbalanced_entries,
            errors,
            warnings,
            partial: stage != ImportStage::Ready,
        };
        debug!(
            entries = summary.num_entries,
            errors = summary.errors.len(),
            warnings = summary.warnings.len(),
            partial = summary.partial,
            "FEC import finished"
        );

        Ok(ImportOutcome {
            summary,
            candidates,
        })
    }

    fn build_candidate<P>(
        &self,
        key: &GroupKey,
        group_rows: &[&FecRow],
        snapshot: &AccountSnapshot,
        journal_by_code: &HashMap<&str, JournalId>,
        period_open: &P,
        issues: &mut Vec<ImportIssue>,
    ) -> CandidateEntry
    where
        P: Fn(NaiveDate) -> bool,
    {
        let journal_id = journal_by_code.get(key.journal_code.as_str()).copied();

        let lines = group_rows
            .iter()
            .map(|row| {
                let account_id = match snapshot.find_by_number(&row.account_number) {
                    Some(account) => account.id,
                    None => {
                        issues.push(ImportIssue::row(
                            Severity::Warning,
                            row.line_number,
                            format!(
                                "Account {} is not in the chart of accounts",
                                row.account_number
                            ),
                        ));
                        AccountId::from_uuid(Uuid::nil())
                    }
                };
                DraftLine {
                    account_id,
                    debit: row.debit,
                    credit: row.credit,
                    description: (!row.label.is_empty()).then(|| row.label.clone()),
                    currency: self.default_currency.clone(),
                }
            })
            .collect();

        let description = group_rows
            .first()
            .map(|row| row.label.clone())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("FEC import {key}"));

        let draft = DraftEntry {
            company_id: snapshot.company_id(),
            journal_id: journal_id
                .unwrap_or_else(|| JournalId::from_uuid(Uuid::nil())),
            entry_date: key.entry_date,
            due_date: None,
            description,
            reference: key.reference.clone(),
            lines,
        };

        let mut report = validate_entry(&draft, snapshot, period_open(key.entry_date));
        if journal_id.is_none() {
            report.issues.push(ValidationIssue {
                field: "journal_id".to_string(),
                code: IssueCode::UnknownJournal,
                message: format!("Journal code '{}' is unknown", key.journal_code),
            });
        }

        CandidateEntry {
            key: key.to_string(),
            draft,
            report,
            line_numbers: group_rows.iter().map(|row| row.line_number).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use grandlivre_shared::types::CompanyId;

    use crate::coa::account::{Account, AccountType, JournalType};

    fn account(company_id: CompanyId, number: &str, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            company_id,
            number: number.to_string(),
            name: format!("Account {number}"),
            account_type,
            is_active: true,
            is_detail_account: true,
        }
    }

    struct Fixture {
        snapshot: AccountSnapshot,
        journals: Vec<Journal>,
    }

    fn fixture() -> Fixture {
        let company_id = CompanyId::new();
        let snapshot = AccountSnapshot::new(
            company_id,
            vec![
                account(company_id, "411000", AccountType::Asset),
                account(company_id, "512000", AccountType::Asset),
                account(company_id, "601000", AccountType::Expense),
                account(company_id, "706200", AccountType::Revenue),
                account(company_id, "445710", AccountType::Liability),
            ],
        );
        let journals = vec![
            Journal {
                id: grandlivre_shared::types::JournalId::new(),
                company_id,
                code: "VE".to_string(),
                name: "Sales".to_string(),
                journal_type: JournalType::Sale,
                is_active: true,
            },
            Journal {
                id: grandlivre_shared::types::JournalId::new(),
                company_id,
                code: "BQ".to_string(),
                name: "Bank".to_string(),
                journal_type: JournalType::Bank,
                is_active: true,
            },
        ];
        Fixture { snapshot, journals }
    }

    fn run(fixture: &Fixture, text: &str) -> ImportOutcome {
        ImportPipeline::new("EUR")
            .run(
                text,
                &fixture.snapshot,
                &fixture.journals,
                |_| true,
                &CancelFlag::new(),
            )
            .unwrap()
    }

    const HEADER: &str = "JournalCode;EcritureDate;CompteNum;PieceRef;EcritureLib;Debit;Credit\n";

    #[test]
    fn test_well_formed_file_is_ready() {
        let f = fixture();
        let text = format!(
            "{HEADER}\
             VE;20260315;411000;F0042;Invoice 42;120,00;\n\
             VE;20260315;706200;F0042;Invoice 42;;100,00\n\
             VE;20260315;445710;F0042;Invoice 42;;20,00\n"
        );
        let outcome = run(&f, &text);

        assert_eq!(outcome.summary.stage, ImportStage::Ready);
        assert_eq!(outcome.summary.num_entries, 1);
        assert_eq!(outcome.summary.num_accounts, 3);
        assert_eq!(outcome.summary.num_journals, 1);
        assert_eq!(outcome.summary.total_debit, dec!(120));
        assert_eq!(outcome.summary.total_credit, dec!(120));
        assert!(outcome.summary.balance.is_zero());
        assert!(outcome.summary.errors.is_empty());
        assert!(outcome.summary.warnings.is_empty());
        assert!(!outcome.summary.partial);

        let candidate = &outcome.candidates[0];
        assert!(candidate.is_valid());
        assert_eq!(candidate.draft.lines.len(), 3);
        assert_eq!(candidate.line_numbers, vec![2, 3, 4]);
    }

    #[test]
    fn test_orphan_row_reported_not_dropped() {
        // Three rows share one reference, one orphan stands alone: the
        // orphan becomes a single-line candidate that fails validation.
        let f = fixture();
        let text = format!(
            "{HEADER}\
             VE;20260315;411000;F0042;Invoice 42;120,00;\n\
             VE;20260315;706200;F0042;Invoice 42;;100,00\n\
             VE;20260315;445710;F0042;Invoice 42;;20,00\n\
             BQ;20260316;512000;REL-9;Bank movement;50,00;\n"
        );
        let outcome = run(&f, &text);

        assert_eq!(outcome.summary.num_entries, 2);
        assert_eq!(outcome.valid_entries().count(), 1);

        let orphan = &outcome.candidates[1];
        assert!(!orphan.is_valid());
        assert!(orphan.report.has_code(IssueCode::InsufficientLines));
        assert!(orphan.report.has_code(IssueCode::Unbalanced));
        assert_eq!(outcome.summary.unbalanced_entries, vec![orphan.key.clone()]);
        // The failure is also surfaced in the summary errors.
        assert!(
            outcome
                .summary
                .errors
                .iter()
                .any(|issue| issue.entry_key.as_deref() == Some(orphan.key.as_str()))
        );
    }

    #[test]
    fn test_malformed_rows_collected_and_skipped() {
        let f = fixture();
        let text = format!(
            "{HEADER}\
             VE;not-a-date;411000;F0042;Bad date;120,00;\n\
             VE;20260315;411000;F0043;Invoice 43;60,00;\n\
             VE;20260315;706200;F0043;Invoice 43;;60,00\n"
        );
        let outcome = run(&f, &text);

        assert_eq!(outcome.summary.num_entries, 1);
        assert_eq!(outcome.summary.errors.len(), 1);
        assert_eq!(outcome.summary.errors[0].line_number, Some(2));
        assert!(outcome.candidates[0].is_valid());
    }

    #[test]
    fn test_unknown_account_flagged() {
        let f = fixture();
        let text = format!(
            "{HEADER}\
             VE;20260315;999999;F0042;Mystery;120,00;\n\
             VE;20260315;706200;F0042;Invoice;;120,00\n"
        );
        let outcome = run(&f, &text);

        let candidate = &outcome.candidates[0];
        assert!(candidate.report.has_code(IssueCode::UnknownAccount));
        assert!(
            outcome
                .summary
                .warnings
                .iter()
                .any(|issue| issue.message.contains("999999"))
        );
    }

    #[test]
    fn test_unknown_journal_flagged() {
        let f = fixture();
        let text = format!(
            "{HEADER}\
             XX;20260315;601000;F1;Misc;120,00;\n\
             XX;20260315;512000;F1;Misc;;120,00\n"
        );
        let outcome = run(&f, &text);

        let candidate = &outcome.candidates[0];
        assert!(!candidate.is_valid());
        assert!(candidate.report.has_code(IssueCode::UnknownJournal));
    }

    #[test]
    fn test_global_imbalance_is_a_warning() {
        // Both entries balance individually... except one is missing its
        // counterpart row entirely, so the file total is off.
        let f = fixture();
        let text = format!(
            "{HEADER}\
             VE;20260315;411000;F0042;Invoice 42;120,00;\n\
             VE;20260315;706200;F0042;Invoice 42;;120,00\n\
             BQ;20260316;512000;REL-9;Missing counterpart;80,00;\n"
        );
        let outcome = run(&f, &text);

        assert_eq!(outcome.summary.balance, dec!(80));
        assert!(
            outcome
                .summary
                .warnings
                .iter()
                .any(|issue| issue.message.contains("differ by 80"))
        );
    }

    #[test]
    fn test_closed_period_fails_entry() {
        let f = fixture();
        let text = format!(
            "{HEADER}\
             VE;20250101;411000;F1;Old invoice;120,00;\n\
             VE;20250101;706200;F1;Old invoice;;120,00\n"
        );
        let outcome = ImportPipeline::new("EUR")
            .run(
                &text,
                &f.snapshot,
                &f.journals,
                |date| chrono::Datelike::year(&date) == 2026,
                &CancelFlag::new(),
            )
            .unwrap();

        assert!(outcome.candidates[0].report.has_code(IssueCode::PeriodClosed));
    }

    #[test]
    fn test_cancellation_marks_partial() {
        let f = fixture();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let text = format!(
            "{HEADER}\
             VE;20260315;411000;F1;Invoice;120,00;\n\
             VE;20260315;706200;F1;Invoice;;120,00\n"
        );
        let outcome = ImportPipeline::new("EUR")
            .run(&text, &f.snapshot, &f.journals, |_| true, &cancel)
            .unwrap();

        assert!(outcome.summary.partial);
        assert_eq!(outcome.summary.stage, ImportStage::RowValidation);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn test_unparseable_file_fails() {
        let f = fixture();
        let result = ImportPipeline::new("EUR").run(
            "",
            &f.snapshot,
            &f.journals,
            |_| true,
            &CancelFlag::new(),
        );
        assert!(matches!(result, Err(ImportError::Empty)));
    }
}
