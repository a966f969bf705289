//! FEC export.
//!
//! Renders posted entries back into the statutory semicolon-delimited
//! format, one row per line. Export and import are inverses: a file
//! produced here reimports into equivalent entries (grouping, accounts,
//! dates, amounts), modulo the entry numbers reassigned at commit time.

use rust_decimal::Decimal;

use crate::coa::{AccountSnapshot, Journal};
use crate::ledger::entry::JournalEntry;

use super::error::ImportError;

/// The emitted column header.
const EXPORT_HEADER: [&str; 8] = [
    "JournalCode",
    "EcritureDate",
    "CompteNum",
    "CompteLib",
    "PieceRef",
    "EcritureLib",
    "Debit",
    "Credit",
];

/// Formats an amount the way FEC files carry it (comma decimal separator).
fn format_amount(amount: Decimal) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        amount.to_string().replace('.', ",")
    }
}

/// Renders the reportable entries of one company as FEC text.
///
/// Draft and cancelled entries are skipped; the reference column falls
/// back to the entry number so every entry keeps a distinct grouping key.
/// Accounts or journals missing from the provided views render as empty
/// columns, which the import pipeline will flag on the way back in.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn export_entries(
    entries: &[JournalEntry],
    snapshot: &AccountSnapshot,
    journals: &[Journal],
) -> Result<String, ImportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;

    for entry in entries.iter().filter(|entry| entry.status.is_reportable()) {
        let journal_code = journals
            .iter()
            .find(|journal| journal.id == entry.journal_id)
            .map(|journal| journal.code.as_str())
            .unwrap_or_default();
        let date = entry.entry_date.format("%Y%m%d").to_string();
        let reference = entry
            .reference
            .clone()
            .or_else(|| {
                entry
                    .entry_number
                    .as_ref()
                    .map(std::string::ToString::to_string)
            })
            .unwrap_or_default();

        for line in &entry.lines {
            let (number, name) = snapshot
                .get(line.account_id)
                .map(|account| (account.number.as_str(), account.name.as_str()))
                .unwrap_or_default();

            writer.write_record([
                journal_code,
                date.as_str(),
                number,
                name,
                reference.as_str(),
                line.description.as_deref().unwrap_or(&entry.description),
                format_amount(line.debit).as_str(),
                format_amount(line.credit).as_str(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ImportError::Csv(err.into_error().into()))?;
    // The writer only ever receives UTF-8 input.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use grandlivre_shared::types::{AccountId, CompanyId, EntryId, EntryLineId, JournalId};

    use crate::coa::account::{Account, AccountType, JournalType};
    use crate::fec::pipeline::{CancelFlag, ImportPipeline};
    use crate::ledger::entry::{EntryStatus, JournalEntryLine};
    use crate::ledger::numbering::EntryNumber;

    struct Fixture {
        snapshot: AccountSnapshot,
        journals: Vec<Journal>,
        company_id: CompanyId,
    }

    fn fixture() -> Fixture {
        let company_id = CompanyId::new();
        let accounts = vec![
            Account {
                id: AccountId::new(),
                company_id,
                number: "411000".to_string(),
                name: "Customers".to_string(),
                account_type: AccountType::Asset,
                is_active: true,
                is_detail_account: true,
            },
            Account {
                id: AccountId::new(),
                company_id,
                number: "706200".to_string(),
                name: "Services".to_string(),
                account_type: AccountType::Revenue,
                is_active: true,
                is_detail_account: true,
            },
        ];
        let journals = vec![Journal {
            id: JournalId::new(),
            company_id,
            code: "VE".to_string(),
            name: "Sales".to_string(),
            journal_type: JournalType::Sale,
            is_active: true,
        }];
        Fixture {
            snapshot: AccountSnapshot::new(company_id, accounts),
            journals,
            company_id,
        }
    }

    fn posted_entry(fixture: &Fixture, sequence: i64, amount: Decimal) -> JournalEntry {
        let id = EntryId::new();
        let customers = fixture.snapshot.find_by_number("411000").unwrap().id;
        let services = fixture.snapshot.find_by_number("706200").unwrap().id;
        JournalEntry {
            id,
            company_id: fixture.company_id,
            journal_id: fixture.journals[0].id,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            due_date: None,
            entry_number: Some(EntryNumber::new("VE", 2026, sequence)),
            description: format!("Invoice {sequence}"),
            reference: Some(format!("F{sequence:04}")),
            status: EntryStatus::Posted,
            lines: vec![
                JournalEntryLine {
                    id: EntryLineId::new(),
                    entry_id: id,
                    account_id: customers,
                    debit: amount,
                    credit: dec!(0),
                    description: None,
                    currency: "EUR".to_string(),
                },
                JournalEntryLine {
                    id: EntryLineId::new(),
                    entry_id: id,
                    account_id: services,
                    debit: dec!(0),
                    credit: amount,
                    description: None,
                    currency: "EUR".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_export_layout() {
        let f = fixture();
        let entry = posted_entry(&f, 1, dec!(120.50));

        let text = export_entries(&[entry], &f.snapshot, &f.journals).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "JournalCode;EcritureDate;CompteNum;CompteLib;PieceRef;EcritureLib;Debit;Credit"
        );
        assert_eq!(
            lines.next().unwrap(),
            "VE;20260315;411000;Customers;F0001;Invoice 1;120,50;"
        );
        assert_eq!(
            lines.next().unwrap(),
            "VE;20260315;706200;Services;F0001;Invoice 1;;120,50"
        );
    }

    #[test]
    fn test_draft_entries_excluded() {
        let f = fixture();
        let mut entry = posted_entry(&f, 1, dec!(100));
        entry.status = EntryStatus::Draft;

        let text = export_entries(&[entry], &f.snapshot, &f.journals).unwrap();
        assert_eq!(text.lines().count(), 1, "only the header should remain");
    }

    #[test]
    fn test_export_reimports_equivalent_entries() {
        let f = fixture();
        let entries = vec![
            posted_entry(&f, 1, dec!(120.50)),
            posted_entry(&f, 2, dec!(75)),
        ];

        let text = export_entries(&entries, &f.snapshot, &f.journals).unwrap();
        let outcome = ImportPipeline::new("EUR")
            .run(&text, &f.snapshot, &f.journals, |_| true, &CancelFlag::new())
            .unwrap();

        assert_eq!(outcome.summary.num_entries, entries.len());
        assert!(outcome.summary.errors.is_empty());
        assert!(outcome.summary.balance.is_zero());

        for (candidate, original) in outcome.candidates.iter().zip(&entries) {
            assert!(candidate.is_valid());
            assert_eq!(candidate.draft.entry_date, original.entry_date);
            assert_eq!(candidate.draft.journal_id, original.journal_id);
            assert_eq!(candidate.draft.reference, original.reference);
            assert_eq!(candidate.draft.lines.len(), original.lines.len());
            for (imported, line) in candidate.draft.lines.iter().zip(&original.lines) {
                assert_eq!(imported.account_id, line.account_id);
                assert_eq!(imported.debit, line.debit);
                assert_eq!(imported.credit, line.credit);
            }
        }
    }
}
