//! Delimited-file parsing for FEC imports.
//!
//! The delimiter is auto-detected from the header line among semicolon,
//! comma, tab, and pipe; quoting follows standard CSV rules (doubled
//! quotes escape a literal quote). Column positions are resolved from the
//! header by name, accepting both the statutory FEC names and common
//! export aliases.

use csv::ReaderBuilder;

use super::error::ImportError;
use super::row::RawRow;

/// Candidate delimiters, tried in order on ties.
const DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Detects the delimiter by counting occurrences in the header line.
#[must_use]
pub fn detect_delimiter(header_line: &str) -> Option<u8> {
    let mut best: Option<(u8, usize)> = None;
    for delimiter in DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == delimiter).count();
        if count > 0 && count > best.map_or(0, |(_, best_count)| best_count) {
            best = Some((delimiter, count));
        }
    }
    best.map(|(delimiter, _)| delimiter)
}

/// Header aliases per logical column, matched case-insensitively.
struct ColumnSpec {
    name: &'static str,
    aliases: &'static [&'static str],
    required: bool,
}

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        name: "JournalCode",
        aliases: &["journalcode", "journal", "code_journal"],
        required: true,
    },
    ColumnSpec {
        name: "CompteNum",
        aliases: &["comptenum", "account", "accountnumber", "compte"],
        required: true,
    },
    ColumnSpec {
        name: "CompteLib",
        aliases: &["comptelib", "accountname", "libelle_compte"],
        required: false,
    },
    ColumnSpec {
        name: "EcritureDate",
        aliases: &["ecrituredate", "date", "entrydate"],
        required: true,
    },
    ColumnSpec {
        name: "PieceRef",
        aliases: &["pieceref", "reference", "piece"],
        required: false,
    },
    ColumnSpec {
        name: "EcritureLib",
        aliases: &["ecriturelib", "label", "description", "libelle"],
        required: false,
    },
    ColumnSpec {
        name: "Debit",
        aliases: &["debit"],
        required: true,
    },
    ColumnSpec {
        name: "Credit",
        aliases: &["credit"],
        required: true,
    },
];

/// Resolved column indices for one file.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    journal_code: Option<usize>,
    account_number: Option<usize>,
    account_name: Option<usize>,
    entry_date: Option<usize>,
    reference: Option<usize>,
    label: Option<usize>,
    debit: Option<usize>,
    credit: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let mut map = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let normalized = header.trim().trim_start_matches('\u{feff}').to_lowercase();
            for spec in COLUMNS {
                if spec.aliases.contains(&normalized.as_str()) {
                    let slot = match spec.name {
                        "JournalCode" => &mut map.journal_code,
                        "CompteNum" => &mut map.account_number,
                        "CompteLib" => &mut map.account_name,
                        "EcritureDate" => &mut map.entry_date,
                        "PieceRef" => &mut map.reference,
                        "EcritureLib" => &mut map.label,
                        "Debit" => &mut map.debit,
                        _ => &mut map.credit,
                    };
                    // First occurrence wins.
                    if slot.is_none() {
                        *slot = Some(idx);
                    }
                }
            }
        }

        for spec in COLUMNS.iter().filter(|spec| spec.required) {
            let resolved = match spec.name {
                "JournalCode" => map.journal_code,
                "CompteNum" => map.account_number,
                "EcritureDate" => map.entry_date,
                "Debit" => map.debit,
                _ => map.credit,
            };
            if resolved.is_none() {
                return Err(ImportError::MissingColumn(spec.name));
            }
        }

        Ok(map)
    }
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|idx| record.get(idx))
        .unwrap_or_default()
        .to_string()
}

/// Parses a delimited text blob into raw rows keyed by header names.
///
/// # Errors
///
/// Returns an error only for file-level problems: empty file, no
/// detectable delimiter, missing required columns, or no data rows.
pub fn parse(text: &str) -> Result<Vec<RawRow>, ImportError> {
    let header_line = text.lines().find(|line| !line.trim().is_empty());
    let Some(header_line) = header_line else {
        return Err(ImportError::Empty);
    };

    let delimiter = detect_delimiter(header_line).ok_or(ImportError::NoDelimiter)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = ColumnMap::resolve(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line_number = record
            .position()
            .map_or(0, |position| position.line());

        rows.push(RawRow {
            line_number,
            journal_code: field(&record, columns.journal_code),
            account_number: field(&record, columns.account_number),
            account_name: field(&record, columns.account_name),
            entry_date: field(&record, columns.entry_date),
            reference: field(&record, columns.reference),
            label: field(&record, columns.label),
            debit: field(&record, columns.debit),
            credit: field(&record, columns.credit),
        });
    }

    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }

    Ok(rows)
}
