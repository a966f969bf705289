//! Initial database migration.
//!
//! Creates the ledger schema: enums, companies, chart of accounts,
//! journals, accounting periods, journal entries and lines, per-journal
//! number sequences, and generated report metadata.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TENANCY
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS & JOURNALS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNALS_SQL).await?;
        db.execute_unprepared(ACCOUNTING_PERIODS_SQL).await?;

        // ============================================================
        // PART 4: LEDGER
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;
        db.execute_unprepared(JOURNAL_SEQUENCES_SQL).await?;

        // ============================================================
        // PART 5: REPORT ARTIFACTS
        // ============================================================
        db.execute_unprepared(GENERATED_REPORTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Statutory account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Journal types
CREATE TYPE journal_type AS ENUM (
    'sale',
    'purchase',
    'bank',
    'cash',
    'miscellaneous'
);

-- Journal entry lifecycle
CREATE TYPE entry_status AS ENUM (
    'draft',
    'posted',
    'reconciled',
    'cancelled'
);

-- Accounting period lifecycle
CREATE TYPE period_status AS ENUM (
    'open',
    'closed'
);

-- Generated report artifact status
CREATE TYPE report_status AS ENUM (
    'pending',
    'completed',
    'failed'
);

-- Generated report types
CREATE TYPE report_type AS ENUM (
    'trial_balance',
    'balance_sheet',
    'income_statement',
    'vat_summary',
    'aged_receivables',
    'aged_payables'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    number TEXT NOT NULL,
    name TEXT NOT NULL,
    account_type account_type NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    is_detail_account BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT accounts_number_numeric CHECK (number ~ '^[0-9]+$'),
    CONSTRAINT accounts_company_number_unique UNIQUE (company_id, number)
);

CREATE INDEX idx_accounts_company ON accounts(company_id);
";

const JOURNALS_SQL: &str = r"
CREATE TABLE journals (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    journal_type journal_type NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT journals_company_code_unique UNIQUE (company_id, code)
);

CREATE INDEX idx_journals_company ON journals(company_id);
";

const ACCOUNTING_PERIODS_SQL: &str = r"
CREATE TABLE accounting_periods (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    name TEXT NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status period_status NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT accounting_periods_range CHECK (start_date <= end_date)
);

CREATE INDEX idx_periods_company_dates ON accounting_periods(company_id, start_date, end_date);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    journal_id UUID NOT NULL REFERENCES journals(id),
    entry_date DATE NOT NULL,
    due_date DATE,
    entry_number TEXT,
    description TEXT NOT NULL,
    reference TEXT,
    status entry_status NOT NULL DEFAULT 'draft',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Posted entries always carry a number; the number is unique within
    -- (company, journal) and never reissued.
    CONSTRAINT journal_entries_number_unique UNIQUE (company_id, journal_id, entry_number),
    CONSTRAINT journal_entries_posted_numbered CHECK (
        status IN ('draft') OR entry_number IS NOT NULL
    )
);

CREATE INDEX idx_entries_company_date ON journal_entries(company_id, entry_date);
CREATE INDEX idx_entries_journal ON journal_entries(journal_id);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id UUID PRIMARY KEY,
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    line_index INTEGER NOT NULL,
    debit NUMERIC(18, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(18, 4) NOT NULL DEFAULT 0,
    description TEXT,
    currency TEXT NOT NULL DEFAULT 'EUR',

    -- Exactly one side of a line is strictly positive.
    CONSTRAINT lines_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT lines_single_side CHECK (
        (debit > 0 AND credit = 0) OR (credit > 0 AND debit = 0)
    ),
    CONSTRAINT lines_entry_index_unique UNIQUE (entry_id, line_index)
);

CREATE INDEX idx_lines_entry ON journal_entry_lines(entry_id);
CREATE INDEX idx_lines_account ON journal_entry_lines(account_id);
";

const JOURNAL_SEQUENCES_SQL: &str = r"
CREATE TABLE journal_sequences (
    company_id UUID NOT NULL REFERENCES companies(id),
    journal_id UUID NOT NULL REFERENCES journals(id),
    year INTEGER NOT NULL,
    last_value BIGINT NOT NULL DEFAULT 0,

    PRIMARY KEY (company_id, journal_id, year)
);
";

const GENERATED_REPORTS_SQL: &str = r"
CREATE TABLE generated_reports (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id),
    report_type report_type NOT NULL,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    file_format TEXT NOT NULL,
    generated_by UUID NOT NULL,
    status report_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_reports_company ON generated_reports(company_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS generated_reports;
DROP TABLE IF EXISTS journal_sequences;
DROP TABLE IF EXISTS journal_entry_lines;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS accounting_periods;
DROP TABLE IF EXISTS journals;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS companies;

DROP TYPE IF EXISTS report_type;
DROP TYPE IF EXISTS report_status;
DROP TYPE IF EXISTS period_status;
DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS journal_type;
DROP TYPE IF EXISTS account_type;
";
