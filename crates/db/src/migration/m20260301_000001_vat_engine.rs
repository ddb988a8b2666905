//! VAT engine schema.
//!
//! Companies, the ledger line projection the engine reads, and the stored
//! returns with one row per company and month.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(VAT_LEDGER_LINES_SQL).await?;
        db.execute_unprepared(VAT_RETURNS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE vat_return_status AS ENUM (
    'DRAFT', 'CALCULATED', 'SUBMITTED', 'ACCEPTED', 'PAID'
);
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id                  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name                VARCHAR(255) NOT NULL,
    vat_number          VARCHAR(15) NOT NULL UNIQUE,
    submitter_name      VARCHAR(255) NOT NULL,
    credit_coefficient  NUMERIC(4, 3),
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_credit_coefficient_range
        CHECK (credit_coefficient IS NULL OR credit_coefficient BETWEEN 0 AND 1)
);
";

const VAT_LEDGER_LINES_SQL: &str = r"
CREATE TABLE vat_ledger_lines (
    id                       UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id               UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    document_number          VARCHAR(20) NOT NULL,
    document_type            VARCHAR(2) NOT NULL,
    document_date            DATE NOT NULL,
    vat_date                 DATE NOT NULL,
    counterparty_vat_number  VARCHAR(15),
    counterparty_name        VARCHAR(255) NOT NULL,
    description              VARCHAR(255) NOT NULL DEFAULT '',
    tax_base                 NUMERIC(15, 2) NOT NULL,
    vat_amount               NUMERIC(15, 2) NOT NULL,
    operation                VARCHAR(32) NOT NULL,
    created_at               TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_operation CHECK (operation IN (
        'sale_standard_20', 'sale_reduced_9', 'sale_vop', 'sale_export_0',
        'sale_vod_0', 'sale_exempt',
        'purchase_full_credit', 'purchase_partial_credit', 'purchase_no_credit'
    ))
);

CREATE INDEX idx_vat_ledger_lines_period
    ON vat_ledger_lines(company_id, vat_date, operation);
";

const VAT_RETURNS_SQL: &str = r"
CREATE TABLE vat_returns (
    id             UUID PRIMARY KEY,
    company_id     UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
    period_year    INTEGER NOT NULL,
    period_month   INTEGER NOT NULL,
    status         vat_return_status NOT NULL DEFAULT 'DRAFT',
    declaration    JSONB,
    due_date       DATE NOT NULL,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at     TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    calculated_at  TIMESTAMPTZ,
    submitted_at   TIMESTAMPTZ,
    accepted_at    TIMESTAMPTZ,
    paid_at        TIMESTAMPTZ,

    CONSTRAINT uq_vat_returns_period UNIQUE (company_id, period_year, period_month),
    CONSTRAINT chk_period_month CHECK (period_month BETWEEN 1 AND 12),
    CONSTRAINT chk_period_year CHECK (period_year BETWEEN 2000 AND 9999),
    CONSTRAINT chk_declaration_present
        CHECK (status = 'DRAFT' OR declaration IS NOT NULL)
);

CREATE INDEX idx_vat_returns_company ON vat_returns(company_id, period_year DESC, period_month DESC);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION update_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_companies_updated_at
    BEFORE UPDATE ON companies
    FOR EACH ROW EXECUTE FUNCTION update_updated_at();
";

const DROP_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_companies_updated_at ON companies;
DROP FUNCTION IF EXISTS update_updated_at() CASCADE;

DROP TABLE IF EXISTS vat_returns CASCADE;
DROP TABLE IF EXISTS vat_ledger_lines CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP TYPE IF EXISTS vat_return_status CASCADE;
";
