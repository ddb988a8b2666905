//! `POKUPKI.TXT` and `PRODAGBI.TXT`: one record per ledger line plus a
//! trailing total record.
//!
//! Row amounts come from single-line totals and the trailing record from
//! the totals of the whole ledger. Both go through the aggregator's
//! per-line rounding, so the column sums equal the declaration exactly.

use crate::export::error::ExportError;
use crate::export::kind::ExportKind;
use crate::export::layout::{HEAD_OFFICE_BRANCH, LayoutVersion, widths};
use crate::export::writer::RecordWriter;
use crate::vat::{
    CompanyProfile, LedgerLine, PeriodKey, PurchaseTotals, SalesTotals, VatDeclaration,
};

/// Renders the purchase ledger.
///
/// # Errors
///
/// * `ExportError::StaleDeclaration` if the lines no longer add up to
///   `declaration`
/// * `ExportError::Ledger` if a line does not belong to the purchase ledger
/// * `ExportError::EncodingFailure` if an amount overflows its field
pub fn render_purchases(
    layout: LayoutVersion,
    period: &PeriodKey,
    company: &CompanyProfile,
    lines: &[LedgerLine],
    declaration: &VatDeclaration,
) -> Result<RecordWriter, ExportError> {
    let totals = PurchaseTotals::from_lines(lines)?;
    if !totals.matches(declaration) {
        return Err(stale(ExportKind::PurchaseLedger));
    }

    let columns = layout.purchase_columns();
    let mut w = RecordWriter::new();
    for (index, line) in lines.iter().enumerate() {
        let mut row = PurchaseTotals::default();
        row.add(line)?;

        w.begin_record();
        write_identity(&mut w, period, company, index + 1)?;
        write_document(&mut w, line)?;
        for column in columns {
            w.amount(column.field_name(), column.value(&row))?;
        }
        w.end_record();
    }

    w.begin_record();
    write_identity(&mut w, period, company, lines.len())?;
    blank_document(&mut w);
    for column in columns {
        w.amount(column.field_name(), column.value(&totals))?;
    }
    w.end_record();

    Ok(w)
}

/// Renders the sales ledger.
///
/// # Errors
///
/// Same as [`render_purchases`], for sales lines.
pub fn render_sales(
    layout: LayoutVersion,
    period: &PeriodKey,
    company: &CompanyProfile,
    lines: &[LedgerLine],
    declaration: &VatDeclaration,
) -> Result<RecordWriter, ExportError> {
    let totals = SalesTotals::from_lines(lines)?;
    if !totals.matches(declaration) {
        return Err(stale(ExportKind::SalesLedger));
    }

    let columns = layout.sales_columns();
    let mut w = RecordWriter::new();
    for (index, line) in lines.iter().enumerate() {
        let mut row = SalesTotals::default();
        row.add(line)?;

        w.begin_record();
        write_identity(&mut w, period, company, index + 1)?;
        write_document(&mut w, line)?;
        for column in columns {
            w.amount(column.field_name(), column.value(&row))?;
        }
        w.end_record();
    }

    w.begin_record();
    write_identity(&mut w, period, company, lines.len())?;
    blank_document(&mut w);
    for column in columns {
        w.amount(column.field_name(), column.value(&totals))?;
    }
    w.end_record();

    Ok(w)
}

fn stale(kind: ExportKind) -> ExportError {
    ExportError::StaleDeclaration {
        file: kind.file_name(),
    }
}

fn write_identity(
    w: &mut RecordWriter,
    period: &PeriodKey,
    company: &CompanyProfile,
    sequence: usize,
) -> Result<(), ExportError> {
    w.text("vat_number", &company.vat_number, widths::VAT_NUMBER);
    w.text("period", &period.label(), widths::PERIOD);
    w.text("branch", HEAD_OFFICE_BRANCH, widths::BRANCH);
    let sequence = u64::try_from(sequence).unwrap_or(u64::MAX);
    w.integer("sequence", sequence, widths::COUNT)
}

fn write_document(w: &mut RecordWriter, line: &LedgerLine) -> Result<(), ExportError> {
    w.text(
        "document_type",
        line.document_type.code(),
        widths::DOCUMENT_TYPE,
    );
    w.text(
        "document_number",
        &line.document_number,
        widths::DOCUMENT_NUMBER,
    );
    w.date("document_date", line.document_date)?;
    w.text(
        "counterparty_vat_number",
        line.counterparty_vat_number.as_deref().unwrap_or_default(),
        widths::VAT_NUMBER,
    );
    w.text("counterparty_name", &line.counterparty_name, widths::NAME);
    w.text("description", &line.description, widths::DESCRIPTION);
    Ok(())
}

fn blank_document(w: &mut RecordWriter) {
    w.blank(
        widths::DOCUMENT_TYPE
            + widths::DOCUMENT_NUMBER
            + widths::DATE
            + widths::VAT_NUMBER
            + widths::NAME
            + widths::DESCRIPTION,
    );
}
