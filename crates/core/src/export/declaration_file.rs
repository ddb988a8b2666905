//! `DEKLAR.TXT`: one record carrying the header and every declaration code.

use crate::export::error::ExportError;
use crate::export::layout::{CodeValue, LayoutVersion, widths};
use crate::export::writer::RecordWriter;
use crate::vat::{CompanyProfile, PeriodKey, VatDeclaration};

/// Renders the declaration record.
///
/// # Errors
///
/// Returns `ExportError::EncodingFailure` if an amount or count overflows
/// its field.
pub fn render(
    layout: LayoutVersion,
    period: &PeriodKey,
    company: &CompanyProfile,
    declaration: &VatDeclaration,
) -> Result<RecordWriter, ExportError> {
    let mut w = RecordWriter::new();
    w.begin_record();

    w.text("vat_number", &company.vat_number, widths::VAT_NUMBER);
    w.text("company_name", &company.name, widths::NAME);
    w.text("period", &period.label(), widths::PERIOD);
    w.text("submitter", &company.submitter_name, widths::SUBMITTER);
    w.integer(
        "sales_document_count",
        u64::from(declaration.sales_document_count),
        widths::COUNT,
    )?;
    w.integer(
        "purchase_document_count",
        u64::from(declaration.purchase_document_count),
        widths::COUNT,
    )?;

    for code in layout.declaration_codes() {
        match code.value(declaration) {
            CodeValue::Amount(amount) => w.amount(code.field_name(), amount)?,
            CodeValue::Coefficient(coefficient) => {
                w.coefficient(code.field_name(), coefficient)?;
            }
        }
    }

    w.end_record();
    Ok(w)
}
