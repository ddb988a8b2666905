//! Export entry point.

use crate::export::error::ExportError;
use crate::export::kind::{ExportArtifact, ExportKind};
use crate::export::layout::LayoutVersion;
use crate::export::{declaration_file, ledger_file};
use crate::lifecycle::VatReturnStatus;
use crate::vat::{CompanyProfile, LedgerLine, PeriodKey, VatDeclaration};

/// What the exporter reads. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct ExportInput<'a> {
    /// Current status of the return.
    pub status: VatReturnStatus,
    /// Period being exported.
    pub period: &'a PeriodKey,
    /// Declaring company.
    pub company: &'a CompanyProfile,
    /// Stored declaration.
    pub declaration: &'a VatDeclaration,
    /// Lines of the ledger matching the kind, in ledger order. Ignored for
    /// the declaration file.
    pub lines: &'a [LedgerLine],
}

/// Renders declarations and ledgers into the tax authority's files.
#[derive(Debug, Clone, Copy, Default)]
pub struct VatExporter {
    layout: LayoutVersion,
}

impl VatExporter {
    /// Creates an exporter for a layout version.
    #[must_use]
    pub fn new(layout: LayoutVersion) -> Self {
        Self { layout }
    }

    /// Layout this exporter writes.
    #[must_use]
    pub fn layout(&self) -> LayoutVersion {
        self.layout
    }

    /// Renders one file.
    ///
    /// # Errors
    ///
    /// * `ExportError::IncompleteDeclaration` while the return is a draft
    /// * `ExportError::StaleDeclaration` if a ledger no longer matches the
    ///   stored declaration
    /// * `ExportError::EncodingFailure` if a number overflows its field
    pub fn export(
        &self,
        kind: ExportKind,
        input: ExportInput<'_>,
    ) -> Result<ExportArtifact, ExportError> {
        if !input.status.has_figures() {
            return Err(ExportError::IncompleteDeclaration {
                status: input.status,
            });
        }

        let writer = match kind {
            ExportKind::Declaration => {
                declaration_file::render(self.layout, input.period, input.company, input.declaration)?
            }
            ExportKind::PurchaseLedger => ledger_file::render_purchases(
                self.layout,
                input.period,
                input.company,
                input.lines,
                input.declaration,
            )?,
            ExportKind::SalesLedger => ledger_file::render_sales(
                self.layout,
                input.period,
                input.company,
                input.lines,
                input.declaration,
            )?,
        };

        let (bytes, warnings) = writer.finish()?;
        Ok(ExportArtifact {
            kind,
            file_name: kind.file_name(),
            bytes,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::encoding;
    use crate::vat::{DocumentType, SalesCategory, VatAggregator, VatOperation};
    use chrono::NaiveDate;
    use dds_shared::types::CompanyId;
    use rust_decimal_macros::dec;

    fn company(id: CompanyId) -> CompanyProfile {
        CompanyProfile {
            id,
            name: "Фирма ЕООД".to_string(),
            vat_number: "BG999999999".to_string(),
            submitter_name: "Иван Иванов".to_string(),
            credit_coefficient: None,
        }
    }

    fn sales() -> Vec<LedgerLine> {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        vec![LedgerLine {
            document_number: "1".to_string(),
            document_type: DocumentType::Invoice,
            document_date: date,
            vat_date: date,
            counterparty_vat_number: Some("DE123456789".to_string()),
            counterparty_name: "Müller GmbH ✓".to_string(),
            description: "консултантски услуги по договор за поддръжка".to_string(),
            tax_base: dec!(1000.00),
            vat_amount: dec!(200.00),
            operation: VatOperation::Sale(SalesCategory::Standard20),
        }]
    }

    #[test]
    fn test_draft_is_incomplete() {
        let company_id = CompanyId::new();
        let period = PeriodKey::new(company_id, 2025, 3).unwrap();
        let profile = company(company_id);
        let declaration = VatDeclaration::default();

        for kind in ExportKind::ALL {
            let err = VatExporter::default()
                .export(
                    kind,
                    ExportInput {
                        status: VatReturnStatus::Draft,
                        period: &period,
                        company: &profile,
                        declaration: &declaration,
                        lines: &[],
                    },
                )
                .unwrap_err();
            assert!(matches!(
                err,
                ExportError::IncompleteDeclaration {
                    status: VatReturnStatus::Draft
                }
            ));
        }
    }

    #[test]
    fn test_sales_ledger_artifact_carries_warnings() {
        let company_id = CompanyId::new();
        let period = PeriodKey::new(company_id, 2025, 3).unwrap();
        let profile = company(company_id);
        let lines = sales();
        let declaration = VatAggregator::aggregate(&[], &lines, None).unwrap();

        let artifact = VatExporter::new(LayoutVersion::V1)
            .export(
                ExportKind::SalesLedger,
                ExportInput {
                    status: VatReturnStatus::Submitted,
                    period: &period,
                    company: &profile,
                    declaration: &declaration,
                    lines: &lines,
                },
            )
            .unwrap();

        assert_eq!(artifact.file_name, "PRODAGBI.TXT");
        let fields: Vec<_> = artifact.warnings.iter().map(|w| w.field).collect();
        assert_eq!(
            fields,
            ["counterparty_name", "counterparty_name", "description"]
        );
        assert!(artifact.warnings.iter().all(|w| w.record == 1));

        let text = encoding::decode(&artifact.bytes);
        assert!(text.contains("M?ller GmbH ?"));
        assert!(text.ends_with("\r\n"));
    }

    #[test]
    fn test_declaration_bytes_are_windows_1251() {
        let company_id = CompanyId::new();
        let period = PeriodKey::new(company_id, 2025, 3).unwrap();
        let profile = company(company_id);
        let declaration = VatAggregator::aggregate(&[], &sales(), None).unwrap();

        let artifact = VatExporter::default()
            .export(
                ExportKind::Declaration,
                ExportInput {
                    status: VatReturnStatus::Calculated,
                    period: &period,
                    company: &profile,
                    declaration: &declaration,
                    lines: &[],
                },
            )
            .unwrap();

        // "Фирма" is five single bytes starting at the name column
        assert_eq!(&artifact.bytes[15..20], &[0xD4, 0xE8, 0xF0, 0xEC, 0xE0]);
        assert!(artifact.warnings.is_empty());
    }
}
