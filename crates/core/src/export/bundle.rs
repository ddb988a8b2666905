//! `VAT_YYYY_MM.zip`: the three files in one download.

use std::io::{Cursor, Write};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::export::error::{ExportError, ExportWarning};
use crate::export::kind::ExportArtifact;
use crate::vat::PeriodKey;

/// Zip archive holding every rendered file of a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    /// `VAT_YYYY_MM.zip`
    pub file_name: String,
    /// Archive bytes.
    pub bytes: Vec<u8>,
    /// Warnings of every member, tagged with the member's file name.
    pub warnings: Vec<(&'static str, ExportWarning)>,
}

/// Archive name for a period, e.g. `VAT_2025_03.zip`.
#[must_use]
pub fn bundle_file_name(period: &PeriodKey) -> String {
    format!("VAT_{}_{:02}.zip", period.year(), period.month())
}

/// Packs rendered files into one archive, in the order given.
///
/// Members keep their Windows-1251 bytes untouched.
///
/// # Errors
///
/// Returns `ExportError::Archive` if the zip writer fails.
pub fn bundle(
    period: &PeriodKey,
    artifacts: Vec<ExportArtifact>,
) -> Result<ExportBundle, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let mut warnings = Vec::new();

    for artifact in artifacts {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(artifact.file_name, options)
            .map_err(|e| ExportError::Archive(e.to_string()))?;
        zip.write_all(&artifact.bytes)
            .map_err(|e| ExportError::Archive(e.to_string()))?;
        warnings.extend(
            artifact
                .warnings
                .into_iter()
                .map(|w| (artifact.file_name, w)),
        );
    }

    let bytes = zip
        .finish()
        .map_err(|e| ExportError::Archive(e.to_string()))?
        .into_inner();

    Ok(ExportBundle {
        file_name: bundle_file_name(period),
        bytes,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::error::WarningKind;
    use crate::export::kind::ExportKind;
    use dds_shared::types::CompanyId;
    use std::io::Read;
    use zip::ZipArchive;

    fn artifact(kind: ExportKind, bytes: &[u8]) -> ExportArtifact {
        ExportArtifact {
            kind,
            file_name: kind.file_name(),
            bytes: bytes.to_vec(),
            warnings: Vec::new(),
        }
    }

    fn march() -> PeriodKey {
        PeriodKey::new(CompanyId::new(), 2025, 3).unwrap()
    }

    #[test]
    fn test_file_name_pads_month() {
        assert_eq!(bundle_file_name(&march()), "VAT_2025_03.zip");
        let december = PeriodKey::new(CompanyId::new(), 2024, 12).unwrap();
        assert_eq!(bundle_file_name(&december), "VAT_2024_12.zip");
    }

    #[test]
    fn test_members_keep_their_bytes() {
        // "Фирма" in Windows-1251
        let deklar = [0xD4, 0xE8, 0xF0, 0xEC, 0xE0, b'\r', b'\n'];
        let packed = bundle(
            &march(),
            vec![
                artifact(ExportKind::Declaration, &deklar),
                artifact(ExportKind::PurchaseLedger, b""),
                artifact(ExportKind::SalesLedger, b"1\r\n"),
            ],
        )
        .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(packed.bytes)).unwrap();
        assert_eq!(archive.len(), 3);
        let names: Vec<&str> = archive.file_names().collect();
        for name in ["DEKLAR.TXT", "POKUPKI.TXT", "PRODAGBI.TXT"] {
            assert!(names.contains(&name), "missing {name}");
        }

        let mut content = Vec::new();
        archive
            .by_name("DEKLAR.TXT")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, deklar);
    }

    #[test]
    fn test_warnings_are_tagged_with_file() {
        let mut sales = artifact(ExportKind::SalesLedger, b"1\r\n");
        sales.warnings.push(ExportWarning {
            record: 1,
            field: "counterparty_name",
            kind: WarningKind::Truncated {
                length: 60,
                width: 50,
            },
        });

        let packed = bundle(&march(), vec![artifact(ExportKind::Declaration, b"x"), sales]).unwrap();
        assert_eq!(packed.warnings.len(), 1);
        assert_eq!(packed.warnings[0].0, "PRODAGBI.TXT");
        assert_eq!(packed.warnings[0].1.record, 1);
    }
}
