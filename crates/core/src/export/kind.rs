//! Export kinds and the artifact handed back to callers.

use std::fmt;

use crate::export::error::ExportWarning;
use crate::vat::VatRole;

/// One of the three files submitted to the tax authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// `DEKLAR.TXT`
    Declaration,
    /// `POKUPKI.TXT`
    PurchaseLedger,
    /// `PRODAGBI.TXT`
    SalesLedger,
}

impl ExportKind {
    /// All kinds, in submission order.
    pub const ALL: [Self; 3] = [Self::Declaration, Self::PurchaseLedger, Self::SalesLedger];

    /// Name of the file the tax authority expects.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Declaration => "DEKLAR.TXT",
            Self::PurchaseLedger => "POKUPKI.TXT",
            Self::SalesLedger => "PRODAGBI.TXT",
        }
    }

    /// Path segment used by the HTTP surface.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Declaration => "deklar",
            Self::PurchaseLedger => "pokupki",
            Self::SalesLedger => "prodajbi",
        }
    }

    /// Parses a path segment, case-insensitively.
    ///
    /// `prodagbi` is accepted as an alias of `prodajbi`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deklar" => Some(Self::Declaration),
            "pokupki" => Some(Self::PurchaseLedger),
            "prodajbi" | "prodagbi" => Some(Self::SalesLedger),
            _ => None,
        }
    }

    /// Ledger the file is built from, if any.
    #[must_use]
    pub fn ledger_role(self) -> Option<VatRole> {
        match self {
            Self::Declaration => None,
            Self::PurchaseLedger => Some(VatRole::Purchase),
            Self::SalesLedger => Some(VatRole::Sales),
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered file, ready to be transmitted as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Which file this is.
    pub kind: ExportKind,
    /// File name expected by the tax authority.
    pub file_name: &'static str,
    /// Windows-1251 bytes.
    pub bytes: Vec<u8>,
    /// Fields altered while rendering.
    pub warnings: Vec<ExportWarning>,
}
