//! Regulatory file export.
//!
//! Renders a calculated declaration and its ledgers into the three
//! fixed-width Windows-1251 files the tax authority imports.
//!
//! # Modules
//!
//! - `layout` - Versioned code table and column widths
//! - `writer` - Fixed-width field formatting
//! - `encoding` - Windows-1251 encoding
//! - `declaration_file` - `DEKLAR.TXT`
//! - `ledger_file` - `POKUPKI.TXT` and `PRODAGBI.TXT`
//! - `exporter` - Entry point
//! - `bundle` - `VAT_YYYY_MM.zip` holding all three files

pub mod bundle;
pub mod declaration_file;
pub mod encoding;
pub mod error;
pub mod exporter;
pub mod kind;
pub mod layout;
pub mod ledger_file;
pub mod writer;

pub use bundle::{ExportBundle, bundle_file_name};
pub use error::{ExportError, ExportWarning, WarningKind};
pub use exporter::{ExportInput, VatExporter};
pub use kind::{ExportArtifact, ExportKind};
pub use layout::LayoutVersion;
