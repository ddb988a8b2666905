//! VAT period selection and aggregation.
//!
//! # Modules
//!
//! - `types` - Ledger lines, operations, and company profile
//! - `period` - Period identity and due-date policy
//! - `coefficient` - Credit coefficient for partial-credit purchases
//! - `declaration` - The aggregated declaration and its settlement sections
//! - `selector` - Reads a period's lines from the ledger
//! - `aggregator` - Folds lines into a declaration
//! - `error` - VAT-specific error types

pub mod aggregator;
pub mod coefficient;
pub mod declaration;
pub mod error;
pub mod period;
pub mod selector;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{PurchaseTotals, SalesTotals, VatAggregator};
pub use coefficient::CreditCoefficient;
pub use declaration::{Settlement, VatDeclaration};
pub use error::VatError;
pub use period::{DueDatePolicy, PeriodKey, StatutoryDueDate};
pub use selector::{LedgerSource, PeriodSelection, document_order, select_lines, select_period};
pub use types::{
    CompanyProfile, CreditRight, DocumentType, LedgerLine, SalesCategory, VatOperation, VatRole,
};
