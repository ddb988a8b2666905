//! Repository implementations of the core persistence ports.

pub mod ledger;
pub mod vat_return;

pub use ledger::LedgerRepository;
pub use vat_return::VatReturnRepository;
