//! VAT return control operations.
//!
//! # Modules
//!
//! - `types` - The stored return and update input
//! - `store` - Persistence port implemented by the db crate
//! - `locks` - Per-period reader/writer locks
//! - `service` - Generate, update, submit, delete, and export
//! - `error` - Control-surface error taxonomy

pub mod error;
pub mod locks;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{StoreError, VatReturnError};
pub use locks::PeriodLocks;
pub use service::VatReturnService;
pub use store::VatReturnStore;
pub use types::{DeclarationUpdate, VatReturn};
