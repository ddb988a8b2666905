//! VAT return lifecycle management.
//!
//! # Modules
//!
//! - `types` - Return status and lifecycle actions
//! - `error` - Lifecycle-specific error types
//! - `service` - State transition and mutation guard logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LifecycleError;
pub use service::LifecycleService;
pub use types::{LifecycleAction, VatReturnStatus};
