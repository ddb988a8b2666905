//! API route definitions.

use axum::Router;

use crate::AppState;
use dds_core::returns::VatReturnStore;
use dds_core::vat::LedgerSource;

pub mod health;
pub mod vat_returns;

/// Creates the versioned API router.
pub fn api_routes<S, L>() -> Router<AppState<S, L>>
where
    S: VatReturnStore + 'static,
    L: LedgerSource + 'static,
{
    Router::new().merge(vat_returns::routes())
}
