//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes over the VAT return service
//! - Error rendering as `{ "error", "message" }` JSON bodies, including
//!   rejected bodies, paths and query strings
//! - Response types

pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use axum::http::Uri;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use dds_core::returns::{VatReturnService, VatReturnStore};
use dds_core::vat::LedgerSource;
use dds_shared::AppError;

use crate::error::ApiError;

/// Application state shared across handlers.
pub struct AppState<S: VatReturnStore, L: LedgerSource> {
    /// The VAT return control operations.
    pub service: VatReturnService<S, L>,
}

impl<S: VatReturnStore, L: LedgerSource> AppState<S, L> {
    /// Wraps a service.
    #[must_use]
    pub fn new(service: VatReturnService<S, L>) -> Self {
        Self { service }
    }
}

impl<S: VatReturnStore, L: LedgerSource> Clone for AppState<S, L> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Creates the main application router.
pub fn create_router<S, L>(state: AppState<S, L>) -> Router
where
    S: VatReturnStore + 'static,
    L: LedgerSource + 'static,
{
    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", routes::api_routes())
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> ApiError {
    AppError::NotFound(format!("route {}", uri.path())).into()
}
