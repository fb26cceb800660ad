//! DataGate HTTP/JSON gateway.
//!
//! Exposes the generic data-access surface over REST: clients name an entity
//! type in the request path and the gateway dispatches through the type
//! catalog to a repository bound to that type for the request.

pub mod config;
pub mod error;
pub mod model;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use datagate_core::{FieldIntrospector, Store, TypeCatalog};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// The sealed type catalog.
    pub catalog: Arc<TypeCatalog>,
    /// Shared persistence store.
    pub store: Store,
    /// Memoizing field introspector.
    pub introspector: Arc<FieldIntrospector>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(catalog: TypeCatalog, store: Store, config: GatewayConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            introspector: Arc::new(FieldIntrospector::new()),
            config,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::data::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
