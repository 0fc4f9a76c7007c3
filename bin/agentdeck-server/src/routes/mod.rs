//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional OpenAPI document (disable with `AGENTDECK_ENABLE_API_DOCS=false`)
//! - Health route
//! - Chat pages
//! - `/api` agent endpoints

pub mod api;
pub mod doc;
mod health;
mod pages;

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Router};

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(pages::router())
        .nest("/api", api::router());

    if state.config.enable_api_docs {
        app = app.route("/api-docs/openapi.json", get(doc::openapi_json));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(cors::cors_layer(state.config.cors_allowed_origins.as_deref()))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
