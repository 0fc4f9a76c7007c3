use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// CORS for the agent API. `origins` is the comma-separated allow-list from
/// `AGENTDECK_CORS_ORIGINS`; unset or unparsable means any origin.
pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .into_iter()
        .flat_map(|list| list.split(','))
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if allowed.is_empty() {
        // Wildcard, fine for local use; set AGENTDECK_CORS_ORIGINS when exposed.
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}
