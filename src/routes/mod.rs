mod common;
mod query;

pub use common::{common_routes, common_routes_with_ready};
pub use query::query_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Service routes at the root, read API under `api_prefix`, with request tracing.
pub fn app(state: AppState, api_prefix: &str) -> Router {
    let api = query_routes(state.clone());
    let prefix = api_prefix.trim_matches('/');
    let router = Router::new().merge(common_routes_with_ready(state));
    let router = if prefix.is_empty() {
        router.merge(api)
    } else {
        router.nest(&format!("/{}", prefix), api)
    };
    router.layer(TraceLayer::new_for_http())
}
