//! Read API routes. Mount under the API prefix (e.g. `/api/v1`).

use crate::handlers::{get_data, get_data_dictionary, get_table, get_tables};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn query_routes(state: AppState) -> Router {
    Router::new()
        .route("/get_tables", get(get_tables))
        .route("/get_data", get(get_data))
        .route("/get_data_dictionary", get(get_data_dictionary))
        .route("/get/:table_name", get(get_table))
        .with_state(state)
}
