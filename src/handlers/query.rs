//! Read API handlers: table listing, joined data pages, data dictionary, table preview.

use crate::catalog::TableMeta;
use crate::error::AppError;
use crate::response::{DataDictionaryResult, DataResult};
use crate::service::{DataRequest, QueryService};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde_json::{Map, Value};

pub async fn get_tables(State(state): State<AppState>) -> Result<Json<Vec<TableMeta>>, AppError> {
    let tables = QueryService::list_tables(state.catalog.as_ref()).await?;
    Ok(Json(tables))
}

pub async fn get_data(
    State(state): State<AppState>,
    query: Result<Query<DataRequest>, QueryRejection>,
) -> Result<Json<DataResult>, AppError> {
    let Query(req) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    tracing::info!(
        primary_table = %req.primary_table,
        additional_tables = ?req.additional_tables,
        join_col = ?req.join_col,
        limit = ?req.limit,
        offset = ?req.offset,
        "get_data"
    );
    let result = QueryService::get_data(&state.pool, state.catalog.as_ref(), &state.query, &req).await?;
    Ok(Json(result))
}

pub async fn get_data_dictionary(State(state): State<AppState>) -> Result<Json<DataDictionaryResult>, AppError> {
    let result = QueryService::data_dictionary(state.catalog.as_ref()).await?;
    Ok(Json(result))
}

pub async fn get_table(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Json<Vec<Map<String, Value>>>, AppError> {
    let rows = QueryService::preview(&state.pool, state.catalog.as_ref(), &state.query, &table_name).await?;
    Ok(Json(rows))
}
