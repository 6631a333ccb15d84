//! Route handlers. Each one is a thin translation onto a [`LedgerHandle`] call.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use block_ledger::BlockId;

use super::dto::{BlockResponse, BlockStatsResponse, SearchRequest, VerifyResponse};
use super::error::ApiError;
use super::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

pub(super) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Request body, if any, is ignored: every block field is server-assigned.
pub(super) async fn create_block(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<BlockResponse>), ApiError> {
    let block = state.ledger.create_block().await?;
    Ok((StatusCode::CREATED, Json(block.into())))
}

pub(super) async fn list_blocks(State(state): State<AppState>) -> ApiResult<Vec<BlockResponse>> {
    let blocks = state.ledger.list_blocks().await?;
    Ok(Json(blocks.into_iter().map(BlockResponse::from).collect()))
}

pub(super) async fn block_by_id(
    State(state): State<AppState>,
    id: Result<Path<BlockId>, PathRejection>,
) -> ApiResult<BlockResponse> {
    let Path(id) = id?;
    Ok(Json(state.ledger.get_block_by_id(id).await?.into()))
}

pub(super) async fn block_by_hash(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<BlockResponse> {
    Ok(Json(state.ledger.get_block_by_hash(hash).await?.into()))
}

pub(super) async fn search_blocks(
    State(state): State<AppState>,
    request: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Vec<BlockResponse>> {
    let Json(request) = request?;
    let blocks = state.ledger.search_blocks(request.into()).await?;
    Ok(Json(blocks.into_iter().map(BlockResponse::from).collect()))
}

pub(super) async fn latest_block(State(state): State<AppState>) -> ApiResult<BlockResponse> {
    Ok(Json(state.ledger.get_latest_block().await?.into()))
}

pub(super) async fn genesis_block(
    State(state): State<AppState>,
) -> ApiResult<Option<BlockResponse>> {
    let genesis = state.ledger.get_genesis_block().await?;
    Ok(Json(genesis.map(BlockResponse::from)))
}

pub(super) async fn chain_stats(State(state): State<AppState>) -> ApiResult<BlockStatsResponse> {
    Ok(Json(state.ledger.chain_stats().await?.into()))
}

pub(super) async fn block_exists(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<bool> {
    Ok(Json(state.ledger.block_exists(hash).await?))
}

pub(super) async fn verify_chain(State(state): State<AppState>) -> ApiResult<VerifyResponse> {
    Ok(Json(state.ledger.verify_chain().await?.into()))
}

pub(super) async fn block_height(
    State(state): State<AppState>,
    id: Result<Path<BlockId>, PathRejection>,
) -> ApiResult<u64> {
    let Path(id) = id?;
    Ok(Json(state.ledger.block_height(id).await?))
}
