//! # REST API
//!
//! Routes under `/api/v1/blocks`, JSON in camelCase. Errors, including a
//! malformed `:id` or search body (400 `INVALID_REQUEST`), share the
//! `{code, message}` body.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST | `/api/v1/blocks` | create block (201) |
//! | GET | `/api/v1/blocks` | list, newest first |
//! | GET | `/api/v1/blocks/:id` | by id |
//! | GET | `/api/v1/blocks/hash/:hash` | by hash |
//! | POST | `/api/v1/blocks/search` | filtered search |
//! | GET | `/api/v1/blocks/latest` | chain head (409 when empty) |
//! | GET | `/api/v1/blocks/genesis` | genesis or `null` |
//! | GET | `/api/v1/blocks/stats` | statistics |
//! | GET | `/api/v1/blocks/exists/:hash` | `true` / `false` |
//! | GET | `/api/v1/blocks/verify` | chain verification report |
//! | GET | `/api/v1/blocks/:id/height` | walked height |
//! | GET | `/health` | liveness |

mod dto;
mod error;
mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handle::LedgerHandle;

pub use dto::{BlockResponse, BlockStatsResponse, SearchRequest, VerifyResponse};
pub use error::{ApiError, ErrorBody};

pub const BLOCKS_PATH: &str = "/api/v1/blocks";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerHandle,
}

/// Build the HTTP router.
pub fn router(ledger: LedgerHandle) -> Router {
    let state = AppState { ledger };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/v1/blocks",
            get(handlers::list_blocks).post(handlers::create_block),
        )
        .route("/api/v1/blocks/search", post(handlers::search_blocks))
        .route("/api/v1/blocks/latest", get(handlers::latest_block))
        .route("/api/v1/blocks/genesis", get(handlers::genesis_block))
        .route("/api/v1/blocks/stats", get(handlers::chain_stats))
        .route("/api/v1/blocks/verify", get(handlers::verify_chain))
        .route("/api/v1/blocks/hash/:hash", get(handlers::block_by_hash))
        .route("/api/v1/blocks/exists/:hash", get(handlers::block_exists))
        .route("/api/v1/blocks/:id", get(handlers::block_by_id))
        .route("/api/v1/blocks/:id/height", get(handlers::block_height))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
