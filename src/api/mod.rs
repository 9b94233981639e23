//! HTTP API module for the coffee team builder.
//!
//! `GET /` draws a fresh grouping and `GET /swaps` a fresh desk swap; both
//! store the result as CSV and spreadsheet. `GET /artifacts/:file` downloads
//! a stored file.

mod handlers;
mod response;
mod state;
mod store;

pub use handlers::create_router;
pub use response::{
    ApiError, ApiErrorResponse, GroupingRecord, GroupingResponse, SwapRecord, SwapResponse,
};
pub use state::AppState;
pub use store::{ArtifactStore, StoredArtifact, content_type_for};
