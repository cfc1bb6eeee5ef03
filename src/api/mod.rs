// HTTP API module
// Exposes the pipelines over axum: health, ingest-by-path, similarity
// retrieval, and clustering.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use routes::{create_router, start_server};
pub use state::AppState;
