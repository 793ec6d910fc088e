//! # cfu-stub: In-Memory Control Service
//!
//! A development and test server for the control collection API that
//! `cfu-client` talks to:
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET    | `/health` | 200 |
//! | GET    | `/controls` | 200, JSON array in insertion order |
//! | POST   | `/submit` | 201 `{"message","control"}` |
//! | PUT    | `/controls/{id}` | 200 `{"message","control"}` |
//! | DELETE | `/controls/{id}` | 200 `{"message"}` |
//!
//! Failures carry `{"error": "..."}`. Storage is in memory and lost on
//! restart.

pub mod routes;
pub mod store;

pub use routes::router;
pub use store::{AppState, StoreError};

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Default listen port, matching the client's default base URL.
pub const DEFAULT_PORT: u16 = 3000;

/// Serve `state` on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = router(state).layer(TraceLayer::new_for_http());
    axum::serve(listener, app.into_make_service()).await
}
