//! # browserd API
//!
//! REST surface over the single browser session.
//!
//! ## Architecture
//!
//! ```text
//! HTTP request ─► ApiJson / Query ─► handler ─► SessionManager::acquire ─► actions
//!                                        │
//!                                        └─► WaitEngine (lock per poll only)
//! ```
//!
//! Every response body carries `"ok"`. Failures are
//! `{"ok": false, "kind": <Kind>, "error": <message>}` with a status code
//! chosen by kind; no failure terminates the server.

pub mod error;
pub mod extract;
pub mod http;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::ApiJson;
pub use http::routes::create_router;
pub use server::{ApiServer, ServerError};
pub use state::AppState;
