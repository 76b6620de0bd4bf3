//! Chrome DevTools Protocol transport.
//!
//! A single browser-level WebSocket carries every command. Page targets are
//! attached in flattened mode, so each [`PageSession`] is just a session id
//! sharing the client's socket, pending-request table and id counter.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://127.0.0.1:18860").await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.com").await?;
//! ```

mod client;
mod error;
pub mod keys;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
