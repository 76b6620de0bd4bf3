//! # browserd Browser
//!
//! Drives a single Chrome instance over the Chrome DevTools Protocol (CDP).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   one WebSocket, flattened sessions   ┌──────────────┐
//! │  SessionManager  │ ◄───────────────────────────────────► │    Chrome    │
//! │  (this crate)    │                 CDP                   │  (child proc)│
//! └──────────────────┘                                       └──────────────┘
//! ```
//!
//! - [`session`] owns the browser process, its tabs and the launch generation.
//! - [`selector`] parses prefixed selector strings and resolves them in page.
//! - [`wait`] polls conditions without holding the session across sleeps.
//! - [`actions`] clicks, types, presses keys, scrolls and evaluates scripts.
//! - [`snapshot`] renders a bounded text summary of the visible page.
//!
//! Chrome is launched with a persistent user-data directory so logins and
//! cookies survive restarts.

pub mod actions;
pub mod cdp;
pub mod error;
pub mod selector;
pub mod session;
pub mod snapshot;
pub mod wait;

pub use error::{BrowserError, ErrorKind};
pub use selector::{ElementHandle, Selector};
pub use session::{Session, SessionGuard, SessionManager, SessionState, SessionStatus};
pub use wait::{WaitCondition, WaitEngine, WaitOutcome};
