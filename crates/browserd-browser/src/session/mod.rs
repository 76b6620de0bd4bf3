//! Ownership of the single browser process and its tabs.
//!
//! All access goes through [`SessionManager`]; callers hold a
//! [`SessionGuard`] for the duration of one operation.

mod browser;
mod launch;
mod manager;
mod tabs;

pub use browser::Session;
pub use launch::{find_chrome, launch_args};
pub use manager::{SessionGuard, SessionManager, SessionState, SessionStatus};
pub use tabs::{ClosedTab, TabInfo};
