//! Selector grammar and element resolution.
//!
//! A selector string is parsed into a [`Selector`] by prefix and resolved
//! in page script to zero or more [`ElementHandle`]s in document order.

mod handle;
mod parse;
mod resolve;
mod scripts;

pub use handle::{ElementHandle, PageContext};
pub use parse::{Selector, TextMatch};
pub use resolve::{Presence, presence, resolve, resolve_first};
pub(crate) use scripts::VISIBLE_FN;
