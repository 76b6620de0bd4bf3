//! Key presses.

use tracing::debug;

use crate::cdp::keys::parse_key_combo;
use crate::error::BrowserError;
use crate::session::Session;

/// Press a named key or combo such as `Control+a` on the focused element.
pub async fn press(session: &mut Session, key: &str) -> Result<(), BrowserError> {
    let combo = parse_key_combo(key)
        .ok_or_else(|| BrowserError::InvalidInput(format!("unknown key: {}", key)))?;
    session.current_page().await?.press_key(&combo).await?;
    debug!("Pressed {}", key);
    Ok(())
}
