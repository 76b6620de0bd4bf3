//! Browser-wide cookie access.

use tracing::info;

use crate::cdp::{Cookie, CookieParam};
use crate::error::BrowserError;
use crate::session::Session;

pub async fn get_cookies(session: &mut Session) -> Result<Vec<Cookie>, BrowserError> {
    Ok(session.client().get_cookies().await?)
}

/// Scope cookies that name neither `url` nor `domain` to `page_url`.
pub(crate) fn apply_default_url(
    cookies: &mut [CookieParam],
    page_url: &str,
) -> Result<(), BrowserError> {
    if cookies.iter().all(CookieParam::has_scope) {
        return Ok(());
    }
    if !(page_url.starts_with("http://") || page_url.starts_with("https://")) {
        return Err(BrowserError::InvalidInput(format!(
            "cookies without url or domain need an http(s) page, current page is {}",
            page_url
        )));
    }
    for cookie in cookies.iter_mut().filter(|c| !c.has_scope()) {
        cookie.url = Some(page_url.to_string());
    }
    Ok(())
}

/// Set cookies. Returns how many were set.
pub async fn set_cookies(
    session: &mut Session,
    mut cookies: Vec<CookieParam>,
) -> Result<usize, BrowserError> {
    if cookies.iter().any(|c| c.name.is_empty()) {
        return Err(BrowserError::InvalidInput("cookie name must not be empty".to_string()));
    }
    if !cookies.iter().all(CookieParam::has_scope) {
        let page_url = session.current_page().await?.get_url().await?;
        apply_default_url(&mut cookies, &page_url)?;
    }
    session.client().set_cookies(&cookies).await?;
    info!("Set {} cookie(s)", cookies.len());
    Ok(cookies.len())
}

pub async fn clear_cookies(session: &mut Session) -> Result<(), BrowserError> {
    session.client().clear_cookies().await?;
    info!("Cleared browser cookies");
    Ok(())
}
