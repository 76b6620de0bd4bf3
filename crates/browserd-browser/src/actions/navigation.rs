//! Navigation actions.

use serde::Serialize;
use tracing::info;

use crate::error::BrowserError;
use crate::session::Session;

/// URL and title after a navigation.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

/// Accept absolute URLs as given and bare hosts as `https://`.
pub fn normalize_url(raw: &str) -> Result<String, BrowserError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BrowserError::InvalidInput("url must not be empty".to_string()));
    }
    let has_scheme = raw.contains("://")
        || ["about:", "data:", "file:", "javascript:", "chrome:"]
            .iter()
            .any(|scheme| raw.starts_with(scheme));
    if has_scheme {
        return url::Url::parse(raw)
            .map(|_| raw.to_string())
            .map_err(|e| BrowserError::InvalidInput(format!("invalid url {}: {}", raw, e)));
    }
    let candidate = format!("https://{}", raw);
    url::Url::parse(&candidate)
        .map(|_| candidate)
        .map_err(|e| BrowserError::InvalidInput(format!("invalid url {}: {}", raw, e)))
}

/// URL and title of the active tab.
pub async fn page_info(session: &mut Session) -> Result<PageInfo, BrowserError> {
    let page = session.current_page().await?;
    Ok(PageInfo {
        url: page.get_url().await?,
        title: page.get_title().await?,
    })
}

pub async fn navigate(session: &mut Session, url: &str) -> Result<PageInfo, BrowserError> {
    let url = normalize_url(url)?;
    let page = session.current_page().await?;
    page.navigate(&url).await?;
    info!("Navigated to {}", url);
    page_info(session).await
}

pub async fn back(session: &mut Session) -> Result<PageInfo, BrowserError> {
    session.current_page().await?.go_back().await?;
    page_info(session).await
}

pub async fn forward(session: &mut Session) -> Result<PageInfo, BrowserError> {
    session.current_page().await?.go_forward().await?;
    page_info(session).await
}

pub async fn refresh(session: &mut Session) -> Result<PageInfo, BrowserError> {
    session.current_page().await?.reload().await?;
    page_info(session).await
}
