//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, Cookie, CookieParam, PageInfo, TargetInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Upper bound for a single command round trip.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for discovery requests and the WebSocket handshake.
pub(crate) const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP client for the debugging endpoint. Requests that hang count as failures.
fn discovery_client() -> Result<reqwest::Client, CdpError> {
    reqwest::Client::builder()
        .connect_timeout(DISCOVERY_TIMEOUT)
        .timeout(DISCOVERY_TIMEOUT)
        .build()
        .map_err(|e| CdpError::Http(e.to_string()))
}

/// Pending request waiting for response.
struct PendingRequest {
    tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Socket half plus request bookkeeping, shared by the client and every page session.
pub(crate) struct Transport {
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    closed: AtomicBool,
}

impl Transport {
    /// Send a command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        if self.is_closed() {
            return Err(CdpError::SessionClosed);
        }

        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        let sent = {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(json.into())).await
        };
        if let Err(e) = sent {
            self.pending.lock().remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Route one incoming frame to the request waiting for it.
    fn dispatch(&self, text: &str) {
        let resp = match serde_json::from_str::<CdpResponse>(text) {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Failed to parse CDP message: {}", e);
                return;
            }
        };

        match resp.id {
            Some(id) => {
                let Some(req) = self.pending.lock().remove(&id) else {
                    return;
                };
                let result = match resp.error {
                    Some(error) => Err(CdpError::Protocol {
                        code: error.code,
                        message: error.message,
                    }),
                    None => Ok(resp.result.unwrap_or(Value::Null)),
                };
                let _ = req.tx.send(result);
            }
            None => {
                if let Some(method) = resp.method.as_deref() {
                    if method == "Target.detachedFromTarget" {
                        let target = resp.params.as_ref().and_then(|p| p["targetId"].as_str());
                        debug!("Detached from target {:?}", target);
                    }
                }
            }
        }
    }

    /// Mark the socket dead and fail everything still waiting on it.
    fn shut(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let drained: Vec<_> = self.pending.lock().drain().collect();
        for (_, req) in drained {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }
}

/// CDP client for a single browser process.
pub struct CdpClient {
    /// HTTP endpoint for discovery and tab creation.
    http_endpoint: String,
    http: reqwest::Client,
    browser_ws_url: String,
    transport: Arc<Transport>,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to the browser at the given debugging endpoint, e.g. `http://127.0.0.1:18860`.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let http = discovery_client()?;
        let version = Self::fetch_version(&http, &http_endpoint).await?;
        debug!("Found browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;
        let handshake = tokio_tungstenite::connect_async(browser_ws_url.as_str());
        let (ws_stream, _) = tokio::time::timeout(DISCOVERY_TIMEOUT, handshake)
            .await
            .map_err(|_| CdpError::ConnectionFailed("WebSocket handshake timed out".to_string()))?
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let transport = Arc::new(Transport {
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        });

        let recv_task = {
            let transport = transport.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, &transport).await;
                transport.shut();
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            http,
            browser_ws_url,
            transport,
            recv_task,
        })
    }

    /// Fetch `/json/version` from a debugging endpoint.
    pub async fn version(endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let http = discovery_client()?;
        Self::fetch_version(&http, endpoint).await
    }

    async fn fetch_version(
        http: &reqwest::Client,
        endpoint: &str,
    ) -> Result<BrowserVersion, CdpError> {
        let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
        http.get(&version_url)
            .send()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))
    }

    async fn receive_loop(mut ws_source: WsSource, transport: &Transport) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    transport.dispatch(&text);
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    /// Whether the socket to the browser has gone away.
    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    // ========================================================================
    // Target Management
    // ========================================================================

    /// Open page targets, in the browser's reporting order.
    pub async fn list_page_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        let result = self.call("Target.getTargets", None).await?;
        let targets: Vec<TargetInfo> = serde_json::from_value(result["targetInfos"].clone())?;
        Ok(targets.into_iter().filter(TargetInfo::is_page).collect())
    }

    /// Open a blank tab and attach to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        // Chrome requires PUT for /json/new
        let create_url = format!("{}/json/new", self.http_endpoint);

        let page_info: PageInfo = self
            .http
            .put(&create_url)
            .send()
            .await?
            .json()
            .await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        self.attach_page(&page_info.id).await
    }

    /// Attach to an existing tab.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(target_id.to_string(), session_id, self.transport.clone());
        session.enable_domains().await?;
        Ok(session)
    }

    /// Bring a tab to the foreground.
    pub async fn activate(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.activateTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Close a tab.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    // ========================================================================
    // Cookies
    // ========================================================================

    /// Every cookie in the browser context.
    pub async fn get_cookies(&self) -> Result<Vec<Cookie>, CdpError> {
        let result = self.call("Storage.getCookies", None).await?;
        let cookies: Vec<Cookie> = serde_json::from_value(result["cookies"].clone())?;
        Ok(cookies)
    }

    pub async fn set_cookies(&self, cookies: &[CookieParam]) -> Result<(), CdpError> {
        self.call("Storage.setCookies", Some(json!({"cookies": cookies})))
            .await?;
        Ok(())
    }

    pub async fn clear_cookies(&self) -> Result<(), CdpError> {
        self.call("Storage.clearCookies", None).await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
        self.transport.shut();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
