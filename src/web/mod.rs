//! Embedded web dashboard for checkrr-dash.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with the status bar, stats charts and the
//!   bad-files grid
//! - JSON endpoints exposing the three view models and the two user actions
//!
//! The server mounts a [`Dashboard`], so the backend is polled once per view
//! no matter how many browser tabs are open. Launched via `checkrr-dash serve`
//! (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::CheckrrClient;
use crate::views::Dashboard;

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A bound dashboard server. Requests are handled sequentially, which is
/// plenty for a local dashboard.
pub struct WebServer {
    server: Server,
    dashboard: Dashboard,
    interval: Duration,
}

impl WebServer {
    /// Bind `addr` and take ownership of the dashboard. `interval` is how
    /// often the page re-reads the view endpoints.
    pub fn bind(addr: &str, dashboard: Dashboard, interval: Duration) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;
        Ok(Self {
            server,
            dashboard,
            interval,
        })
    }

    /// The bound address; useful when binding port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve requests until the listener fails. A failing handler answers
    /// 500 and the server keeps going.
    pub fn run(self) -> Result<()> {
        for mut request in self.server.incoming_requests() {
            let method = request.method().clone();
            let url = request.url().to_string();

            let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
                let mut buf = String::new();
                if let Err(e) = request.as_reader().read_to_string(&mut buf) {
                    tracing::warn!(%method, %url, error = %e, "failed to read request body");
                }
                Some(buf)
            } else {
                None
            };

            let reply = match dispatch(&self.dashboard, self.interval, &method, &url, body.as_deref()) {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!(%method, %url, error = %format!("{e:#}"), "handler failed");
                    Reply::error(500, &format!("{e:#}"))
                }
            };

            let status = reply.status;
            if let Err(e) = request.respond(reply.into_response()) {
                tracing::debug!(%url, error = %e, "client went away");
            }
            tracing::info!(%method, %url, status, "request");
        }
        Ok(())
    }
}

/// Mount a dashboard for `client`, bind `addr` and serve until interrupted.
pub fn serve(addr: &str, client: CheckrrClient, interval: Duration, open: bool) -> Result<()> {
    let backend = client.base_url().to_string();
    let dashboard = Dashboard::mount(client, interval).context("failed to start view pollers")?;
    let server = WebServer::bind(addr, dashboard, interval)?;

    let shown = server
        .local_addr()
        .map_or_else(|| addr.to_string(), |a| a.to_string());
    println!("checkrr dashboard running at http://{shown} (backend {backend})");
    println!("Press Ctrl+C to stop.\n");

    if open && let Err(e) = open_browser(&format!("http://{shown}")) {
        tracing::debug!(error = %e, "could not open a browser");
    }

    server.run()
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    dashboard: &Dashboard,
    interval: Duration,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Reply> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Ok(Reply::html(frontend::index_html(interval.as_millis())))
        }

        (&Method::Get, "/view/status") => api::get_status(dashboard),
        (&Method::Get, "/view/stats") => api::get_stats(dashboard),
        (&Method::Get, "/view/files") => api::get_files(dashboard),

        (&Method::Post, "/action/run") => api::post_run(dashboard),
        (&Method::Post, "/action/delete") => api::post_delete(dashboard, body.unwrap_or("")),

        _ => Ok(Reply::error(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// A handler's answer, converted to a `tiny_http` response at the edge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    const JSON: &'static str = "application/json; charset=utf-8";
    const HTML: &'static str = "text/html; charset=utf-8";

    pub fn json<T: serde::Serialize + ?Sized>(status: u16, data: &T) -> Result<Self> {
        let body = serde_json::to_vec(data).context("failed to serialize response")?;
        Ok(Self {
            status,
            content_type: Self::JSON,
            body,
        })
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: Self::JSON,
            body: serde_json::json!({ "error": message }).to_string().into_bytes(),
        }
    }

    fn html(page: String) -> Self {
        Self {
            status: 200,
            content_type: Self::HTML,
            body: page.into_bytes(),
        }
    }

    fn into_response(self) -> HttpResponse {
        let mut resp = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Ok(header) = Header::from_bytes("Content-Type", self.content_type) {
            resp.add_header(header);
        }
        resp
    }
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BaseUrl;

    fn offline() -> Dashboard {
        let base = BaseUrl::parse("http://127.0.0.1:9/").unwrap();
        Dashboard::new(CheckrrClient::new(base))
    }

    fn get(path: &str) -> Reply {
        dispatch(&offline(), Duration::from_secs(10), &Method::Get, path, None).unwrap()
    }

    #[test]
    fn index_is_html_with_interval() {
        let reply = get("/?tab=files");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        let page = String::from_utf8(reply.body).unwrap();
        assert!(page.contains("const INTERVAL = 10000;"));
    }

    #[test]
    fn unknown_route_is_json_404() {
        let reply = get("/api/nope");
        assert_eq!(reply.status, 404);
        let body: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body["error"], "not found");
    }

    #[test]
    fn wrong_method_is_404() {
        let reply = dispatch(&offline(), Duration::from_secs(1), &Method::Get, "/action/run", None)
            .unwrap();
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn views_are_null_before_first_fetch() {
        for path in ["/view/status", "/view/stats", "/view/files"] {
            let reply = get(path);
            assert_eq!(reply.status, 200, "{path}");
            assert_eq!(reply.body, b"null", "{path}");
        }
    }
}
