// ABOUTME: The HTTP layer: tiny_http accept loop and request routing.
// ABOUTME: API routes hit the store handlers, everything else the pages.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use mpl_core::Locale;
use mpl_site::{api, pages, ContentStore};
use serde_json::json;
use tiny_http::{Header, Method, Response, Server};

/// What a routed request renders to, before it meets the transport.
#[derive(Debug)]
pub enum Rendered {
    Json(u16, serde_json::Value),
    Html(u16, String),
    Redirect(String),
}

/// Dispatch one request. `url` is the raw request url including any
/// query string; `body` is the request body (empty for GET).
pub fn route(method: &Method, url: &str, body: &str, store: &dyn ContentStore) -> Rendered {
    let (path, raw_query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };

    if path == "/" || path.is_empty() {
        return Rendered::Redirect(format!("/{}/", Locale::default().code()));
    }

    if let Some(endpoint) = path.strip_prefix("/api/") {
        let response = match (method, endpoint) {
            (Method::Get, "posts") => api::get_posts(store, raw_query),
            (Method::Post, "posts") => api::create_post(store, body),
            (Method::Get, "gallery") => api::get_gallery(store, raw_query),
            (Method::Post, "gallery") => api::create_gallery_item(store, body),
            _ => {
                return Rendered::Json(404, json!({ "error": "Not found" }));
            }
        };
        return Rendered::Json(response.status, response.body);
    }

    match Locale::negotiate(path) {
        Some((locale, rest)) => {
            let page = pages::render(store, locale, rest);
            Rendered::Html(page.status, page.html)
        }
        None => {
            let page = pages::not_found(Locale::default());
            Rendered::Html(page.status, page.html)
        }
    }
}

fn content_type(value: &str) -> Option<Header> {
    Header::from_bytes("Content-Type", value).ok()
}

fn respond(request: tiny_http::Request, rendered: Rendered) {
    let result = match rendered {
        Rendered::Json(status, body) => {
            let mut response =
                Response::from_string(body.to_string()).with_status_code(status);
            if let Some(header) = content_type("application/json") {
                response = response.with_header(header);
            }
            request.respond(response)
        }
        Rendered::Html(status, html) => {
            let mut response = Response::from_string(html).with_status_code(status);
            if let Some(header) = content_type("text/html; charset=utf-8") {
                response = response.with_header(header);
            }
            request.respond(response)
        }
        Rendered::Redirect(location) => {
            let mut response = Response::from_string("").with_status_code(302);
            if let Ok(header) = Header::from_bytes("Location", location) {
                response = response.with_header(header);
            }
            request.respond(response)
        }
    };
    if let Err(err) = result {
        tracing::warn!(%err, "failed to write response");
    }
}

/// Accept loop. Blocks the calling thread; the binary runs it on
/// `spawn_blocking`.
pub fn run(port: u16, store: Arc<dyn ContentStore>) -> Result<()> {
    let server = Server::http(("0.0.0.0", port))
        .map_err(|e| anyhow!("failed to bind port {port}: {e}"))?;
    tracing::info!(port, "multipass-labs listening");

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = String::new();
        if method == Method::Post {
            if let Err(err) = request.as_reader().read_to_string(&mut body) {
                tracing::warn!(%err, "failed to read request body");
                respond(request, Rendered::Json(400, json!({ "error": "unreadable body" })));
                continue;
            }
        }

        tracing::debug!(%method, %url, "request");
        // A panicking handler takes down the request, not the server
        let rendered =
            match std::panic::catch_unwind(AssertUnwindSafe(|| route(&method, &url, &body, store.as_ref()))) {
                Ok(rendered) => rendered,
                Err(_) => {
                    tracing::error!(%method, %url, "handler panicked");
                    Rendered::Json(500, json!({ "error": "Internal server error" }))
                }
            };
        respond(request, rendered);
    }
    Ok(())
}
