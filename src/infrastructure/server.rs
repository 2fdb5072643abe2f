//! HTTP serving for resolved assets.
//!
//! Every request goes through a single fallback handler that asks the
//! catalog which file backs the request path.

use crate::core::interfaces::SharedCatalog;
use crate::utils::{AssetError, Logger, Result};
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use tower_http::trace::TraceLayer;

pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
pub const NO_CACHE: &str = "no-cache";

pub struct AssetServer {
    catalog: SharedCatalog,
    prefix: String,
}

impl AssetServer {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self {
            catalog,
            prefix: String::new(),
        }
    }

    /// URL prefix shown in the startup log line
    pub fn with_display_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.trim_matches('/').to_string();
        self
    }

    pub fn router(&self) -> Router {
        router(self.catalog.clone())
    }

    /// Bind and serve until ctrl-c
    pub async fn run(self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AssetError::server(format!("Failed to bind to {}: {}", addr, e)))?;

        Logger::serving(&addr.to_string(), &self.prefix);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AssetError::server(format!("Server error: {}", e)))?;

        Logger::info("✅ Asset server stopped");
        Ok(())
    }
}

pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .fallback(serve_asset)
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        Logger::warn(&format!("Failed to listen for ctrl-c: {}", e));
        std::future::pending::<()>().await;
    }
}

async fn serve_asset(State(catalog): State<SharedCatalog>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Method not allowed",
        )
            .into_response();
    }

    // Served names are stored unescaped
    let path = match urlencoding::decode(uri.path()) {
        Ok(path) => path,
        Err(_) => return not_found(uri.path()),
    };
    let Some(file) = catalog.resolve_url(&path) else {
        return not_found(&path);
    };

    let content = match tokio::fs::read(&file).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return not_found(&path),
        Err(e) => {
            Logger::error(&format!("Error reading asset {}: {}", file.display(), e));
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read asset").into_response();
        }
    };

    let cache_control = if catalog.is_fingerprinted() {
        IMMUTABLE_CACHE_CONTROL
    } else {
        NO_CACHE
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type(&file)),
            (header::CACHE_CONTROL, cache_control),
        ],
        Body::from(content),
    )
        .into_response()
}

fn not_found(path: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("Asset not found: {}", path)).into_response()
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("js") | Some("mjs") => "application/javascript",
        Some("css") => "text/css",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("json") | Some("map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
