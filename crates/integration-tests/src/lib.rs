//! Integration tests for Showroom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p showroom-integration-tests
//! ```
//!
//! The storefront router is driven in-process; no server, port or network
//! is needed.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Session cart over HTTP
//! - `storefront_catalog` - Product listing, filter and search
//! - `storefront_contact` - Contact form validation

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde::de::DeserializeOwned;
use showroom_core::{Catalog, RepeatAdd};
use showroom_storefront::config::StorefrontConfig;
use showroom_storefront::state::AppState;
use tower::ServiceExt;

/// The catalog shipped with the storefront.
pub const CATALOG_JSON: &str = include_str!("../../storefront/catalog.json");

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the storefront router over the shipped catalog.
#[must_use]
pub fn test_app(repeat_add: RepeatAdd) -> Router {
    let config = StorefrontConfig {
        repeat_add,
        ..StorefrontConfig::default()
    };
    let catalog = Catalog::from_json(CATALOG_JSON).unwrap();
    showroom_storefront::app(AppState::new(config, catalog))
}

/// A client that keeps the session cookie between requests, like one browser tab.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse the body as JSON.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// The body as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Value of a response header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestClient {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// A second tab sharing nothing with this one.
    #[must_use]
    pub fn fresh_session(&self) -> Self {
        Self::new(self.app.clone())
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(pair) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
