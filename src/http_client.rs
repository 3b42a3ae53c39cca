// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - HTTP Client
 * Shared client for source adapters: pooling, cookies, typed status errors
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use crate::errors::{HttpError, ReconResult};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Realistic browser User-Agents to avoid detection
const BROWSER_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    // Edge on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Get a realistic browser User-Agent (rotates to avoid blocks)
fn get_browser_user_agent() -> &'static str {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let index = COUNTER.fetch_add(1, Ordering::Relaxed) % BROWSER_USER_AGENTS.len();
    BROWSER_USER_AGENTS[index]
}

/// Maximum response body size (10MB) to prevent memory exhaustion
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

const DEFAULT_POOL_IDLE_PER_HOST: usize = 8;
const DEFAULT_POOL_MAX_IDLE_TIMEOUT: u64 = 90;

/// A fully buffered HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Shared HTTP client for all scraping and API adapters.
///
/// Held for the lifetime of one discovery run and handed to every adapter
/// as an `Arc`; the orchestrator drops it after fan-in. The cookie store is
/// enabled because session-establishing scrapers (dnsdumpster) depend on
/// cookies surviving between the token fetch and the query POST.
///
/// Non-2xx statuses become typed errors here so the retry policy can
/// classify them; retry itself is applied by callers through an explicit
/// policy object, never inside this client.
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> ReconResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(get_browser_user_agent())
            .cookie_store(true)
            .pool_max_idle_per_host(DEFAULT_POOL_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_MAX_IDLE_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| HttpError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            max_body_size: MAX_BODY_SIZE,
        })
    }

    /// Send a GET request
    pub async fn get(&self, url: &str) -> ReconResult<HttpResponse> {
        self.get_with_headers(url, &[]).await
    }

    /// Send a GET request with additional headers
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> ReconResult<HttpResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        self.read_response(url, response).await
    }

    /// Send a form-encoded POST request with additional headers
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> ReconResult<HttpResponse> {
        let mut request = self.client.post(url).form(form);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        self.read_response(url, response).await
    }

    async fn read_response(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> ReconResult<HttpResponse> {
        let status = response.status();
        let status_code = status.as_u16();

        let headers_map = {
            let headers = response.headers();
            let mut map = HashMap::with_capacity(headers.len());
            for (k, v) in headers.iter() {
                if let Ok(value_str) = v.to_str() {
                    map.insert(k.as_str().to_string(), value_str.to_string());
                }
            }
            map
        };

        let body_bytes = response.bytes().await?;
        if body_bytes.len() > self.max_body_size {
            return Err(HttpError::BodyTooLarge {
                url: url.to_string(),
                size: body_bytes.len(),
                max_size: self.max_body_size,
            }
            .into());
        }
        let body = String::from_utf8_lossy(&body_bytes).to_string();

        debug!(
            url = url,
            status = status_code,
            body_len = body.len(),
            "HTTP response received"
        );

        if status.is_server_error() {
            return Err(HttpError::ServerError {
                status_code,
                url: url.to_string(),
            }
            .into());
        }
        if status.is_client_error() {
            return Err(HttpError::ClientError {
                status_code,
                url: url.to_string(),
            }
            .into());
        }

        Ok(HttpResponse {
            status_code,
            body,
            headers: headers_map,
        })
    }
}
