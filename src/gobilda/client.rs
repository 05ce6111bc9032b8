//! HTTP client for the goBILDA storefront.
//!
//! The client is deliberately thin: it issues the three cart-flow requests,
//! captures status/headers/body/cookies raw, and leaves response-severity
//! decisions to the adapter. Session continuity across the three calls rides
//! on the cookie store; the session token itself is read by the adapter but
//! never re-attached by hand.

use crate::cache::{CachePolicy, ResponseCache};
use crate::config::Config;
use crate::error::Result;
use crate::gobilda::models::StoreResponse;
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use tracing::debug;
use wreq::Client;

const GOBILDA_BASE: &str = "https://www.gobilda.com";

/// Session token cookie set by the cart page.
pub const SESSION_COOKIE: &str = "SHOP_SESSION_TOKEN";

/// The three storefront calls of the cart flow - enables mocking for tests.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Fetches the cart page, which establishes the shopping session.
    async fn cart_page(&self) -> Result<StoreResponse>;

    /// Runs a bulk-order search for the literal SKU string.
    async fn search(&self, sku: &str) -> Result<StoreResponse>;

    /// Adds `qty` packages of a product to the server-side cart.
    async fn add_to_cart(&self, product_id: &str, qty: u32) -> Result<StoreResponse>;
}

/// goBILDA HTTP client with cookie jar, explicit timeouts, and the shared
/// response cache.
pub struct GobildaClient {
    client: Client,
    base_url: Option<String>,
    user_agent: String,
    cache: Option<ResponseCache>,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl GobildaClient {
    /// Creates a client for the production storefront.
    pub fn new(config: &Config, client_version: &str) -> Result<Self> {
        Self::with_base_url(config, client_version, None)
    }

    /// Creates a client with an optional custom base URL (for testing).
    pub fn with_base_url(
        config: &Config,
        client_version: &str,
        base_url: Option<String>,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;

        let cache = config.cache_enabled.then(|| {
            ResponseCache::new(CachePolicy {
                expire_after: Duration::from_secs(config.cache_expire_secs),
                ..CachePolicy::default()
            })
        });

        Ok(Self {
            client,
            base_url: base_url.or_else(|| config.base_url.clone()),
            user_agent: format!("partcad/{}", client_version),
            cache,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Returns the base URL (custom for testing, or the production store).
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GOBILDA_BASE)
    }

    /// Runs one request through the cache, the politeness delay, and the
    /// wire, in that order.
    async fn dispatch(
        &self,
        method: &'static str,
        url: &str,
        request: wreq::RequestBuilder,
    ) -> Result<StoreResponse> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(method, url) {
                return Ok(hit);
            }
        }

        self.delay().await;
        debug!("{} {}", method, url);

        let response = request.send().await?;
        let captured = Self::capture(response).await?;
        debug!("Response status: {}", captured.status);

        if let Some(cache) = &self.cache {
            cache.store(method, url, &captured);
        }

        Ok(captured)
    }

    /// Captures a response with everything the adapter needs for session
    /// extraction and parse diagnostics.
    async fn capture(response: wreq::Response) -> Result<StoreResponse> {
        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
            .collect();

        let cookies = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();

        let body = response.text().await?;

        Ok(StoreResponse { status, headers, body, cookies })
    }

    /// Adds a delay with jitter between requests.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl Storefront for GobildaClient {
    async fn cart_page(&self) -> Result<StoreResponse> {
        let url = format!("{}/cart.php", self.base_url());

        let request = self.client.get(&url).header("User-Agent", self.user_agent.as_str());
        self.dispatch("GET", &url, request).await
    }

    async fn search(&self, sku: &str) -> Result<StoreResponse> {
        let base = self.base_url();
        let url = format!("{}/search.php?search_query={}", base, urlencoding::encode(sku));

        // Header stanza the bulk-order cart flow sends; the storefront
        // serves a rendered fragment instead of the full page.
        let request = self
            .client
            .get(&url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Referer", format!("{}/bulk-order", base))
            .header("Origin", base)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Sec-Fetch-Dest", "empty")
            .header("Sec-Fetch-Mode", "cors")
            .header("Sec-Fetch-Site", "same-origin")
            .header("Stencil-Config", "{}")
            .header("Stencil-Options", r#"{"render_with":"search/bulk-order-results"}"#);

        self.dispatch("GET", &url, request).await
    }

    async fn add_to_cart(&self, product_id: &str, qty: u32) -> Result<StoreResponse> {
        let url = format!("{}/remote/v1/cart/add", self.base_url());

        let form = wreq::multipart::Form::new()
            .text("product_id", product_id.to_string())
            .text("qty[]", qty.to_string())
            .text("action", "add");

        let request =
            self.client.post(&url).header("User-Agent", self.user_agent.as_str()).multipart(form);

        self.dispatch("POST", &url, request).await
    }
}
