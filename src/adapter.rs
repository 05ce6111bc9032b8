//! Vendor adapter operations and dispatch.
//!
//! The aggregator enters the adapter through one of four named operations;
//! `dispatch` maps the name onto the `VendorAdapter` trait. The quote flow
//! chains the three storefront calls (cart page, SKU search, cart add) and
//! aggregates a total price with the fixed fulfillment window.

use crate::error::{AdapterError, Result};
use crate::gobilda::client::{Storefront, SESSION_COOKIE};
use crate::gobilda::models::{
    Availability, CartAddition, CartSession, PartsCart, Quote, QuoteRequest, StoreResponse,
};
use crate::gobilda::parser;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, warn};

/// Vendor tag this adapter answers for.
pub const VENDOR_TAG: &str = "gobilda";

/// Operations the aggregator dispatches by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Capabilities,
    Availability,
    Quote,
    Order,
}

impl FromStr for Operation {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "caps" => Ok(Operation::Capabilities),
            "avail" => Ok(Operation::Availability),
            "quote" => Ok(Operation::Quote),
            "order" => Ok(Operation::Order),
            other => Err(AdapterError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Capabilities => write!(f, "caps"),
            Operation::Availability => write!(f, "avail"),
            Operation::Quote => write!(f, "quote"),
            Operation::Order => write!(f, "order"),
        }
    }
}

/// Result of a dispatched operation. Operations that report nothing on
/// success serialize as null.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Availability(Availability),
    Quote(Quote),
    Accepted,
}

/// Capability set every vendor adapter offers, each operation independently
/// callable and testable.
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    /// Queries adapter capabilities. Store adapters do not answer these.
    fn check_capabilities(&self) -> Result<()>;

    /// Static capability flag: is this vendor serviced here at all. The SKU
    /// is accepted but not checked against live inventory.
    fn check_availability(&self, vendor: Option<&str>, sku: Option<&str>) -> Availability;

    /// Produces an aggregate price quote for the cart.
    async fn quote(&self, cart: &PartsCart) -> Result<Quote>;

    /// Places an order for the cart.
    async fn order(&self, cart: &PartsCart) -> Result<()>;
}

/// Routes one aggregator request to the matching adapter operation.
pub async fn dispatch<A: VendorAdapter>(
    adapter: &A,
    operation: Operation,
    request: &QuoteRequest,
) -> Result<Outcome> {
    match operation {
        Operation::Capabilities => adapter.check_capabilities().map(|()| Outcome::Accepted),
        Operation::Availability => Ok(Outcome::Availability(
            adapter.check_availability(request.vendor.as_deref(), request.sku.as_deref()),
        )),
        Operation::Quote => {
            let cart = request.cart.as_ref().ok_or(AdapterError::InvalidRequest("cart"))?;
            adapter.quote(cart).await.map(Outcome::Quote)
        }
        Operation::Order => {
            let cart = request.cart.as_ref().ok_or(AdapterError::InvalidRequest("cart"))?;
            adapter.order(cart).await.map(|()| Outcome::Accepted)
        }
    }
}

/// One diagnostic line with everything needed to debug a scrape failure.
fn log_parse_failure(context: &str, response: &StoreResponse) {
    error!(
        "Failed to parse {} response: {}: {}: {}",
        context,
        response.status,
        response.headers_line(),
        response.body
    );
}

/// The goBILDA quoting adapter. Holds its storefront explicitly; no state
/// survives between operations.
pub struct GobildaAdapter<S: Storefront> {
    store: S,
    vendor_tag: &'static str,
}

impl<S: Storefront> GobildaAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store, vendor_tag: VENDOR_TAG }
    }

    /// Fetches the cart page to establish the shopping session.
    ///
    /// A missing session cookie or unexpected markup is a soft failure: one
    /// diagnostic line, then a degraded session. Transport failures still
    /// propagate. The returned token is informational; session continuity
    /// is carried by the client's cookie jar.
    pub async fn init_cart(&self) -> Result<CartSession> {
        let response = self.store.cart_page().await?;

        match response.cookie(SESSION_COOKIE) {
            Some(token) => {
                let empty = parser::cart_is_empty(&response.body);
                debug!("shopping session established (cart empty: {})", empty);
                Ok(CartSession { token: Some(token.to_string()), empty })
            }
            None => {
                log_parse_failure("cart page", &response);
                Ok(CartSession::default())
            }
        }
    }

    /// Resolves a SKU to the storefront's product id via bulk-order search.
    /// A non-200 answer means the part cannot be quoted at all; a 200 page
    /// without a matching entry resolves to `None`.
    pub async fn resolve_product(&self, sku: &str) -> Result<Option<String>> {
        let response = self.store.search(sku).await?;

        if response.status != 200 {
            return Err(AdapterError::PartNotFound { sku: sku.to_string() });
        }

        Ok(parser::find_product_id(&response.body, sku))
    }

    /// Adds `qty` packages of the product to the server-side cart and
    /// reports the line price and cart id. Both the HTTP status and the
    /// body decode are checked strictly here: a failed cart mutation must
    /// never be treated as success.
    pub async fn add_item(&self, sku: &str, product_id: &str, qty: u32) -> Result<CartAddition> {
        let response = self.store.add_to_cart(product_id, qty).await?;

        if response.status != 200 {
            return Err(AdapterError::AddToCart {
                sku: sku.to_string(),
                product_id: product_id.to_string(),
                status: response.status,
            });
        }

        match parser::parse_cart_addition(&response.body) {
            Ok(addition) => Ok(addition),
            Err(e) => {
                log_parse_failure("cart add", &response);
                Err(AdapterError::MalformedAddResponse(e))
            }
        }
    }
}

#[async_trait]
impl<S: Storefront> VendorAdapter for GobildaAdapter<S> {
    fn check_capabilities(&self) -> Result<()> {
        Err(AdapterError::Unsupported("caps"))
    }

    fn check_availability(&self, vendor: Option<&str>, _sku: Option<&str>) -> Availability {
        Availability { available: vendor == Some(self.vendor_tag) }
    }

    async fn quote(&self, cart: &PartsCart) -> Result<Quote> {
        let now = Utc::now();

        let session = self.init_cart().await?;
        if let Some(token) = &session.token {
            debug!("shop session token: {}", token);
        }

        let mut price = 0.0;
        let mut cart_id: Option<String> = None;

        for (key, part) in &cart.parts {
            match part.vendor.as_deref() {
                Some(v) if v == self.vendor_tag => {}
                other => {
                    warn!("Unknown vendor for {}: {:?}", key, other);
                    continue;
                }
            }

            let Some(sku) = part.sku.as_deref() else {
                warn!("Line item {} has no SKU, skipping", key);
                continue;
            };

            let qty = part.packages().ok_or(AdapterError::InvalidLineItem {
                key: key.clone(),
                reason: "count_per_sku must be positive",
            })?;

            let product_id = self
                .resolve_product(sku)
                .await?
                .ok_or_else(|| AdapterError::PartNotFound { sku: sku.to_string() })?;

            let added = self.add_item(sku, &product_id, qty).await?;
            debug!("added {} x{} at {}", sku, qty, added.price);

            price += added.price;
            cart_id = Some(added.cart_id);
        }

        let cart_id = cart_id.ok_or(AdapterError::NoItemsProcessed)?;
        Ok(Quote::with_window(cart.qos.clone(), price, cart_id, now))
    }

    async fn order(&self, _cart: &PartsCart) -> Result<()> {
        Err(AdapterError::NotImplemented("order"))
    }
}
