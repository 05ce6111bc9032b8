//! Error taxonomy for the adapter operations.

use thiserror::Error;

/// Errors surfaced to the aggregator. Anything not listed here (cart-page
/// parse trouble, vendor-mismatch line items) is logged and recovered from
/// instead of raised.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Operation the store adapter family does not offer (capability query).
    #[error("operation not supported by store adapters: {0}")]
    Unsupported(&'static str),

    /// Operation known but not built yet (ordering).
    #[error("operation not implemented: {0}")]
    NotImplemented(&'static str),

    /// Dispatch received an operation name outside the adapter contract.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Request envelope is missing a field the operation needs.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    /// Search failed outright or returned no entry for the SKU.
    #[error("part not found: {sku}")]
    PartNotFound { sku: String },

    /// The cart mutation endpoint rejected the addition.
    #[error("failed to add item to cart: {sku}: {product_id} (status {status})")]
    AddToCart { sku: String, product_id: String, status: u16 },

    /// The cart mutation returned 200 but the body did not decode. Never
    /// swallowed: a failed mutation must not pass as success.
    #[error("malformed cart-add response")]
    MalformedAddResponse(#[source] serde_json::Error),

    /// A line item violates an input invariant (zero package size).
    #[error("invalid line item {key}: {reason}")]
    InvalidLineItem { key: String, reason: &'static str },

    /// The quote loop finished without a single successful addition, so
    /// there is no cart id to report.
    #[error("no line items were added to the cart")]
    NoItemsProcessed,

    /// Transport-level failure talking to the storefront.
    #[error("storefront request failed")]
    Http(#[from] wreq::Error),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
