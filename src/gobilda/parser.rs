//! Scraping for the three storefront responses: cart page HTML, bulk-order
//! search HTML, and the cart-add JSON body.

use crate::gobilda::models::CartAddition;
use crate::gobilda::selectors::{cart, search};
use scraper::Html;
use serde::Deserialize;
use tracing::trace;

/// Returns true when the cart page shows the empty-cart marker.
pub fn cart_is_empty(html: &str) -> bool {
    let document = Html::parse_document(html);
    document.select(&cart::EMPTY_BODY).next().is_some()
}

/// Scans the search results for an entry whose `data-sku` matches `sku`
/// exactly (case-sensitive) and returns its `data-pid`.
///
/// The scan visits every entry; should the storefront ever return duplicate
/// SKUs, the last match wins. Entries without the attributes are skipped.
pub fn find_product_id(html: &str, sku: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let mut product_id = None;

    for entry in document.select(&search::RESULT) {
        let Some(entry_sku) = entry.value().attr(search::SKU_ATTR) else {
            trace!("skipping result entry without {}", search::SKU_ATTR);
            continue;
        };
        if entry_sku == sku {
            product_id = entry.value().attr(search::PID_ATTR).map(String::from);
        }
    }

    product_id
}

#[derive(Deserialize)]
struct AddEnvelope {
    data: AddData,
}

#[derive(Deserialize)]
struct AddData {
    product_value: f64,
    cart_id: String,
}

/// Decodes the cart-add JSON body. Strict: a body that does not carry the
/// nested price and cart id is an error, never a default.
pub fn parse_cart_addition(body: &str) -> Result<CartAddition, serde_json::Error> {
    let envelope: AddEnvelope = serde_json::from_str(body)?;
    Ok(CartAddition { price: envelope.data.product_value, cart_id: envelope.data.cart_id })
}
