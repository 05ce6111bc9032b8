//! CSS selectors for goBILDA storefront scraping.
//!
//! Update this file when the storefront markup changes.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the cart page.
pub mod cart {
    use super::*;

    /// Empty-cart marker inside the cart preview.
    ///
    /// ```html
    /// <div class="previewCart" data-cart-total-quantity="0">
    ///   <div class="previewCart-emptyBody">Your cart is empty</div>
    /// </div>
    /// ```
    pub static EMPTY_BODY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.previewCart-emptyBody").unwrap());
}

/// Selectors for the bulk-order search fragment.
pub mod search {
    use super::*;

    /// One search result entry.
    ///
    /// ```html
    /// <div class="results">
    ///   <div class="result" data-sku="4103-0032-0043" data-pid="638" ...>
    /// </div>
    /// ```
    pub static RESULT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.results div.result").unwrap());

    /// SKU attribute on a result entry.
    pub static SKU_ATTR: &str = "data-sku";

    /// Product-id attribute on a result entry.
    pub static PID_ATTR: &str = "data-pid";
}
