//! gobilda-quoter - goBILDA storefront price-quoting adapter for partcad
//!
//! Resolves part SKUs against the goBILDA storefront, fills a server-side
//! shopping cart, and aggregates a total price with an estimated
//! fulfillment window.

pub mod adapter;
pub mod cache;
pub mod config;
pub mod error;
pub mod gobilda;

pub use adapter::{dispatch, GobildaAdapter, Operation, Outcome, VendorAdapter, VENDOR_TAG};
pub use config::Config;
pub use error::AdapterError;
pub use gobilda::models::{Availability, PartSpec, PartsCart, Quote, QuoteRequest};
pub use gobilda::{GobildaClient, Storefront};
