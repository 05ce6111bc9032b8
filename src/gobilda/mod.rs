//! goBILDA-specific modules for HTTP client, scraping, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{GobildaClient, Storefront, SESSION_COOKIE};
pub use models::{
    Availability, CartAddition, CartSession, PartSpec, PartsCart, Quote, QuoteRequest,
    StoreResponse,
};
