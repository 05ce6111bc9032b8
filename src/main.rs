//! gobilda-quoter - goBILDA storefront price-quoting adapter for partcad
//!
//! One subcommand per aggregator operation; quote/order read the request
//! envelope JSON from a file or stdin and print the result JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gobilda_quoter::adapter::{dispatch, GobildaAdapter, Operation};
use gobilda_quoter::config::Config;
use gobilda_quoter::gobilda::client::GobildaClient;
use gobilda_quoter::gobilda::models::QuoteRequest;
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gobilda-quoter",
    version,
    about = "goBILDA storefront price-quoting adapter",
    long_about = "Resolves part SKUs against the goBILDA storefront, fills a server-side \
                  shopping cart, and reports a total price with an estimated fulfillment window."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Storefront base URL override
    #[arg(long, global = true, env = "GOBILDA_BASE_URL")]
    base_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "GOBILDA_PROXY")]
    proxy: Option<String>,

    /// Disable the response cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Client version reported in the User-Agent when no request envelope
    /// supplies one
    #[arg(long, global = true, default_value = env!("CARGO_PKG_VERSION"))]
    client_version: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query adapter capabilities
    Caps,

    /// Check whether a vendor is serviced by this adapter
    Avail {
        /// Vendor tag to check
        #[arg(long)]
        vendor: Option<String>,

        /// SKU to check (accepted, not validated against inventory)
        #[arg(long)]
        sku: Option<String>,
    },

    /// Produce a price quote for a parts cart
    Quote {
        /// Path to the request envelope JSON ("-" for stdin)
        #[arg(default_value = "-")]
        request: String,
    },

    /// Place an order for a parts cart
    Order {
        /// Path to the request envelope JSON ("-" for stdin)
        #[arg(default_value = "-")]
        request: String,
    },
}

fn read_request(path: &str) -> Result<QuoteRequest> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path))?
    };

    serde_json::from_str(&raw).context("Failed to parse request envelope")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries only the result JSON.
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if cli.no_cache {
        config.cache_enabled = false;
    }

    let (operation, request) = match cli.command {
        Commands::Caps => (
            Operation::Capabilities,
            QuoteRequest {
                vendor: None,
                sku: None,
                partcad_version: cli.client_version.clone(),
                cart: None,
            },
        ),
        Commands::Avail { vendor, sku } => (
            Operation::Availability,
            QuoteRequest { vendor, sku, partcad_version: cli.client_version.clone(), cart: None },
        ),
        Commands::Quote { request } => (Operation::Quote, read_request(&request)?),
        Commands::Order { request } => (Operation::Order, read_request(&request)?),
    };

    let client = GobildaClient::new(&config, &request.partcad_version)
        .context("Failed to create HTTP client")?;
    let adapter = GobildaAdapter::new(client);

    let outcome = dispatch(&adapter, operation, &request).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
