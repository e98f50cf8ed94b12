//! Paddle command line tool
//!
//! Verifies webhook payloads and queries the Paddle vendor API.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::{ConfigLoader, Overrides};
use paddle_sdk::objects::transaction::TransactionEntity;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Paddle vendor API client and webhook verifier
#[derive(Parser, Debug)]
#[command(name = "paddle-cli")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./paddle.toml")]
    config: PathBuf,

    /// Override the vendor ID
    #[arg(long, env = "PADDLE_VENDOR_ID")]
    vendor_id: Option<String>,

    /// Override the vendor auth code
    #[arg(long, env = "PADDLE_AUTH_CODE", hide_env_values = true)]
    auth_code: Option<String>,

    /// Override the webhook public key (PEM file)
    #[arg(long)]
    public_key: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the signature of a webhook payload; exits 1 when rejected
    Verify {
        /// File holding the payload (JSON object, or form body with --form)
        payload: PathBuf,
        /// Treat the payload as an application/x-www-form-urlencoded body
        #[arg(long)]
        form: bool,
    },
    /// Print the bytes a webhook signature is computed over
    Canonicalize {
        payload: PathBuf,
        #[arg(long)]
        form: bool,
    },
    /// List products
    Products,
    /// List the coupons of a product
    Coupons { product_id: u64 },
    /// List subscription plans
    Plans {
        #[arg(long)]
        plan: Option<u64>,
    },
    /// List transactions of a user, subscription, order or checkout
    Transactions {
        entity: TransactionEntity,
        id: String,
    },
    /// Cancel a subscription
    CancelSubscription { subscription_id: u64 },
    /// Generate a custom pay link
    PayLink {
        #[arg(long)]
        product_id: Option<u64>,
        #[arg(long)]
        title: Option<String>,
        /// Price as CURRENCY:AMOUNT, repeatable
        #[arg(long = "price")]
        prices: Vec<String>,
        #[arg(long)]
        webhook_url: Option<String>,
        #[arg(long)]
        custom_message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::debug!("Starting paddle-cli v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let overrides = Overrides {
        vendor_id: args.vendor_id,
        auth_code: args.auth_code,
        public_key_file: args.public_key,
    };
    let config = ConfigLoader::new(&args.config, overrides)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;

    commands::run(args.command, config).await
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr so command output can be piped.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,paddle_sdk=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
