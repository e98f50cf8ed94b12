//! Client library for the Paddle vendor API.
//!
//! * [`signature`] verifies inbound webhooks against the vendor public key.
//! * [`serialize`] implements the PHP `serialize()` encoding those
//!   signatures are computed over.
//! * [`client`] (feature `client`) wraps the vendor REST endpoints.
//!
//! ```ignore
//! use paddle_sdk::{PaddleClient, WebhookPayload};
//!
//! let client = PaddleClient::new("your-vendor-id", "your-auth-code")
//!     .with_public_key(include_str!("paddle_public_key.pem"));
//!
//! let products = client.get_products().await?;
//! let verified = client.verify_webhook_data(&WebhookPayload::from_form(&body));
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;
pub mod serialize;
pub mod signature;

#[cfg(feature = "client")]
pub use client::{BodyEncoding, ClientError, PaddleClient};
pub use config::ClientConfig;
pub use serialize::{PhpMap, PhpValue, UnsupportedValueError};
pub use signature::{SignatureError, WebhookPayload, WebhookVerifier};
