//! Catalogue feed client for the recycling widget
//!
//! The widget core never performs I/O; this crate is the collaborator that
//! fetches the catalogue and hands the outcome to
//! [`WidgetState::apply_fetch`](recycle_catalog::WidgetState::apply_fetch).
//!
//! # Features
//!
//! - **Environment-based configuration**: feed URL, timeout and attempts from env vars
//! - **Explicit timeout**: every attempt is bounded end to end
//! - **Retry with exponential backoff**: for connection failures, timeouts and 5xx/429
//! - **Request correlation**: each fetch carries a unique `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use recycle_catalog::{WidgetConfig, WidgetState};
//! use recycle_feed::CatalogueClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogueClient::new()?;
//!     let state = client.load(WidgetState::new(WidgetConfig::default())).await;
//!
//!     for letter in state.view().letters {
//!         println!("{letter}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;

pub use client::CatalogueClient;
pub use config::{FeedConfig, RetryConfig};
pub use error::{FeedError, FeedResult};
