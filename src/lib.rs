//! # affise - a typed client for the Affise offers API
//!
//! `affise` builds authenticated requests against an Affise endpoint, encodes
//! filter structs into query strings, and decodes JSON responses into typed
//! values. Each call is exactly one request/response round trip.
//!
//! ## Quick Start
//!
//! ```no_run
//! use affise::{Client, Context, OfferListOpts};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), affise::Error> {
//!     let client = Client::builder()
//!         .endpoint("https://api-example.affise.com/")
//!         .api_key("secret")
//!         .build()?;
//!
//!     let ctx = Context::with_timeout(Duration::from_secs(10));
//!
//!     // GET /offer/1
//!     let offer = client.offers().get_by_id(&ctx, 1).await?;
//!     println!("Offer: {:?}", offer.data);
//!
//!     // GET /offers?os=iOS&q=summer
//!     let opts = OfferListOpts {
//!         q: Some("summer".into()),
//!         os: vec!["iOS".into()],
//!         ..Default::default()
//!     };
//!     let offers = client.offers().list(&ctx, &opts).await?;
//!     println!("Found {} offers in {:?}", offers.data.len(), offers.latency);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Builder configuration** - endpoint, API key, user agent and default timeout
//! - **Declarative query encoding** - filter structs map to query keys through serde
//! - **Strict status contract** - anything but `200 OK` is an [`Error::HttpError`]
//! - **Envelope on failure** - rejected responses keep method, URL, status and headers
//! - **Deadlines** - every call takes a [`Context`]; expiry aborts the request
//! - **Logging** - request dispatch and response arrival are traced with `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use affise::{Client, Context, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().endpoint("https://api-example.affise.com").build()?;
//! match client.offers().get_by_id(&Context::background(), 1).await {
//!     Ok(response) => println!("Offer: {:?}", response.data),
//!     Err(Error::HttpError { response }) => {
//!         eprintln!("Rejected with {}: {}", response.status, response.data);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod context;
mod error;
pub mod offers;
mod pagination;
pub mod presets;
pub mod query;
mod response;

pub use client::{Client, ClientBuilder, API_KEY_HEADER, USER_AGENT};
pub use context::Context;
pub use error::{Error, Result};
pub use offers::{Offer, OfferListOpts, OfferPage, OffersClient};
pub use pagination::Pagination;
pub use presets::{Preset, PresetListOpts, PresetsClient};
pub use response::Response;
