//! # bshengine - a typed client for the BshEngine API
//!
//! Every call goes through one request pipeline: the auth header is
//! resolved, pre-request interceptors shape the outgoing request, the
//! injected transport performs the call, and the decoded response envelope
//! runs through post-response or error interceptors before it is handed to a
//! callback or returned.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bshengine::{auth::StaticAuth, transport::ReqwestTransport};
//! use bshengine::{CallOptions, Client, Envelope, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bshengine::Error> {
//!     let client = Client::builder()
//!         .host("https://api.example.com")
//!         .transport(ReqwestTransport::new()?)
//!         .auth(StaticAuth::jwt("token"))
//!         .build()?;
//!
//!     // Returned: Ok(Some(envelope))
//!     let envelope = client
//!         .get::<serde_json::Value>("/api/tenants/count", RequestOptions::new(), CallOptions::new())
//!         .await?;
//!     println!("{:?}", envelope);
//!
//!     // Handled by a callback: Ok(None)
//!     client
//!         .get::<serde_json::Value>(
//!             "/api/tenants/count",
//!             RequestOptions::new(),
//!             CallOptions::new().on_success(|envelope: Envelope| println!("{}", envelope.status)),
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! A non-2xx status becomes [`Error::Http`], carrying the status, the
//! request path and the decoded error envelope:
//!
//! ```no_run
//! use bshengine::{CallOptions, Client, Error, RequestOptions};
//!
//! # async fn example(client: Client) {
//! match client
//!     .get::<serde_json::Value>("/api/tenants/missing", RequestOptions::new(), CallOptions::new())
//!     .await
//! {
//!     Ok(envelope) => println!("Success: {:?}", envelope),
//!     Err(Error::Http { status, endpoint, response }) => {
//!         eprintln!("HTTP error {} on {}", status, endpoint);
//!         if let Some(response) = response {
//!             eprintln!("  {}", response.error);
//!         }
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # }
//! ```

pub mod auth;
mod client;
pub mod config;
mod dispatch;
mod engine;
mod error;
pub mod interceptor;
pub mod metadata;
mod response;
pub mod services;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use dispatch::{CallOptions, Outcome};
pub use engine::BshEngine;
pub use error::{Error, Result};
pub use metadata::{Bypass, RequestDescriptor, RequestOptions};
pub use response::{is_ok, Envelope, Meta, Pagination, Validation};
