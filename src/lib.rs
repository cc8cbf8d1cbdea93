//! # mail-api-route
//!
//! Typed request descriptors for a mail client's HTTP API, plus the shared
//! dispatcher that executes them.
//!
//! ## Overview
//!
//! Every API endpoint is described by a small, immutable value that implements
//! [`route::HasRequestMetadata`] (path, verb, version, headers, auth and retry
//! flags) and [`route::HasParameters`] (body/query payload). Both traits supply
//! defaults, so a concrete endpoint only overrides what differs. The
//! [`transport::HttpTransport`] dispatcher turns any such value into an HTTP call
//! the same way every time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mail_api_route::route::{HasParameters, HasRequestMetadata};
//! use mail_api_route::{HttpTransport, TransportConfig};
//!
//! struct GetUser;
//!
//! impl HasParameters for GetUser {}
//!
//! impl HasRequestMetadata for GetUser {
//!     fn path(&self) -> String {
//!         "/core/v4/users".to_string()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> mail_api_route::Result<()> {
//!     let transport = HttpTransport::new(TransportConfig::new("https://mail.example.com/api"))?
//!         .with_credentials(std::sync::Arc::new(mail_api_route::auth::EnvCredentialProvider));
//!     let resp = transport.dispatch(&GetUser).await?;
//!     let user: serde_json::Value = resp.json()?;
//!     println!("{user}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`route`] | Descriptor contract, HTTP verbs, plain-value descriptor |
//! | [`auth`] | Credential references and providers |
//! | [`transport`] | Dispatcher, configuration, request preparation |
//! | [`policy`] | Retry policy |
//! | [`error_code`] | Classification of remote failures |

pub mod auth;
pub mod error_code;
pub mod policy;
pub mod route;
pub mod telemetry;
pub mod transport;

pub use auth::{AuthCredential, CredentialProvider};
pub use policy::RetryPolicy;
pub use route::{HasParameters, HasRequestMetadata, HttpMethod, Request, RequestDescriptor};
pub use transport::{DispatchResponse, HttpTransport, TransportConfig};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
