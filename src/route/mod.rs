//! Request descriptor contract.
//!
//! A descriptor describes one outbound API call without performing it. Concrete
//! endpoints implement the two capability traits below, overriding only what
//! differs from the defaults, and hand the value to a dispatcher such as
//! [`crate::transport::HttpTransport`].
//!
//! ```rust
//! use mail_api_route::route::{HasParameters, HasRequestMetadata, HttpMethod, Parameters};
//! use serde_json::json;
//!
//! struct CreateLabel {
//!     name: String,
//! }
//!
//! impl HasParameters for CreateLabel {
//!     fn parameters(&self) -> Option<Parameters> {
//!         json!({ "Name": self.name }).as_object().cloned()
//!     }
//! }
//!
//! impl HasRequestMetadata for CreateLabel {
//!     fn path(&self) -> String {
//!         "/core/v4/labels".to_string()
//!     }
//!
//!     fn method(&self) -> HttpMethod {
//!         HttpMethod::Post
//!     }
//! }
//!
//! let req = CreateLabel { name: "Receipts".into() };
//! assert_eq!(req.version(), 3);
//! assert!(req.is_authenticated());
//! ```

mod descriptor;
mod method;

pub use descriptor::RequestDescriptor;
pub use method::HttpMethod;

use crate::auth::AuthCredential;
use std::collections::HashMap;

/// Body/query payload of a request.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Per-request headers, merged over the transport defaults at dispatch time.
pub type Headers = HashMap<String, serde_json::Value>;

/// API version stamped on requests that do not override it.
pub const DEFAULT_API_VERSION: u32 = 3;

/// Payload-only capability.
pub trait HasParameters {
    /// `None` means the request carries no payload.
    fn parameters(&self) -> Option<Parameters> {
        None
    }
}

/// Everything a dispatcher needs besides the payload.
pub trait HasRequestMetadata {
    fn version(&self) -> u32 {
        DEFAULT_API_VERSION
    }

    /// Endpoint path relative to the transport's base URL.
    fn path(&self) -> String;

    fn header(&self) -> Headers {
        Headers::new()
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn is_authenticated(&self) -> bool {
        true
    }

    /// Credential to attach. When `None` on an authenticated request, the
    /// dispatcher resolves one from its credential provider or rejects the call.
    fn auth_credential(&self) -> Option<AuthCredential> {
        None
    }

    /// Whether the dispatcher may transparently resend after a transient failure.
    fn auto_retry(&self) -> bool {
        true
    }
}

/// A complete request: metadata plus payload.
pub trait Request: HasParameters + HasRequestMetadata {}

impl<T: HasParameters + HasRequestMetadata + ?Sized> Request for T {}
