//! Dispatcher: executes request descriptors over HTTP.

pub mod config;
mod http;
pub mod prepare;
mod response;

pub use config::TransportConfig;
pub use http::HttpTransport;
pub use prepare::PreparedRequest;
pub use response::DispatchResponse;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Connection and timeout failures are worth a resend; everything else is not.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_timeout() || e.is_connect(),
            TransportError::Other(_) => false,
        }
    }
}
