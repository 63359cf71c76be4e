//! Magento REST API client and per-session credential management.
//!
//! # Architecture
//!
//! - [`MagentoClient`] holds the transport, base URL and account credentials.
//!   It is cheap to clone and shared by every request.
//! - [`CommerceSession`] holds the mutable credentials of one logical user
//!   (customer token, admin token, active cart id). Every operation takes the
//!   caller's session explicitly; nothing is cached globally.
//! - [`HttpTransport`] is the only I/O seam. [`ReqwestTransport`] is the
//!   production implementation; tests script their own.
//!
//! # Call ordering
//!
//! ```text
//! add_item: customer token -> carts/mine -> carts/mine/items
//! search:   admin token -> V1/search (quick search) -> V1/products (by entity_id)
//! ```
//!
//! Prerequisite steps run only when their result is not already cached on
//! the session. A 401 from a bearer-authenticated call clears the affected
//! credentials so that the next turn authenticates again.
//!
//! # Example
//!
//! ```rust,ignore
//! use voicecart_skill::magento::{CommerceSession, MagentoClient};
//!
//! let client = MagentoClient::new(&config.magento)?;
//! let session = CommerceSession::new();
//!
//! let hits = client.search(&session, "blue mug").await?;
//! if let Some(hit) = hits.first() {
//!     let added = client.add_item(&session, &hit.sku, Quantity::ONE).await?;
//! }
//! ```

mod client;
mod queries;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::MagentoClient;
pub use session::{CommerceSession, SessionStatus};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

use core::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use types::ScalarBody;

/// Which account a bearer token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenRole {
    /// Customer account, used for cart operations.
    Customer,
    /// Integration admin account, used for catalog-wide search.
    Admin,
}

impl TokenRole {
    /// Path segment used by the token issue endpoint.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Errors that can occur when interacting with the Magento API.
#[derive(Debug, Error)]
pub enum MagentoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The transport failed without an underlying `reqwest` error.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Token issue failed or returned an unusable value.
    #[error("{role} authentication failed: {reason}")]
    AuthenticationFailed {
        /// Account that failed to authenticate.
        role: TokenRole,
        /// Human readable cause.
        reason: String,
    },

    /// A cached token was rejected; it has been cleared from the session.
    #[error("{role} token rejected by backend")]
    Unauthorized {
        /// Account whose token was rejected.
        role: TokenRole,
    },

    /// Backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// First part of the response body.
        body: String,
    },

    /// Backend answered with an empty value where an identifier was expected.
    #[error("Backend returned an empty {0}")]
    EmptyValue(&'static str),
}

impl MagentoError {
    /// Whether this error came from acquiring or using a bearer token.
    #[must_use]
    pub const fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. }
        )
    }
}

/// Read the bare JSON value Magento answers token and cart requests with.
///
/// The body must be a JSON string such as `"abc123"` or a number such as
/// `17`. Quotes are not part of the value and a token sent back with them
/// does not validate, so every `"` is removed and the result trimmed.
///
/// # Errors
///
/// Returns the parse error if the body is anything else (an HTML error
/// page, a JSON object).
pub fn sanitize_response(body: &str) -> Result<String, serde_json::Error> {
    let value = match serde_json::from_str::<ScalarBody>(body)? {
        ScalarBody::Text(text) => text,
        ScalarBody::Number(number) => number.to_string(),
    };
    Ok(value.replace('"', "").trim().to_string())
}

/// Truncate a response body for error messages and logs.
pub(crate) fn body_snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
