//! Utility modules
//!
//! Streaming plumbing, cancellation, HTTP header building and small JSON/URL
//! helpers shared by the provider adapters.

pub mod cancel;
pub mod http_headers;
pub mod json;
pub mod streaming;
pub mod url;

pub use streaming::*;
pub use url::*;
