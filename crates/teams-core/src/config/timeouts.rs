//! Network timeouts
//!
//! The auth core and REST transport never set timeouts themselves; callers
//! apply these when building the `reqwest::Client` they inject.

use std::time::Duration;

/// Timeout for a single HTTP request (30 seconds)
pub const HTTP_REQUEST_SECS: u64 = 30;

/// Timeout for establishing a connection (10 seconds)
pub const HTTP_CONNECT_SECS: u64 = 10;

pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(HTTP_REQUEST_SECS);

pub const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(HTTP_CONNECT_SECS);

/// Apply the default timeouts to a client builder
pub fn with_default_timeouts(builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
    builder
        .timeout(HTTP_REQUEST_TIMEOUT)
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
}
