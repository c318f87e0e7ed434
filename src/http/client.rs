use std::time::Duration;

use reqwest::Client;

use crate::error::AppResult;

pub const DEFAULT_USER_AGENT: &str = concat!("mealbench/", env!("CARGO_PKG_VERSION"));

/// Builds the shared client used by every virtual user. Connection pooling
/// and keep-alive are left at reqwest defaults, so concurrent users reuse
/// sockets instead of handshaking per request.
///
/// # Errors
///
/// Returns an error if the underlying TLS or connector setup fails.
pub fn build_client(request_timeout: Duration, connect_timeout: Duration) -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .build()?;
    Ok(client)
}
