use std::time::Duration;

use isahc::{
    config::{Configurable as _, RedirectPolicy},
    HttpClient,
};
use rand::Rng;

pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; ao3tagbot/",
    env!("CARGO_PKG_VERSION"),
    "; Telegram tag bot)"
);

/// Builds a pooled client that follows redirects and gives up after `timeout`.
///
/// Clones share the same connection pool, so one client is enough for the
/// whole process.
pub fn http_client(timeout: Duration) -> Result<HttpClient, isahc::Error> {
    HttpClient::builder()
        .default_header("User-Agent", USER_AGENT)
        .redirect_policy(RedirectPolicy::Follow)
        .timeout(timeout)
        .build()
}

/// Waits between 3 and 8 seconds.
#[tracing::instrument]
pub async fn sleep() {
    let length = rand::thread_rng().gen_range(3..8);

    tracing::info!("sleeping for {} seconds", length);

    tokio::time::sleep(Duration::from_secs(length)).await;
}
