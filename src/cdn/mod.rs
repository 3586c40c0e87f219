/// CDN access module
///
/// This module handles:
/// - Building the shared HTTP client
/// - Downloading and parsing the remote count script (counts.rs)
/// - Downloading image bytes for display (image.rs)

pub mod counts;
pub mod image;

use std::time::Duration;

/// Upper bound for any single request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by every CDN request
pub fn client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("PicGallery/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
}
