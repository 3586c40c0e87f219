/// Remote count script loader
///
/// Downloads the count script once, waits a short grace delay (the script
/// populates its table asynchronously in a browser) and parses it. Any
/// failure is logged and reported as `None` so the caller can fall back.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::CountError;
use crate::state::counts::CountTable;

/// Delay between receiving the script and reading its table
pub const GRACE_DELAY: Duration = Duration::from_millis(100);

/// Default location of the count script
pub const DEFAULT_SCRIPT_URL: &str = "https://img.at13xe.top/random.js";

/// Fetch and parse the count table, or `None` on any failure
pub async fn load_count_table(
    client: reqwest::Client,
    url: String,
    timeout: Duration,
) -> Option<CountTable> {
    match fetch_count_table(&client, &url, timeout).await {
        Ok(table) => {
            debug!(entries = table.len(), %url, "count table loaded");
            Some(table)
        }
        Err(e) => {
            warn!(error = %e, %url, "count table unavailable, using fallback counts");
            None
        }
    }
}

async fn fetch_count_table(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<CountTable, CountError> {
    let script = tokio::time::timeout(timeout, fetch_script(client, url))
        .await
        .map_err(|_| CountError::Timeout(timeout.as_millis() as u64))??;

    tokio::time::sleep(GRACE_DELAY).await;

    table_from_script(&script)
}

/// An empty table answers nothing, so it counts as a failure
fn table_from_script(script: &str) -> Result<CountTable, CountError> {
    let table = CountTable::parse_script(script)?;
    if table.is_empty() {
        return Err(CountError::Malformed("empty count table".to_string()));
    }
    Ok(table)
}

async fn fetch_script(client: &reqwest::Client, url: &str) -> Result<String, CountError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(CountError::Status(response.status().as_u16()));
    }

    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_script_yields_none() {
        // Nothing listens on the discard port
        let client = reqwest::Client::new();
        let table = load_count_table(
            client,
            "http://127.0.0.1:9/random.js".to_string(),
            Duration::from_secs(2),
        )
        .await;
        assert!(table.is_none());
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accept the connection but never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let client = reqwest::Client::new();
        let url = format!("http://{}/random.js", addr);
        let result = fetch_count_table(&client, &url, Duration::from_millis(200)).await;

        assert!(matches!(result, Err(CountError::Timeout(200))));
        server.abort();
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let err = table_from_script("window.__picCounts = {};").unwrap_err();
        assert!(matches!(err, CountError::Malformed(_)));
    }
}
