/// CDN image downloads
///
/// Every image reference is fetched once. The bytes are handed to iced as
/// an image handle; failures are only shown as a broken-image tile.

use iced::widget::image::Handle;

use crate::error::FetchError;

/// Download one image and wrap it in a display handle
///
/// The error is flattened to a string so it can travel inside a `Message`.
pub async fn load_image(client: reqwest::Client, url: String) -> Result<Handle, String> {
    fetch_image(&client, &url).await.map_err(|e| e.to_string())
}

async fn fetch_image(client: &reqwest::Client, url: &str) -> Result<Handle, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let body = response.bytes().await?;
    if body.is_empty() {
        return Err(FetchError::Empty);
    }

    Ok(Handle::from_bytes(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_image_is_an_error() {
        let client = reqwest::Client::new();
        let result = load_image(client, "http://127.0.0.1:9/1.jpg".to_string()).await;
        assert!(result.is_err());
    }
}
