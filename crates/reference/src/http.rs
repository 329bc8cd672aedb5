//! Snapshot download over HTTP/HTTPS

use crate::error::ReferenceError;

/// Fetch the whole snapshot body as text.
pub async fn download(url: &str) -> Result<String, ReferenceError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| ReferenceError::Http(format!("Failed to fetch URL {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReferenceError::Http(format!(
            "HTTP request failed with status {status} for URL: {url}"
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ReferenceError::Http(format!("Failed to read response body from {url}: {e}")))?;

    tracing::debug!("Fetched {} bytes from: {}", body.len(), url);
    Ok(body)
}
