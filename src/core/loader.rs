use crate::domain::model::PayloadBuffer;
use crate::utils::error::{FakeProcessError, Result};
use reqwest::Client;

/// 一次性下載工作負載
pub struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// 把整個 response body 讀進記憶體，不重試
    pub async fn fetch(&self, url: &str) -> Result<PayloadBuffer> {
        let fetch_error = |source: reqwest::Error| FakeProcessError::FetchError {
            url: url.to_string(),
            source,
        };

        tracing::info!("⬇️ Beginning download of {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;

        tracing::debug!("Payload response status: {}", response.status());

        let body = response.bytes().await.map_err(fetch_error)?;

        tracing::info!("✅ Finished download of {} ({} bytes)", url, body.len());

        Ok(PayloadBuffer::new(body.to_vec()))
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}
