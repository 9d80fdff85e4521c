use reqwest::Client;

use crate::error::{AppError, Result};
use crate::ports::CoverFetcher;

pub struct HttpCoverFetcher {
    http_client: Client,
}

impl HttpCoverFetcher {
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("listenbrainz-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl CoverFetcher for HttpCoverFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Download(format!(
                "cover {} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
