use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ExtractError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// The single outbound fetch an extraction is allowed to make.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, ExtractError>;
}

pub async fn get_json<T: DeserializeOwned>(
    upstream: &dyn Upstream,
    url: &str,
) -> Result<T, ExtractError> {
    let body = upstream.get_text(url).await?;
    Ok(serde_json::from_str(&body)?)
}

pub struct HttpUpstream {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpUpstream {
    pub fn new(user_agent: impl Into<String>) -> Result<Self, ExtractError> {
        // No timeout: the fetch waits as long as the transport allows.
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_text(&self, url: &str) -> Result<String, ExtractError> {
        debug!("Fetching upstream {url}");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream {url} answered with HTTP {status}");
        }

        Ok(response.text().await?)
    }
}
