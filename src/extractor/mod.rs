mod facebook;
mod instagram;
mod tiktok;
mod twitter;
mod upstream;
mod youtube;

pub use facebook::FacebookExtractor;
pub use instagram::InstagramExtractor;
pub use tiktok::TikTokExtractor;
pub use twitter::TwitterExtractor;
pub use upstream::{DEFAULT_USER_AGENT, HttpUpstream, Upstream};
pub use youtube::{YouTubeExtractor, extract_video_id};

#[cfg(test)]
pub(crate) use upstream::fake::CannedUpstream;

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};
use url::Url;

use crate::error::ExtractError;
use crate::model::{MediaResult, Platform};

/// One platform's way of turning a post URL into a [`MediaResult`].
#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether this extractor claims the (lowercased) hostname.
    fn identify(&self, host: &str) -> bool;

    async fn extract(
        &self,
        url: &str,
        upstream: &dyn Upstream,
    ) -> Result<MediaResult, ExtractError>;
}

/// Picks exactly one extractor per URL, in priority order.
pub struct Extractor {
    extractors: Vec<Box<dyn PlatformExtractor>>,
    upstream: Arc<dyn Upstream>,
}

impl Extractor {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        let extractors: Vec<Box<dyn PlatformExtractor>> = vec![
            Box::new(YouTubeExtractor),
            Box::new(InstagramExtractor),
            Box::new(TwitterExtractor),
            Box::new(FacebookExtractor),
            Box::new(TikTokExtractor),
        ];

        Self::with_extractors(extractors, upstream)
    }

    pub fn with_extractors(
        extractors: Vec<Box<dyn PlatformExtractor>>,
        upstream: Arc<dyn Upstream>,
    ) -> Self {
        Self {
            extractors,
            upstream,
        }
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.extractors.iter().map(|item| item.platform()).collect()
    }

    pub fn classify(&self, url: &str) -> Result<&dyn PlatformExtractor, ExtractError> {
        let parsed = Url::parse(url.trim())
            .map_err(|error| ExtractError::MalformedUrl(format!("{url} ({error})")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ExtractError::MalformedUrl(url.to_string()));
        }

        let host = parsed
            .host_str()
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ExtractError::MalformedUrl(url.to_string()))?;

        self.extractors
            .iter()
            .find(|item| item.identify(&host))
            .map(|item| &**item)
            .ok_or(ExtractError::UnsupportedPlatform(host))
    }

    pub async fn extract(&self, url: &str) -> Result<MediaResult, ExtractError> {
        let url = url.trim();
        let extractor = self.classify(url)?;
        let platform = extractor.platform();
        info!("Dispatching {url:?} to {platform}");

        let result = extractor
            .extract(url, self.upstream.as_ref())
            .await
            .inspect_err(|error| warn!("{platform} extraction failed for {url:?}: {error}"))?;

        if result.sources.is_empty() {
            return Err(ExtractError::MediaNotFound(format!(
                "{platform} returned no playable media"
            )));
        }

        Ok(result)
    }
}

pub(crate) fn capture<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|found| found.as_str())
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, ExtractError> {
    value.ok_or_else(|| ExtractError::MediaNotFound(format!("upstream response has no {field}")))
}

pub(crate) fn host_contains(host: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| host.contains(needle))
}
