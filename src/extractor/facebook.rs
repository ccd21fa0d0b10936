//! Facebook exposes no public API, so this scrapes the rendered page and
//! pulls JSON-string encoded fields out of the embedded bootstrap data.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{PlatformExtractor, Upstream, capture, host_contains};
use crate::error::ExtractError;
use crate::model::{MediaMeta, MediaResult, MediaSource, MediaType, Platform};

static HD_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""browser_native_hd_url":"([^"]+)""#).expect("valid facebook hd regex")
});

static SD_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""browser_native_sd_url":"([^"]+)""#).expect("valid facebook sd regex")
});

static THUMBNAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""preferred_thumbnail":\{"image":\{"uri":"([^"]+)""#)
        .expect("valid facebook thumbnail regex")
});

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""name":"([^"]+)""#).expect("valid facebook title regex"));

/// Decode a captured JSON string body (`\/`, `%3A`, ...) into plain text.
fn unescape_json_string(raw: &str) -> Result<String, ExtractError> {
    Ok(serde_json::from_str(&format!("\"{raw}\""))?)
}

pub struct FacebookExtractor;

impl FacebookExtractor {
    fn build_result(html: &str) -> Result<MediaResult, ExtractError> {
        let raw_video_url = capture(&HD_URL_REGEX, html)
            .or_else(|| capture(&SD_URL_REGEX, html))
            .ok_or_else(|| ExtractError::MediaNotFound("no Facebook video URL in page".into()))?;
        let video_url = unescape_json_string(raw_video_url)?;

        // Thumbnail and title are optional; a bad escape there only drops the field.
        let thumbnail = capture(&THUMBNAIL_REGEX, html)
            .and_then(|raw| unescape_json_string(raw).ok())
            .unwrap_or_default();

        let title = capture(&TITLE_REGEX, html)
            .and_then(|raw| unescape_json_string(raw).ok())
            .unwrap_or_else(|| "Facebook Video".to_string());

        Ok(MediaResult {
            title,
            media_type: MediaType::Video,
            sources: vec![MediaSource::direct("HD", video_url)],
            thumbnail,
            meta: MediaMeta::new(Platform::Facebook),
        })
    }
}

#[async_trait]
impl PlatformExtractor for FacebookExtractor {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn identify(&self, host: &str) -> bool {
        host_contains(host, &["facebook.com", "fb.watch"])
    }

    async fn extract(
        &self,
        url: &str,
        upstream: &dyn Upstream,
    ) -> Result<MediaResult, ExtractError> {
        let html = upstream.get_text(url).await?;
        Self::build_result(&html)
    }
}
