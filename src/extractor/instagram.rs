use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::upstream::get_json;
use super::{PlatformExtractor, Upstream, capture, host_contains, require};
use crate::error::ExtractError;
use crate::model::{MediaMeta, MediaResult, MediaSource, MediaType, Platform};

static SHORTCODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:p|reel|tv)/([A-Za-z0-9_-]+)").expect("valid instagram shortcode regex")
});

#[derive(Debug, Deserialize)]
struct PostResponse {
    graphql: Option<Graphql>,
}

#[derive(Debug, Deserialize)]
struct Graphql {
    shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Debug, Deserialize)]
struct ShortcodeMedia {
    #[serde(default)]
    is_video: bool,
    video_url: Option<String>,
    display_url: Option<String>,
    owner: Option<Owner>,
    edge_media_preview_like: Option<Counter>,
    edge_media_to_comment: Option<Counter>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Counter {
    count: Option<u64>,
}

pub struct InstagramExtractor;

impl InstagramExtractor {
    fn build_result(data: PostResponse) -> Result<MediaResult, ExtractError> {
        let media = require(
            data.graphql.and_then(|graphql| graphql.shortcode_media),
            "graphql.shortcode_media",
        )?;
        let display_url = require(media.display_url, "display_url")?;

        let (media_type, media_url) = if media.is_video {
            (MediaType::Video, require(media.video_url, "video_url")?)
        } else {
            (MediaType::Image, display_url.clone())
        };

        let mut meta = MediaMeta::new(Platform::Instagram);
        meta.likes = media.edge_media_preview_like.and_then(|edge| edge.count);
        meta.comments = media.edge_media_to_comment.and_then(|edge| edge.count);

        Ok(MediaResult {
            title: media
                .owner
                .and_then(|owner| owner.username)
                .unwrap_or_else(|| "Instagram Post".to_string()),
            media_type,
            sources: vec![MediaSource::direct("Original", media_url)],
            thumbnail: display_url,
            meta,
        })
    }
}

#[async_trait]
impl PlatformExtractor for InstagramExtractor {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn identify(&self, host: &str) -> bool {
        host_contains(host, &["instagram.com"])
    }

    async fn extract(
        &self,
        url: &str,
        upstream: &dyn Upstream,
    ) -> Result<MediaResult, ExtractError> {
        let shortcode = capture(&SHORTCODE_REGEX, url).ok_or_else(|| {
            ExtractError::MalformedUrl(format!("no Instagram shortcode in {url}"))
        })?;

        let api_url = format!("https://www.instagram.com/p/{shortcode}/?__a=1");
        let data: PostResponse = get_json(upstream, &api_url).await?;
        Self::build_result(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::CannedUpstream;

    const API: &str = "https://www.instagram.com/p/Cx1_ab-Z/?__a=1";

    #[tokio::test]
    async fn video_post_uses_video_url_and_counters() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"graphql":{"shortcode_media":{
                "is_video":true,
                "video_url":"https://cdn.ig/v.mp4",
                "display_url":"https://cdn.ig/d.jpg",
                "owner":{"username":"someone"},
                "edge_media_preview_like":{"count":1500},
                "edge_media_to_comment":{"count":7}
            }}}"#,
        );

        let result = InstagramExtractor
            .extract("https://www.instagram.com/p/Cx1_ab-Z/?igsh=1", &upstream)
            .await
            .unwrap();

        assert_eq!(result.title, "someone");
        assert_eq!(result.media_type, MediaType::Video);
        assert_eq!(result.sources[0].url, "https://cdn.ig/v.mp4");
        assert_eq!(result.thumbnail, "https://cdn.ig/d.jpg");
        assert_eq!(result.meta.likes, Some(1500));
        assert_eq!(result.meta.comments, Some(7));
    }

    #[tokio::test]
    async fn image_post_uses_display_url() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"graphql":{"shortcode_media":{"is_video":false,"display_url":"https://cdn.ig/d.jpg"}}}"#,
        );

        let result = InstagramExtractor
            .extract("https://www.instagram.com/reel/Cx1_ab-Z/", &upstream)
            .await
            .unwrap();

        assert_eq!(result.media_type, MediaType::Image);
        assert_eq!(result.sources[0].download, "https://cdn.ig/d.jpg");
        assert_eq!(result.title, "Instagram Post");
        assert_eq!(result.meta.likes, None);
    }

    #[tokio::test]
    async fn video_without_video_url_is_media_not_found() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"graphql":{"shortcode_media":{"is_video":true,"display_url":"https://cdn.ig/d.jpg"}}}"#,
        );

        let error = InstagramExtractor
            .extract("https://www.instagram.com/p/Cx1_ab-Z/", &upstream)
            .await
            .unwrap_err();
        assert!(matches!(error, ExtractError::MediaNotFound(ref field) if field.contains("video_url")));
    }

    #[tokio::test]
    async fn login_wall_is_media_not_found() {
        let upstream = CannedUpstream::default().with(API, r#"{"require_login":true}"#);

        let error = InstagramExtractor
            .extract("https://www.instagram.com/p/Cx1_ab-Z/", &upstream)
            .await
            .unwrap_err();
        assert!(matches!(error, ExtractError::MediaNotFound(_)));
    }

    #[tokio::test]
    async fn profile_url_is_malformed() {
        let error = InstagramExtractor
            .extract("https://www.instagram.com/someone/", &CannedUpstream::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ExtractError::MalformedUrl(_)));
    }
}
