use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::upstream::get_json;
use super::{PlatformExtractor, Upstream, capture, host_contains, require};
use crate::error::ExtractError;
use crate::model::{MediaMeta, MediaResult, MediaSource, MediaType, Platform};

const SYNDICATION_URL: &str = "https://cdn.syndication.twimg.com/tweet-result";

static STATUS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status(?:es)?/(\d+)").expect("valid twitter status regex"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TweetResult {
    #[serde(default)]
    media_details: Vec<MediaDetail>,
    user: Option<User>,
    #[serde(rename = "conversation_count")]
    conversation_count: Option<u64>,
    #[serde(rename = "favorite_count")]
    favorite_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct User {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaDetail {
    #[serde(rename = "type")]
    kind: Option<String>,
    media_url_https: Option<String>,
    video_info: Option<VideoInfo>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    variants: Vec<Variant>,
}

#[derive(Debug, Deserialize)]
struct Variant {
    url: Option<String>,
}

pub struct TwitterExtractor;

impl TwitterExtractor {
    fn build_result(data: TweetResult) -> Result<MediaResult, ExtractError> {
        let TweetResult {
            media_details,
            user,
            conversation_count,
            favorite_count,
        } = data;

        // Only the first attachment is offered.
        let media = require(media_details.into_iter().next(), "mediaDetails")?;
        let thumbnail = require(media.media_url_https, "media_url_https")?;

        let kind = require(media.kind, "mediaDetails.type")?;

        let (media_type, media_url) = match kind.as_str() {
            "video" | "animated_gif" => {
                let variant = require(
                    media
                        .video_info
                        .and_then(|info| info.variants.into_iter().next()),
                    "video_info.variants",
                )?;
                (
                    MediaType::Video,
                    require(variant.url, "video_info.variants.url")?,
                )
            }
            _ => (MediaType::Image, thumbnail.clone()),
        };

        let mut meta = MediaMeta::new(Platform::Twitter);
        meta.retweets = conversation_count;
        meta.likes = favorite_count;

        Ok(MediaResult {
            title: user
                .and_then(|user| user.name)
                .unwrap_or_else(|| "Twitter Post".to_string()),
            media_type,
            sources: vec![MediaSource::direct("HD", media_url)],
            thumbnail,
            meta,
        })
    }
}

#[async_trait]
impl PlatformExtractor for TwitterExtractor {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    fn identify(&self, host: &str) -> bool {
        host_contains(host, &["twitter.com", "x.com"])
    }

    async fn extract(
        &self,
        url: &str,
        upstream: &dyn Upstream,
    ) -> Result<MediaResult, ExtractError> {
        let status_id = capture(&STATUS_REGEX, url)
            .ok_or_else(|| ExtractError::MalformedUrl(format!("no status id in {url}")))?;

        let api_url = format!("{SYNDICATION_URL}?id={status_id}&token=x");
        let data: TweetResult = get_json(upstream, &api_url).await?;
        Self::build_result(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::CannedUpstream;

    const API: &str = "https://cdn.syndication.twimg.com/tweet-result?id=1790000000000000001&token=x";
    const TWEET: &str = "https://x.com/someone/status/1790000000000000001?s=20";

    #[tokio::test]
    async fn video_uses_first_variant() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{
                "user":{"name":"Some One"},
                "favorite_count":2500000,
                "conversation_count":42,
                "mediaDetails":[
                    {"type":"video","media_url_https":"https://pbs.twimg.com/t.jpg",
                     "video_info":{"variants":[
                        {"url":"https://video.twimg.com/first.m3u8"},
                        {"url":"https://video.twimg.com/second.mp4"}
                     ]}},
                    {"type":"photo","media_url_https":"https://pbs.twimg.com/other.jpg"}
                ]
            }"#,
        );

        let result = TwitterExtractor.extract(TWEET, &upstream).await.unwrap();

        assert_eq!(result.title, "Some One");
        assert_eq!(result.media_type, MediaType::Video);
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].url, "https://video.twimg.com/first.m3u8");
        assert_eq!(result.thumbnail, "https://pbs.twimg.com/t.jpg");
        assert_eq!(result.meta.likes, Some(2_500_000));
        assert_eq!(result.meta.retweets, Some(42));
    }

    #[tokio::test]
    async fn photo_is_an_image() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"user":{"name":"n"},"mediaDetails":[{"type":"photo","media_url_https":"https://pbs.twimg.com/p.jpg"}]}"#,
        );

        let result = TwitterExtractor
            .extract("https://twitter.com/n/status/1790000000000000001", &upstream)
            .await
            .unwrap();
        assert_eq!(result.media_type, MediaType::Image);
        assert_eq!(result.sources[0].download, "https://pbs.twimg.com/p.jpg");
    }

    #[tokio::test]
    async fn text_only_tweet_is_media_not_found() {
        let upstream =
            CannedUpstream::default().with(API, r#"{"user":{"name":"n"},"text":"hello"}"#);

        let error = TwitterExtractor.extract(TWEET, &upstream).await.unwrap_err();
        assert!(matches!(error, ExtractError::MediaNotFound(ref field) if field.contains("mediaDetails")));
    }

    #[tokio::test]
    async fn video_without_variants_is_media_not_found() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"mediaDetails":[{"type":"video","media_url_https":"https://pbs.twimg.com/t.jpg","video_info":{"variants":[]}}]}"#,
        );

        let error = TwitterExtractor.extract(TWEET, &upstream).await.unwrap_err();
        assert!(matches!(error, ExtractError::MediaNotFound(_)));
    }

    #[tokio::test]
    async fn animated_gif_uses_first_variant() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"mediaDetails":[{"type":"animated_gif","media_url_https":"https://pbs.twimg.com/g.jpg",
                "video_info":{"variants":[{"url":"https://video.twimg.com/g1.mp4"},{"url":"https://video.twimg.com/g2.mp4"}]}}]}"#,
        );

        let result = TwitterExtractor.extract(TWEET, &upstream).await.unwrap();
        assert_eq!(result.media_type, MediaType::Video);
        assert_eq!(result.sources[0].url, "https://video.twimg.com/g1.mp4");
        assert_eq!(result.thumbnail, "https://pbs.twimg.com/g.jpg");
    }

    #[tokio::test]
    async fn media_without_type_is_media_not_found() {
        let upstream = CannedUpstream::default()
            .with(API, r#"{"mediaDetails":[{"media_url_https":"https://p/t.jpg"}]}"#);

        let error = TwitterExtractor.extract(TWEET, &upstream).await.unwrap_err();
        assert!(matches!(error, ExtractError::MediaNotFound(ref field) if field.contains("mediaDetails.type")));
    }

    #[tokio::test]
    async fn variant_without_url_is_media_not_found() {
        let upstream = CannedUpstream::default().with(
            API,
            r#"{"mediaDetails":[{"type":"video","media_url_https":"https://p/t.jpg","video_info":{"variants":[{"bitrate":832000}]}}]}"#,
        );

        let error = TwitterExtractor.extract(TWEET, &upstream).await.unwrap_err();
        assert!(matches!(error, ExtractError::MediaNotFound(ref field) if field.contains("variants.url")));
    }

    #[tokio::test]
    async fn profile_url_is_malformed() {
        let error = TwitterExtractor
            .extract("https://x.com/someone", &CannedUpstream::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ExtractError::MalformedUrl(_)));
    }
}
