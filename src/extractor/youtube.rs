use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::upstream::get_json;
use super::{PlatformExtractor, Upstream, capture, host_contains};
use crate::error::ExtractError;
use crate::model::{MediaMeta, MediaResult, MediaSource, MediaType, Platform};

const METADATA_URL: &str = "https://yt.lemnoslife.com/noKey/videos?part=contentDetails&id=";
const DOWNLOAD_URL: &str = "https://youtubepi.herokuapp.com/dl?id=";

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("valid youtube id regex")
});

/// Pull the 11-character video id out of any watch, short or embed URL.
pub fn extract_video_id(url: &str) -> Option<&str> {
    capture(&VIDEO_ID_REGEX, url)
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg")
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

pub struct YouTubeExtractor;

impl YouTubeExtractor {
    fn build_result(video_id: &str, data: VideosResponse) -> Result<MediaResult, ExtractError> {
        let item = data.items.into_iter().next().ok_or_else(|| {
            ExtractError::MediaNotFound(format!("YouTube video {video_id} not found"))
        })?;

        let mut meta = MediaMeta::new(Platform::YouTube);
        meta.duration = item.content_details.and_then(|details| details.duration);

        Ok(MediaResult {
            title: "YouTube Video".to_string(),
            media_type: MediaType::Video,
            sources: vec![MediaSource {
                quality: "HD".to_string(),
                url: format!("https://www.youtube.com/watch?v={video_id}"),
                download: format!("{DOWNLOAD_URL}{video_id}"),
                size: None,
            }],
            thumbnail: thumbnail_url(video_id),
            meta,
        })
    }
}

#[async_trait]
impl PlatformExtractor for YouTubeExtractor {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn identify(&self, host: &str) -> bool {
        host_contains(host, &["youtube.com", "youtu.be"])
    }

    async fn extract(
        &self,
        url: &str,
        upstream: &dyn Upstream,
    ) -> Result<MediaResult, ExtractError> {
        let video_id = extract_video_id(url).ok_or_else(|| {
            ExtractError::MalformedUrl(format!("no YouTube video id in {url}"))
        })?;

        let data: VideosResponse = get_json(upstream, &format!("{METADATA_URL}{video_id}")).await?;
        Self::build_result(video_id, data)
    }
}
