use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::upstream::get_json;
use super::{PlatformExtractor, Upstream, capture, host_contains, require};
use crate::error::ExtractError;
use crate::model::{MediaMeta, MediaResult, MediaSource, MediaType, Platform};

const FEED_URL: &str = "https://api.tiktokv.com/aweme/v1/feed/?aweme_id=";

static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"video/(\d+)").expect("valid tiktok video regex"));

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    aweme_list: Vec<Aweme>,
}

#[derive(Debug, Deserialize)]
struct Aweme {
    #[serde(default)]
    desc: String,
    video: Option<Video>,
    music: Option<Music>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct Video {
    play_addr: Option<UrlList>,
    cover: Option<UrlList>,
}

#[derive(Debug, Deserialize)]
struct Music {
    play_url: Option<UrlList>,
}

#[derive(Debug, Deserialize)]
struct UrlList {
    #[serde(default)]
    url_list: Vec<String>,
}

impl UrlList {
    fn first(list: Option<UrlList>) -> Option<String> {
        list.and_then(|list| list.url_list.into_iter().next())
    }
}

#[derive(Debug, Deserialize)]
struct Statistics {
    digg_count: Option<u64>,
    comment_count: Option<u64>,
}

pub struct TikTokExtractor;

impl TikTokExtractor {
    fn build_result(video_id: &str, data: FeedResponse) -> Result<MediaResult, ExtractError> {
        let aweme = data.aweme_list.into_iter().next().ok_or_else(|| {
            ExtractError::MediaNotFound(format!("TikTok video {video_id} not found"))
        })?;

        let video = require(aweme.video, "video")?;
        let video_url = require(UrlList::first(video.play_addr), "video.play_addr")?;
        let thumbnail = require(UrlList::first(video.cover), "video.cover")?;
        let music_url = require(
            UrlList::first(aweme.music.and_then(|music| music.play_url)),
            "music.play_url",
        )?;

        let mut meta = MediaMeta::new(Platform::TikTok);
        if let Some(statistics) = aweme.statistics {
            meta.likes = statistics.digg_count;
            meta.comments = statistics.comment_count;
        }

        Ok(MediaResult {
            title: aweme.desc,
            media_type: MediaType::Video,
            // Video and its background audio, always both.
            sources: vec![
                MediaSource::direct("Video HD", video_url),
                MediaSource::direct("Audio", music_url),
            ],
            thumbnail,
            meta,
        })
    }
}

#[async_trait]
impl PlatformExtractor for TikTokExtractor {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    fn identify(&self, host: &str) -> bool {
        host_contains(host, &["tiktok.com"])
    }

    async fn extract(
        &self,
        url: &str,
        upstream: &dyn Upstream,
    ) -> Result<MediaResult, ExtractError> {
        let video_id = capture(&VIDEO_ID_REGEX, url)
            .ok_or_else(|| ExtractError::MalformedUrl(format!("no TikTok video id in {url}")))?;

        let data: FeedResponse = get_json(upstream, &format!("{FEED_URL}{video_id}")).await?;
        Self::build_result(video_id, data)
    }
}
