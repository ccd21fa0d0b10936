use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    YouTube,
    Instagram,
    Twitter,
    Facebook,
    TikTok,
}

impl Platform {
    pub fn name(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
            Platform::TikTok => "TikTok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSource {
    pub quality: String,
    pub url: String,
    pub download: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl MediaSource {
    /// A source whose playable and download links are the same URL.
    pub fn direct(quality: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            quality: quality.into(),
            download: url.clone(),
            url,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMeta {
    pub platform: Platform,
    /// ISO-8601 duration exactly as the upstream reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweets: Option<u64>,
}

impl MediaMeta {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            duration: None,
            likes: None,
            comments: None,
            retweets: None,
        }
    }
}

/// The normalized payload returned by `/download`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResult {
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub sources: Vec<MediaSource>,
    pub thumbnail: String,
    pub meta: MediaMeta,
}
