use std::sync::LazyLock;

use regex::Regex;

use crate::model::MediaResult;

pub const PLACEHOLDER_THUMBNAIL: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\"%3E%3Cpath fill=\"%23666\" d=\"M8.5 13.5l2.5 3 3.5-4.5 4.5 6H5m16 1V5a2 2 0 0 0-2-2H5a2 2 0 0 0-2 2v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2z\"/%3E%3C/svg%3E";

static ISO_DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").expect("valid duration regex")
});

/// `PT1H30M15S` -> `1h 30m 15s`. Anything unrecognised is returned as is.
pub fn format_duration(duration: &str) -> String {
    let Some(caps) = ISO_DURATION_REGEX.captures(duration) else {
        return duration.to_string();
    };

    let parts: Vec<String> = [(1, "h"), (2, "m"), (3, "s")]
        .into_iter()
        .filter_map(|(group, unit)| {
            let value: u64 = caps.get(group)?.as_str().parse().ok()?;
            (value > 0).then(|| format!("{value}{unit}"))
        })
        .collect();

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}k", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

pub fn thumbnail_or_placeholder(thumbnail: &str) -> &str {
    if thumbnail.trim().is_empty() {
        PLACEHOLDER_THUMBNAIL
    } else {
        thumbnail
    }
}

/// Plain-text rendering of a result: title, metadata strip, one line per source.
pub fn render_summary(result: &MediaResult) -> Vec<String> {
    let title = if result.title.trim().is_empty() {
        "Social media post"
    } else {
        result.title.as_str()
    };

    let mut strip = vec![result.meta.platform.to_string()];
    if let Some(duration) = result.meta.duration.as_deref().filter(|value| !value.is_empty()) {
        strip.push(format_duration(duration));
    }
    if let Some(likes) = result.meta.likes.filter(|likes| *likes > 0) {
        strip.push(format!("{} likes", format_count(likes)));
    }

    let mut lines = vec![title.to_string(), strip.join(" · ")];
    for source in &result.sources {
        match &source.size {
            Some(size) => lines.push(format!("[{}] ({size}) {}", source.quality, source.download)),
            None => lines.push(format!("[{}] {}", source.quality, source.download)),
        }
    }

    lines
}
