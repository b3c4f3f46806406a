use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::error::Error;
use crate::scrape::Transport;

/// Rendered in place of a zero or missing duration.
pub const DURATION_UNKNOWN: &str = "unknown";

/// Best-effort page metadata. Every field may be absent; an empty record is
/// a valid outcome, not an error.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<u64>,
}

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"<title>(.*?)</title>",
        r#""title"\s*:\s*"([^"]+)""#,
        r#"data-title["']?\s*[:=]\s*["']([^"']+)["']"#,
    ])
});

static THUMBNAIL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""poster"\s*:\s*"([^"]+)""#,
        r#""img"\s*:\s*"([^"]+)""#,
        r#"data-poster["']?\s*[:=]\s*["']([^"']+)["']"#,
    ])
});

static DURATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""duration"\s*:\s*(\d+)"#,
        r#"data-duration["']?\s*[:=]\s*["']?(\d+)["']?"#,
    ])
});

// Trailing site-name suffixes stripped from scraped titles.
static TITLE_SUFFIXES: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r"\s*-\s*优酷.*$", r"\s*-\s*视频.*$"]));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid metadata pattern"))
        .collect()
}

/// One GET against the source page. The failure reason stays inspectable
/// here; the orchestrator decides that it only warrants empty metadata.
pub fn fetch(
    transport: &dyn Transport,
    url: &str,
    timeout: Duration,
) -> Result<VideoMetadata, Error> {
    let resp = transport.get(url, timeout)?;

    if !(200..300).contains(&resp.status) {
        return Err(Error::Other(anyhow::anyhow!(
            "source page answered with status {}",
            resp.status
        )));
    }

    Ok(from_html(&resp.body))
}

/// Each field is scraped independently with its own ordered pattern list.
pub fn from_html(html: &str) -> VideoMetadata {
    VideoMetadata {
        title: extract_title(html),
        thumbnail_url: extract_thumbnail(html),
        duration_seconds: extract_duration(html),
    }
}

fn extract_title(html: &str) -> Option<String> {
    TITLE_PATTERNS.iter().find_map(|re| {
        let raw = re.captures(html)?.get(1)?.as_str().trim();
        let cleaned = strip_site_suffix(raw);
        // too short after cleanup means the match was junk; try the next pattern
        (cleaned.chars().count() > 2).then_some(cleaned)
    })
}

fn strip_site_suffix(title: &str) -> String {
    let mut cleaned = title.to_string();
    for re in TITLE_SUFFIXES.iter() {
        cleaned = re.replace(&cleaned, "").to_string();
    }
    cleaned.trim().to_string()
}

fn extract_thumbnail(html: &str) -> Option<String> {
    THUMBNAIL_PATTERNS.iter().find_map(|re| {
        let candidate = re.captures(html)?.get(1)?.as_str();
        is_absolute_http_url(candidate).then(|| candidate.to_string())
    })
}

fn is_absolute_http_url(candidate: &str) -> bool {
    matches!(Url::parse(candidate), Ok(url) if url.scheme() == "http" || url.scheme() == "https")
}

fn extract_duration(html: &str) -> Option<u64> {
    DURATION_PATTERNS
        .iter()
        .find_map(|re| re.captures(html)?.get(1)?.as_str().parse().ok())
}

/// `HH:MM:SS` above an hour, `MM:SS` below. Zero seconds means the page did
/// not really know the duration, so it maps to the unknown sentinel rather
/// than `00:00`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return DURATION_UNKNOWN.to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
