use once_cell::sync::Lazy;
use regex::Regex;

// Ordered; first capture wins. Tried against the url itself.
static URL_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"v\.youku\.com/v_show/id_([^.]+)\.html",
        r"v\.youku\.com/video\?vid=([^&]+)",
        r"youku\.com.*vid[=:]([^&\s]+)",
        r"youku\.com.*videoId[=:]([^&\s]+)",
        r"youku\.com/.*?/id_([^.]+)\.html",
    ])
});

// Fallback list, tuned for embedded json and html attributes in page bodies.
static HTML_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#""videoId"\s*:\s*"([^"]+)""#,
        r#""vid"\s*:\s*"([^"]+)""#,
        r#"videoId["']?\s*[:=]\s*["']([^"']+)["']"#,
        r#"data-id["']?\s*[:=]\s*["']([^"']+)["']"#,
        r"/id_([^.]+)\.html",
        r"vid[=:]([^&\s]+)",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid id pattern"))
        .collect()
}

/// Permissive recognition boundary: anything mentioning the youku domain is
/// eligible, unrelated subdomains included.
pub fn is_youku_url(url: &str) -> bool {
    url.contains("youku.com")
}

/// Recover the content identifier from the url, falling back to page html
/// when provided. A miss is not an error; the identifier shape is not
/// validated.
pub fn extract_id(url: &str, html: Option<&str>) -> Option<String> {
    if let Some(id) = first_capture(&URL_ID_PATTERNS, url) {
        return Some(id);
    }

    html.and_then(|html| first_capture(&HTML_ID_PATTERNS, html))
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}
