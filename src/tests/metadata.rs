use std::time::Duration;

use crate::metadata::{self, format_duration, from_html, DURATION_UNKNOWN};
use crate::tests::stub::{Reply, StubTransport};

#[test]
fn title_is_scraped_and_site_suffix_stripped() {
    let html = "<html><head><title>武林外传 第01集 - 优酷视频在线观看</title></head></html>";
    let meta = from_html(html);
    assert_eq!(meta.title.as_deref(), Some("武林外传 第01集"));
}

#[test]
fn title_falls_through_to_json_field() {
    let html = r#"<script>var data = {"title":"某部剧 第02集"};</script>"#;
    let meta = from_html(html);
    assert_eq!(meta.title.as_deref(), Some("某部剧 第02集"));
}

#[test]
fn too_short_title_is_discarded() {
    let html = "<title>ab - 视频高清在线</title>";
    let meta = from_html(html);
    assert_eq!(meta.title, None);
}

#[test]
fn thumbnail_requires_absolute_url() {
    let absolute = r#"{"poster":"https://img.example.com/cover.jpg"}"#;
    assert_eq!(
        from_html(absolute).thumbnail_url.as_deref(),
        Some("https://img.example.com/cover.jpg")
    );

    let relative = r#"{"poster":"/static/cover.jpg"}"#;
    assert_eq!(from_html(relative).thumbnail_url, None);
}

#[test]
fn duration_is_parsed_as_seconds() {
    let html = r#"{"duration": 2520, "title":"whatever else"}"#;
    assert_eq!(from_html(html).duration_seconds, Some(2520));
}

#[test]
fn empty_page_yields_empty_metadata() {
    let meta = from_html("<html><body>nothing here</body></html>");
    assert_eq!(meta.title, None);
    assert_eq!(meta.thumbnail_url, None);
    assert_eq!(meta.duration_seconds, None);
}

#[test]
fn duration_formatting() {
    assert_eq!(format_duration(0), DURATION_UNKNOWN);
    assert_eq!(format_duration(65), "01:05");
    assert_eq!(format_duration(3725), "01:02:05");
}

#[test]
fn fetch_reports_transport_failure() {
    let transport = StubTransport::unreachable();
    let err = metadata::fetch(&transport, "https://v.youku.com/x", Duration::from_secs(1))
        .unwrap_err();
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn fetch_reports_non_2xx_status() {
    let transport = StubTransport::new(vec![(
        "youku.com",
        Reply::Status(403, "<title>Access Denied For Real</title>"),
    )]);
    let err = metadata::fetch(&transport, "https://v.youku.com/x", Duration::from_secs(1))
        .unwrap_err();
    assert!(err.to_string().contains("403"));
}

#[test]
fn successful_fetch_parses_the_body() {
    let transport = StubTransport::new(vec![(
        "youku.com",
        Reply::Status(200, r#"<title>一部电影 - 优酷</title><div>{"duration": 65}</div>"#),
    )]);
    let meta = metadata::fetch(&transport, "https://v.youku.com/x", Duration::from_secs(1)).unwrap();
    assert_eq!(meta.title.as_deref(), Some("一部电影"));
    assert_eq!(meta.duration_seconds, Some(65));
}
