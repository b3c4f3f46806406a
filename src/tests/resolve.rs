use percent_encoding::percent_decode_str;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::resolve::Resolver;
use crate::tests::stub::{Reply, StubTransport};

fn resolver_with(transport: StubTransport) -> Resolver {
    Resolver::new(Catalog::builtin(), Config::default(), Box::new(transport))
}

const SOURCE: &str = "https://v.youku.com/video?vid=XNjQ4MzA5ODkwOA==&x=1";

#[test]
fn candidates_cover_the_whole_catalog_in_priority_order() {
    let resolver = resolver_with(StubTransport::unreachable());
    let candidates = resolver.build_candidates(SOURCE);

    assert_eq!(candidates.len(), resolver.catalog().len());

    let priorities: Vec<u32> = candidates.iter().map(|c| c.priority).collect();
    assert_eq!(priorities, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn each_candidate_embeds_the_encoded_source_exactly_once() {
    let resolver = resolver_with(StubTransport::unreachable());

    // reserved characters stay literal, so the query survives verbatim
    for candidate in resolver.build_candidates(SOURCE) {
        assert_eq!(candidate.url.matches(SOURCE).count(), 1, "{}", candidate.name);
    }
}

#[test]
fn percent_encoding_round_trips() {
    let source = "https://v.youku.com/v_show/id_XYZ.html?a=b c&t=100%";
    let resolver = resolver_with(StubTransport::unreachable());

    let candidate = &resolver.build_candidates(source)[0];
    let embedded = candidate
        .url
        .split_once("?url=")
        .map(|(_, rest)| rest)
        .unwrap();

    assert!(!embedded.contains(' '));
    let decoded = percent_decode_str(embedded).decode_utf8().unwrap();
    assert_eq!(decoded, source);
}

#[test]
fn resolve_succeeds_without_identifier_or_metadata() {
    // nothing on the network answers, including the source page itself
    let resolver = resolver_with(StubTransport::unreachable());
    let result = resolver.resolve("https://example.com/unrelated", true);

    assert!(result.success);
    assert_eq!(result.content_id, None);
    assert_eq!(result.metadata.title, None);
    assert_eq!(result.candidates.len(), 8);
    assert_eq!(result.recommended_endpoint, None);
    // default best is the priority-1 candidate
    assert_eq!(
        result.best_endpoint_url.as_deref(),
        Some(result.candidates[0].url.as_str())
    );
    assert!(result.error.is_none());
}

#[test]
fn live_probe_overrides_the_default_best() {
    let transport = StubTransport::new(vec![
        ("youku.com", Reply::Fail("source page unreachable")),
        ("bb3.buzz", Reply::Status(200, "")),
        ("xmflv", Reply::Status(200, "")),
    ]);
    let resolver = resolver_with(transport);

    let result = resolver.resolve(SOURCE, true);

    assert!(result.success);
    assert_eq!(result.recommended_endpoint.as_deref(), Some("bb3-jiexi"));
    assert!(result
        .best_endpoint_url
        .as_deref()
        .unwrap()
        .contains("bb3.buzz"));
}

#[test]
fn skipping_the_probe_keeps_the_priority_one_default() {
    let transport = StubTransport::new(vec![("bb3.buzz", Reply::Status(200, ""))]);
    let resolver = resolver_with(transport);

    let result = resolver.resolve(SOURCE, false);

    assert_eq!(result.recommended_endpoint, None);
    assert!(result
        .best_endpoint_url
        .as_deref()
        .unwrap()
        .contains("jx.618g.com"));
}

#[test]
fn id_comes_from_the_url_without_touching_the_network() {
    let resolver = resolver_with(StubTransport::unreachable());
    let result = resolver.resolve(SOURCE, false);

    assert_eq!(result.content_id.as_deref(), Some("XNjQ4MzA5ODkwOA=="));
}

#[test]
fn id_falls_back_to_the_page_html() {
    let transport = StubTransport::new(vec![(
        "youku.com",
        Reply::Status(200, r#"<script>{"videoId":"XFALLBACK"}</script>"#),
    )]);
    let resolver = resolver_with(transport);

    let result = resolver.resolve("https://www.youku.com/profile/video-page", false);

    assert_eq!(result.content_id.as_deref(), Some("XFALLBACK"));
}

#[test]
fn metadata_is_scraped_from_the_source_page() {
    let transport = StubTransport::new(vec![(
        "youku.com",
        Reply::Status(
            200,
            r#"<title>某剧 第03集 - 优酷</title><div>{"poster":"https://img.example/p.jpg","duration": 1500}</div>"#,
        ),
    )]);
    let resolver = resolver_with(transport);

    let result = resolver.resolve(SOURCE, false);

    assert_eq!(result.metadata.title.as_deref(), Some("某剧 第03集"));
    assert_eq!(
        result.metadata.thumbnail_url.as_deref(),
        Some("https://img.example/p.jpg")
    );
    assert_eq!(result.metadata.duration_seconds, Some(1500));
}

#[test]
fn transport_failures_never_escape_resolve() {
    let transport = StubTransport::new(vec![
        ("youku.com", Reply::Fail("tls handshake failed")),
        ("618g", Reply::Fail("connection refused")),
    ]);
    let resolver = resolver_with(transport);

    let result = resolver.resolve(SOURCE, true);

    // probing and scraping all failed, but generation alone decides success
    assert!(result.success);
    assert_eq!(result.candidates.len(), 8);
}
