use serde::Serialize;
use std::time::Duration;

use crate::catalog::ResolvedEndpoint;
use crate::scrape::Transport;

/// A 200 body must mention one of these for the endpoint to count as
/// actually serving video content.
pub const VIDEO_KEYWORDS: &[&str] = &["video", "mp4", "iframe", "player", "source"];

/// The endpoint picked by the first-live probe.
#[derive(Clone, Debug, Serialize)]
pub struct LiveEndpoint {
    pub name: String,
    pub url: String,
    pub priority: u32,
    pub response_time: f64,
}

/// Outcome of one exhaustive-mode probe. Transient, one per candidate.
#[derive(Clone, Debug, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub url: String,
    pub available: bool,
    pub response_time: Option<f64>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub priority: u32,
}

/// First-live mode: sequential HEAD probes in priority order, returning the
/// first candidate that answers 200 and skipping the rest. Must stay
/// sequential; the short-circuit is the point.
pub fn find_best_live(
    transport: &dyn Transport,
    candidates: &[ResolvedEndpoint],
    timeout: Duration,
) -> Option<LiveEndpoint> {
    for candidate in candidates {
        match transport.head(&candidate.url, timeout) {
            Ok(resp) if resp.status == 200 => {
                let response_time = resp.elapsed.as_secs_f64();
                log::debug!("{}: live in {response_time:.2}s", candidate.name);
                return Some(LiveEndpoint {
                    name: candidate.name.clone(),
                    url: candidate.url.clone(),
                    priority: candidate.priority,
                    response_time,
                });
            }
            Ok(resp) => log::debug!("{}: status {}", candidate.name, resp.status),
            Err(err) => log::debug!("{}: {err}", candidate.name),
        }
    }

    None
}

/// Exhaustive mode: a full GET per candidate. Available means status 200 and
/// a body mentioning video content. Every candidate yields a result; one
/// candidate failing never affects the others.
pub fn test_all(
    transport: &dyn Transport,
    candidates: &[ResolvedEndpoint],
    timeout: Duration,
) -> Vec<ProbeResult> {
    let mut results: Vec<ProbeResult> = candidates
        .iter()
        .map(|candidate| probe_one(transport, candidate, timeout))
        .collect();

    // candidates already arrive in priority order, but the sorted output is
    // a guaranteed postcondition, not an accident of iteration
    results.sort_by_key(|r| r.priority);
    results
}

fn probe_one(
    transport: &dyn Transport,
    candidate: &ResolvedEndpoint,
    timeout: Duration,
) -> ProbeResult {
    let mut result = ProbeResult {
        name: candidate.name.clone(),
        url: candidate.url.clone(),
        available: false,
        response_time: None,
        status_code: None,
        error: None,
        priority: candidate.priority,
    };

    match transport.get(&candidate.url, timeout) {
        Ok(resp) => {
            result.response_time = Some(resp.elapsed.as_secs_f64());
            result.status_code = Some(resp.status);

            if resp.status == 200 {
                let body = resp.body.to_lowercase();
                result.available = VIDEO_KEYWORDS.iter().any(|kw| body.contains(kw));
            } else {
                result.error = Some(format!("status code: {}", resp.status));
            }
        }
        Err(err) => {
            result.error = Some(err.to_string());
        }
    }

    result
}
