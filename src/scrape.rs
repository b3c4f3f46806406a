use rand::seq::IndexedRandom;
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, DNT, ORIGIN,
    REFERER, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use std::error::Error as _;
use std::time::{Duration, Instant};

use crate::error::Error;

pub const YOUKU_ORIGIN: &str = "https://www.youku.com";

// Rotated per request to avoid trivial blocking by the endpoints.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Status, body text and wall-clock latency of one request.
#[derive(Clone, Debug)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
}

/// Seam between the resolver and the network. Production code goes through
/// [`ReqwestTransport`]; tests substitute a stub. Timeouts are per call, and
/// no request is ever retried.
pub trait Transport: Send + Sync {
    /// Lightweight liveness check. The body is not read.
    fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, Error>;

    /// Full fetch of status code and body text.
    fn get(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, Error>;
}

pub fn build_client() -> Result<Client, Error> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(10))
        .build()?;

    Ok(client)
}

/// A plausible desktop-browser header set with a randomized user agent.
/// Referer and Origin always point at youku itself.
pub fn random_headers() -> HeaderMap {
    let mut rng = rand::rng();
    let agent = USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0]);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3"),
    );
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.youku.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static(YOUKU_ORIGIN));
    headers
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, Error> {
        let iden = iden_for(url);
        log::debug!("{iden}: HEAD");

        let started = Instant::now();
        let resp = self
            .client
            .head(url)
            .headers(random_headers())
            .timeout(timeout)
            .send()
            .map_err(|err| {
                log::debug!("{iden}: {}", root_cause(&err));
                err
            })?;

        Ok(ProbeResponse {
            status: resp.status().as_u16(),
            body: String::new(),
            elapsed: started.elapsed(),
        })
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, Error> {
        let iden = iden_for(url);
        log::debug!("{iden}: GET");

        let started = Instant::now();
        let resp = self
            .client
            .get(url)
            .headers(random_headers())
            .timeout(timeout)
            .send()
            .map_err(|err| {
                log::debug!("{iden}: {}", root_cause(&err));
                err
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|err| {
            log::debug!("{iden}: {}", root_cause(&err));
            err
        })?;

        Ok(ProbeResponse {
            status,
            body,
            elapsed: started.elapsed(),
        })
    }
}

fn iden_for(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path()),
        Err(_) => url.to_string(),
    }
}

fn root_cause(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}
