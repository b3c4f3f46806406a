use std::time::Duration;

use crate::catalog::{EndpointKind, ResolvedEndpoint};
use crate::error::Error;
use crate::scrape::{ProbeResponse, Transport};

/// Canned reply for any url containing the matched marker.
#[derive(Clone, Copy)]
pub enum Reply {
    Status(u16, &'static str),
    Fail(&'static str),
}

/// Offline stand-in for the network. Urls are routed by substring match of
/// each marker against the url base (everything before the query string, so
/// a source url embedded in a candidate's query never matches); unmatched
/// urls fail.
pub struct StubTransport {
    replies: Vec<(&'static str, Reply)>,
}

impl StubTransport {
    pub fn new(replies: Vec<(&'static str, Reply)>) -> Self {
        Self { replies }
    }

    /// Every request fails with a transport error.
    pub fn unreachable() -> Self {
        Self::new(Vec::new())
    }

    fn reply_for(&self, url: &str) -> Result<ProbeResponse, Error> {
        let base = url.split('?').next().unwrap_or(url);
        for (marker, reply) in &self.replies {
            if base.contains(marker) {
                return match reply {
                    Reply::Status(status, body) => Ok(ProbeResponse {
                        status: *status,
                        body: body.to_string(),
                        elapsed: Duration::from_millis(5),
                    }),
                    Reply::Fail(msg) => Err(Error::Other(anyhow::anyhow!("{msg}"))),
                };
            }
        }

        Err(Error::Other(anyhow::anyhow!("connection timed out")))
    }
}

impl Transport for StubTransport {
    fn head(&self, url: &str, _timeout: Duration) -> Result<ProbeResponse, Error> {
        self.reply_for(url).map(|mut resp| {
            resp.body = String::new();
            resp
        })
    }

    fn get(&self, url: &str, _timeout: Duration) -> Result<ProbeResponse, Error> {
        self.reply_for(url)
    }
}

pub fn candidate(name: &'static str, priority: u32) -> ResolvedEndpoint {
    ResolvedEndpoint {
        name: name.to_string(),
        url: format!("https://{name}.example/?url=x"),
        kind: EndpointKind::Embed,
        priority,
    }
}
