use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::catalog::{Catalog, ResolvedEndpoint, URL_SLOT};
use crate::config::Config;
use crate::error::Error;
use crate::extract;
use crate::metadata::{self, VideoMetadata};
use crate::probe::{self, ProbeResult};
use crate::scrape::Transport;

/// Characters left unescaped when splicing the source url into a template:
/// alphanumerics, the unreserved marks, and the reserved set
/// `:/?#[]@!$&'()*+,;=`.
const TEMPLATE_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// The one record callers consume. `success` reflects candidate generation
/// only, never liveness.
#[derive(Clone, Debug, Serialize)]
pub struct ResolutionResult {
    pub success: bool,
    pub source_url: String,
    pub content_id: Option<String>,
    pub metadata: VideoMetadata,
    pub candidates: Vec<ResolvedEndpoint>,
    pub best_endpoint_url: Option<String>,
    pub recommended_endpoint: Option<String>,
    pub error: Option<String>,
}

impl ResolutionResult {
    fn failed(url: &str, error: String) -> Self {
        Self {
            success: false,
            source_url: url.to_string(),
            content_id: None,
            metadata: VideoMetadata::default(),
            candidates: Vec::new(),
            best_endpoint_url: None,
            recommended_endpoint: None,
            error: Some(error),
        }
    }
}

/// Catalog, config and transport are injected at construction; the resolver
/// itself holds no other state across calls.
pub struct Resolver {
    catalog: Catalog,
    config: Config,
    transport: Box<dyn Transport>,
}

impl Resolver {
    pub fn new(catalog: Catalog, config: Config, transport: Box<dyn Transport>) -> Self {
        Self {
            catalog,
            config,
            transport,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Render every catalog template against the source url, in priority
    /// order. Purely local; one entry per template, always.
    pub fn build_candidates(&self, source_url: &str) -> Vec<ResolvedEndpoint> {
        let encoded = utf8_percent_encode(source_url, TEMPLATE_KEEP).to_string();

        self.catalog
            .templates()
            .iter()
            .map(|t| ResolvedEndpoint {
                name: t.name.clone(),
                url: t.url_template.replacen(URL_SLOT, &encoded, 1),
                kind: t.kind,
                priority: t.priority,
            })
            .collect()
    }

    /// The full pipeline. Never returns an error and never panics on bad
    /// input; anything that escapes the best-effort steps is converted into
    /// a failed result right here.
    pub fn resolve(&self, url: &str, run_probe: bool) -> ResolutionResult {
        if !extract::is_youku_url(url) {
            log::warn!("{url}: does not look like a youku url, resolving anyway");
        }

        match self.resolve_inner(url, run_probe) {
            Ok(result) => result,
            Err(err) => {
                log::warn!("{url}: resolution failed: {err}");
                ResolutionResult::failed(url, err.to_string())
            }
        }
    }

    fn resolve_inner(&self, url: &str, run_probe: bool) -> Result<ResolutionResult, Error> {
        let content_id = self.extract_id(url);

        // a failed scrape only costs us the metadata fields
        let metadata = metadata::fetch(self.transport.as_ref(), url, self.config.metadata_timeout())
            .unwrap_or_else(|err| {
                log::debug!("{url}: metadata fetch: {err}");
                VideoMetadata::default()
            });

        let candidates = self.build_candidates(url);

        let mut result = ResolutionResult {
            success: !candidates.is_empty(),
            source_url: url.to_string(),
            content_id,
            metadata,
            best_endpoint_url: candidates.first().map(|c| c.url.clone()),
            recommended_endpoint: None,
            candidates,
            error: None,
        };

        if run_probe && result.success {
            if let Some(live) = probe::find_best_live(
                self.transport.as_ref(),
                &result.candidates,
                self.config.head_probe_timeout(),
            ) {
                result.best_endpoint_url = Some(live.url);
                result.recommended_endpoint = Some(live.name);
            }
        }

        Ok(result)
    }

    /// Url patterns first; on a miss, fetch the page once and try the html
    /// patterns against it.
    fn extract_id(&self, url: &str) -> Option<String> {
        if let Some(id) = extract::extract_id(url, None) {
            return Some(id);
        }

        match self.transport.get(url, self.config.page_timeout()) {
            Ok(resp) if resp.status == 200 => extract::extract_id(url, Some(&resp.body)),
            Ok(resp) => {
                log::debug!("{url}: id fallback fetch: status {}", resp.status);
                None
            }
            Err(err) => {
                log::debug!("{url}: id fallback fetch: {err}");
                None
            }
        }
    }

    /// Exhaustive availability report over the whole catalog.
    pub fn test_all(&self, url: &str) -> Vec<ProbeResult> {
        let candidates = self.build_candidates(url);
        probe::test_all(
            self.transport.as_ref(),
            &candidates,
            self.config.get_probe_timeout(),
        )
    }
}
