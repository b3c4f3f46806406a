use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Config;
use crate::error::Error;

/// Substitution slot in an endpoint template. Every template carries exactly
/// one; the percent-encoded source url is spliced into it.
pub const URL_SLOT: &str = "{}";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Embed,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embed => write!(f, "embed"),
        }
    }
}

fn default_kind() -> EndpointKind {
    EndpointKind::Embed
}

/// One third-party redirection service. Plain configuration data; ordering
/// by ascending `priority` is the canonical iteration order everywhere.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointTemplate {
    pub name: String,
    pub url_template: String,
    #[serde(default = "default_kind")]
    pub kind: EndpointKind,
    pub priority: u32,
}

impl EndpointTemplate {
    fn new(name: &str, url_template: &str, priority: u32) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            kind: EndpointKind::Embed,
            priority,
        }
    }
}

/// A concrete endpoint url after template substitution.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedEndpoint {
    pub name: String,
    pub url: String,
    pub kind: EndpointKind,
    pub priority: u32,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    templates: Vec<EndpointTemplate>,
}

impl Catalog {
    /// The known youku redirection services, ranked.
    pub fn builtin() -> Self {
        Self {
            templates: vec![
                EndpointTemplate::new("618g", "https://jx.618g.com/?url={}", 1),
                EndpointTemplate::new("jsonplayer", "https://jx.jsonplayer.com/player/?url={}", 2),
                EndpointTemplate::new("bb3-jiexi", "https://api.bb3.buzz/jiexi/?url={}", 3),
                EndpointTemplate::new("1717yun", "https://www.1717yun.com/jx/ty.php?url={}", 4),
                EndpointTemplate::new(
                    "gaotian-vip",
                    "https://vip.gaotian.love/api/?key=8CNrwNGWumgOHNK5r3H7jsDJb1XhPp&url={}",
                    5,
                ),
                EndpointTemplate::new("okjx", "https://okjx.cc/?url={}", 6),
                EndpointTemplate::new("bozrc", "https://jx.bozrc.com:4433/player/?url={}", 7),
                EndpointTemplate::new("xmflv", "https://jx.xmflv.com/?url={}", 8),
            ],
        }
    }

    /// Catalog from a loaded config; falls back to the builtin table when the
    /// config does not override endpoints. A malformed catalog is a startup
    /// precondition failure, not a runtime error.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let catalog = if config.endpoints.is_empty() {
            Self::builtin()
        } else {
            Self {
                templates: config.endpoints.clone(),
            }
        };
        catalog.validated()
    }

    fn validated(mut self) -> Result<Self, Error> {
        self.templates.sort_by_key(|t| t.priority);
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.templates.is_empty() {
            return Err(Error::Catalog("no endpoint templates defined".into()));
        }

        let mut last = 0u32;
        for template in &self.templates {
            let slots = template.url_template.matches(URL_SLOT).count();
            if slots != 1 {
                return Err(Error::Catalog(format!(
                    "endpoint '{}' must contain exactly one {URL_SLOT} slot, found {slots}",
                    template.name
                )));
            }

            if template.priority == 0 {
                return Err(Error::Catalog(format!(
                    "endpoint '{}' has priority 0, priorities start at 1",
                    template.name
                )));
            }

            // templates are sorted before validation, so an equal neighbor
            // means a duplicate priority
            if template.priority <= last {
                return Err(Error::Catalog(format!(
                    "endpoint '{}' has duplicate priority {}",
                    template.name, template.priority
                )));
            }
            last = template.priority;
        }

        Ok(())
    }

    /// Templates in ascending priority order.
    pub fn templates(&self) -> &[EndpointTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Listing of the catalog with the slot masked, for display.
    pub fn describe(&self) -> Vec<EndpointTemplate> {
        self.templates
            .iter()
            .map(|t| EndpointTemplate {
                url_template: t.url_template.replacen(URL_SLOT, "[video url]", 1),
                ..t.clone()
            })
            .collect()
    }
}
