use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::EndpointTemplate;
use crate::error::Error;

const METADATA_TIMEOUT_SECS: u64 = 15;
const PAGE_TIMEOUT_SECS: u64 = 10;
const HEAD_PROBE_TIMEOUT_SECS: u64 = 5;
const GET_PROBE_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Timeout for the metadata page fetch, in seconds
    #[serde(default = "metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Timeout for the html fallback fetch during id extraction
    #[serde(default = "page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Timeout for a single HEAD liveness probe
    #[serde(default = "head_probe_timeout_secs")]
    pub head_probe_timeout_secs: u64,

    /// Timeout for a single GET availability probe
    #[serde(default = "get_probe_timeout_secs")]
    pub get_probe_timeout_secs: u64,

    /// Endpoint catalog override; the builtin youku table is used when empty
    #[serde(default)]
    pub endpoints: Vec<EndpointTemplate>,
}

fn metadata_timeout_secs() -> u64 {
    METADATA_TIMEOUT_SECS
}

fn page_timeout_secs() -> u64 {
    PAGE_TIMEOUT_SECS
}

fn head_probe_timeout_secs() -> u64 {
    HEAD_PROBE_TIMEOUT_SECS
}

fn get_probe_timeout_secs() -> u64 {
    GET_PROBE_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_timeout_secs: METADATA_TIMEOUT_SECS,
            page_timeout_secs: PAGE_TIMEOUT_SECS,
            head_probe_timeout_secs: HEAD_PROBE_TIMEOUT_SECS,
            get_probe_timeout_secs: GET_PROBE_TIMEOUT_SECS,
            endpoints: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let config_str = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&config_str)
            .map_err(|err| Error::Config(format!("{path} is malformed: {err}")))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        for (name, value) in [
            ("metadata_timeout_secs", self.metadata_timeout_secs),
            ("page_timeout_secs", self.page_timeout_secs),
            ("head_probe_timeout_secs", self.head_probe_timeout_secs),
            ("get_probe_timeout_secs", self.get_probe_timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{name} must be greater than 0")));
            }
        }

        Ok(())
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn head_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.head_probe_timeout_secs)
    }

    pub fn get_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.get_probe_timeout_secs)
    }
}
