//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which result a getter returns while newer scans are still in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Block until the latest submitted scan's result is ready.
    #[default]
    Latest,
    /// Return the newest completed result at once, if any; otherwise wait
    /// for the latest submission.
    Available,
}

/// Configuration for [`super::Orchestrator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Number of worker threads.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Result freshness policy for the getters.
    #[serde(default)]
    pub freshness: Freshness,
}

fn default_workers() -> usize {
    2
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            freshness: Freshness::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Builder-style setter for the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder-style setter for the freshness policy.
    pub fn with_freshness(mut self, freshness: Freshness) -> Self {
        self.freshness = freshness;
        self
    }

    /// Check that at least one worker is configured.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Configuration("orchestrator.workers"));
        }
        Ok(())
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.workers, 2);
        assert_eq!(config.freshness, Freshness::Latest);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = OrchestratorConfig::default().with_workers(0);
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration("orchestrator.workers"))
        ));
    }

    #[test]
    fn test_yaml_partial() {
        let config = OrchestratorConfig::from_yaml("freshness: available\n").unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.freshness, Freshness::Available);
    }
}
