//! Pipeline configuration

use crate::error::{KinshipError, Result};
use serde::{Deserialize, Serialize};

/// Concurrency settings for the ordered pipeline and the async builders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of worker threads (peak number of concurrent derive calls)
    pub jobs: usize,

    /// Capacity of each worker's input and output queue
    pub queue_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            jobs: (num_cpus::get() * 3 / 4).max(1), // 75% of cores
            queue_depth: 1,
        }
    }
}

impl PipelineConfig {
    /// Config with an explicit worker count and default queue depth
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(KinshipError::config("jobs must be at least 1"));
        }
        if self.queue_depth == 0 {
            return Err(KinshipError::config("queue_depth must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();
        assert!(config.jobs > 0);
        assert_eq!(config.queue_depth, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pipeline_config_rejects_zero() {
        assert!(PipelineConfig::default().with_jobs(0).validate().is_err());
        assert!(PipelineConfig::default()
            .with_queue_depth(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_pipeline_config_partial_json() {
        let config: PipelineConfig = serde_json::from_str(r#"{"jobs": 3}"#).unwrap();
        assert_eq!(config.jobs, 3);
        assert_eq!(config.queue_depth, 1);

        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
