//! Tracker configuration
//!
//! Covers where to look and when to fire. The event itself is fixed.

use serde::{Deserialize, Serialize};

use super::visibility::{FiringPolicy, VisibilityGate};
use super::{ReadError, ReadResult};

/// Where to look and when to fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Id of the end-of-article marker element
    pub target_id: String,
    /// Id of the scrolling container used as the observation root
    pub root_id: String,
    /// Threshold the observer is registered with
    pub observe_threshold: f64,
    /// Visible fraction that counts as "read until the end"
    pub trigger_ratio: f64,
    /// Repeated firing behavior
    pub policy: FiringPolicy,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            target_id: Self::DEFAULT_TARGET_ID.to_string(),
            root_id: Self::DEFAULT_ROOT_ID.to_string(),
            observe_threshold: Self::DEFAULT_OBSERVE_THRESHOLD,
            trigger_ratio: VisibilityGate::DEFAULT_TRIGGER_RATIO,
            policy: FiringPolicy::default(),
        }
    }
}

impl WatcherConfig {
    /// Default end-of-article marker id
    pub const DEFAULT_TARGET_ID: &'static str = "chegou-no-fim";
    /// Default scroll container id
    pub const DEFAULT_ROOT_ID: &'static str = "page-content";
    /// Default observer registration threshold
    pub const DEFAULT_OBSERVE_THRESHOLD: f64 = 0.5;

    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> ReadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses `json` when given, otherwise returns the defaults
    pub fn from_optional_json(json: Option<&str>) -> ReadResult<Self> {
        json.map_or_else(|| Ok(Self::default()), Self::from_json)
    }

    /// Set the target element id
    #[must_use]
    pub fn with_target_id(mut self, id: &str) -> Self {
        self.target_id = id.to_string();
        self
    }

    /// Set the root element id
    #[must_use]
    pub fn with_root_id(mut self, id: &str) -> Self {
        self.root_id = id.to_string();
        self
    }

    /// Set the observer registration threshold
    #[must_use]
    pub const fn with_observe_threshold(mut self, threshold: f64) -> Self {
        self.observe_threshold = threshold;
        self
    }

    /// Set the trigger ratio
    #[must_use]
    pub const fn with_trigger_ratio(mut self, ratio: f64) -> Self {
        self.trigger_ratio = ratio;
        self
    }

    /// Set the firing policy
    #[must_use]
    pub const fn with_policy(mut self, policy: FiringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds a fresh gate for this config
    #[must_use]
    pub fn gate(&self) -> VisibilityGate {
        VisibilityGate::new(self.trigger_ratio).with_policy(self.policy)
    }

    /// Rejects settings the tracker cannot work with
    pub fn validate(&self) -> ReadResult<()> {
        check_unit_interval("observe_threshold", self.observe_threshold)?;
        check_unit_interval("trigger_ratio", self.trigger_ratio)?;
        if self.target_id.is_empty() {
            return Err(ReadError::InvalidConfig {
                message: "target_id is empty".to_string(),
            });
        }
        if self.root_id.is_empty() {
            return Err(ReadError::InvalidConfig {
                message: "root_id is empty".to_string(),
            });
        }
        Ok(())
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> ReadResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ReadError::InvalidThreshold { name, value })
    }
}
