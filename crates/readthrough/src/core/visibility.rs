//! Intersection records and the visibility threshold gate

use serde::{Deserialize, Serialize};

/// One observation delivered by the host for the watched element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionRecord {
    /// Whether the element currently overlaps the root
    pub is_intersecting: bool,
    /// Visible fraction of the element, 0.0 to 1.0
    pub intersection_ratio: f64,
}

impl IntersectionRecord {
    /// Creates a record
    #[must_use]
    pub const fn new(is_intersecting: bool, intersection_ratio: f64) -> Self {
        Self {
            is_intersecting,
            intersection_ratio,
        }
    }

    /// An intersecting record with the given ratio
    #[must_use]
    pub const fn visible(intersection_ratio: f64) -> Self {
        Self::new(true, intersection_ratio)
    }

    /// A non-intersecting record
    #[must_use]
    pub const fn hidden() -> Self {
        Self::new(false, 0.0)
    }
}

/// How often a gate lets qualifying records through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringPolicy {
    /// Every qualifying record fires, including repeats
    #[default]
    EveryQualifyingRecord,
    /// Only the first qualifying record fires
    Once,
}

/// Decides which intersection records count as "read until the end"
///
/// A record qualifies when it is intersecting and its ratio is at or above
/// `trigger_ratio`. This is separate from the threshold the observer is
/// registered with, which only controls when the host delivers records.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityGate {
    trigger_ratio: f64,
    policy: FiringPolicy,
    fired: bool,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRIGGER_RATIO)
    }
}

impl VisibilityGate {
    /// Visible fraction at which the completion event fires
    pub const DEFAULT_TRIGGER_RATIO: f64 = 0.75;

    /// Creates a gate that fires on every qualifying record
    #[must_use]
    pub fn new(trigger_ratio: f64) -> Self {
        Self {
            trigger_ratio,
            policy: FiringPolicy::default(),
            fired: false,
        }
    }

    /// Sets the firing policy
    #[must_use]
    pub fn with_policy(mut self, policy: FiringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the trigger ratio
    #[must_use]
    pub fn trigger_ratio(&self) -> f64 {
        self.trigger_ratio
    }

    /// Returns the firing policy
    #[must_use]
    pub fn policy(&self) -> FiringPolicy {
        self.policy
    }

    /// Whether the gate has let at least one record through
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Pure threshold check, ignoring the policy
    #[must_use]
    pub fn qualifies(&self, record: &IntersectionRecord) -> bool {
        record.is_intersecting && record.intersection_ratio >= self.trigger_ratio
    }

    /// Returns true when `record` should fire the callback, updating state
    pub fn admit(&mut self, record: &IntersectionRecord) -> bool {
        if !self.qualifies(record) {
            return false;
        }
        if self.policy == FiringPolicy::Once && self.fired {
            tracing::debug!(
                ratio = record.intersection_ratio,
                "qualifying record suppressed, already fired"
            );
            return false;
        }
        self.fired = true;
        true
    }

    /// Number of callback invocations a batch yields
    pub fn admit_batch(&mut self, records: &[IntersectionRecord]) -> usize {
        records.iter().filter(|r| self.admit(r)).count()
    }
}
