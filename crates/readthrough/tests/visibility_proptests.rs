//! Property-based tests for the visibility gate

use proptest::prelude::*;
use readthrough::prelude::*;
use std::rc::Rc;

// ===== Strategy definitions =====

/// Generate any visible ratio in [0, 1]
fn ratio_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=1.0f64
}

/// Generate any intersection record
fn record_strategy() -> impl Strategy<Value = IntersectionRecord> {
    (any::<bool>(), ratio_strategy()).prop_map(|(i, r)| IntersectionRecord::new(i, r))
}

/// Generate a batch of records
fn batch_strategy() -> impl Strategy<Value = Vec<IntersectionRecord>> {
    prop::collection::vec(record_strategy(), 0..16)
}

fn expected_hits(batch: &[IntersectionRecord]) -> usize {
    batch
        .iter()
        .filter(|r| r.is_intersecting && r.intersection_ratio >= 0.75)
        .count()
}

proptest! {
    /// Non-intersecting records never qualify, whatever the ratio
    #[test]
    fn prop_hidden_never_qualifies(ratio in ratio_strategy()) {
        let gate = VisibilityGate::default();
        prop_assert!(!gate.qualifies(&IntersectionRecord::new(false, ratio)));
    }

    /// Intersecting records qualify exactly at or above the trigger ratio
    #[test]
    fn prop_intersecting_qualifies_iff_at_or_above(ratio in ratio_strategy()) {
        let gate = VisibilityGate::default();
        prop_assert_eq!(gate.qualifies(&IntersectionRecord::visible(ratio)), ratio >= 0.75);
    }

    /// Default policy fires once per qualifying record
    #[test]
    fn prop_every_record_policy_counts_all(batch in batch_strategy()) {
        let mut gate = VisibilityGate::default();
        prop_assert_eq!(gate.admit_batch(&batch), expected_hits(&batch));
    }

    /// Once policy fires at most once across any number of batches
    #[test]
    fn prop_once_policy_at_most_one(batches in prop::collection::vec(batch_strategy(), 0..6)) {
        let mut gate = VisibilityGate::default().with_policy(FiringPolicy::Once);
        let total: usize = batches.iter().map(|b| gate.admit_batch(b)).sum();
        let any_hit = batches.iter().any(|b| expected_hits(b) > 0);
        prop_assert_eq!(total, usize::from(any_hit));
    }

    /// The tracker sends one event per qualifying record delivered
    #[test]
    fn prop_tracker_sends_per_qualifying_record(
        batches in prop::collection::vec(batch_strategy(), 0..6)
    ) {
        let recorder = RecordingDispatcher::shared();
        let mut tracker = ReadingTracker::new(MockDom::article(), Rc::clone(&recorder));
        tracker.start().unwrap();
        for batch in &batches {
            tracker.host_mut().deliver("chegou-no-fim", batch).unwrap();
        }
        let expected: usize = batches.iter().map(|b| expected_hits(b)).sum();
        prop_assert_eq!(recorder.count(), expected);
        let fixed = CompletionEvent::finished_reading().payload();
        prop_assert!(recorder.sent().iter().all(|e| e.payload == fixed));
    }

    /// Thresholds outside [0, 1] are rejected
    #[test]
    fn prop_out_of_range_ratio_rejected(ratio in prop_oneof![1.0001f64..10.0, -10.0f64..-0.0001]) {
        let result = WatcherConfig::new().with_trigger_ratio(ratio).validate();
        let is_invalid_threshold = matches!(result, Err(ReadError::InvalidThreshold { .. }));
        prop_assert!(is_invalid_threshold);
    }
}
