//! End-to-end read tracking scenarios against the mock DOM

use pretty_assertions::assert_eq;
use readthrough::prelude::*;
use std::rc::Rc;

const TARGET: &str = "chegou-no-fim";

type MockTracker = ReadingTracker<MockDom, Rc<RecordingDispatcher>>;

fn started_tracker() -> (MockTracker, Rc<RecordingDispatcher>) {
    let recorder = RecordingDispatcher::shared();
    let mut tracker = ReadingTracker::new(MockDom::article(), Rc::clone(&recorder));
    assert_eq!(tracker.start().unwrap(), WatchState::Observing);
    (tracker, recorder)
}

#[test]
fn non_intersecting_records_never_send() {
    let (mut tracker, recorder) = started_tracker();
    let batch: Vec<_> = [0.0, 0.5, 0.75, 0.9, 1.0]
        .iter()
        .map(|&ratio| IntersectionRecord::new(false, ratio))
        .collect();
    tracker.host_mut().deliver(TARGET, &batch).unwrap();
    assert_eq!(recorder.count(), 0);
}

#[test]
fn ratio_at_boundary_sends() {
    let (mut tracker, recorder) = started_tracker();
    tracker
        .host_mut()
        .deliver(TARGET, &[IntersectionRecord::visible(0.75)])
        .unwrap();
    assert_eq!(recorder.count(), 1);
}

#[test]
fn ratio_below_boundary_does_not_send() {
    let (mut tracker, recorder) = started_tracker();
    tracker
        .host_mut()
        .deliver(TARGET, &[IntersectionRecord::visible(0.749_999)])
        .unwrap();
    assert_eq!(recorder.count(), 0);
}

#[test]
fn consecutive_qualifying_records_each_send() {
    let (mut tracker, recorder) = started_tracker();
    let dom = tracker.host_mut();
    dom.deliver(TARGET, &[IntersectionRecord::visible(0.8)]).unwrap();
    dom.deliver(TARGET, &[IntersectionRecord::hidden()]).unwrap();
    dom.deliver(TARGET, &[IntersectionRecord::visible(0.9)]).unwrap();
    assert_eq!(recorder.count(), 2);
}

#[test]
fn every_sent_event_carries_fixed_payload() {
    let (mut tracker, recorder) = started_tracker();
    tracker
        .host_mut()
        .deliver(
            TARGET,
            &[IntersectionRecord::visible(0.76), IntersectionRecord::visible(1.0)],
        )
        .unwrap();

    let expected = SentEvent {
        name: "finished_reading".to_string(),
        payload: EventPayload {
            event_category: "Articles".to_string(),
            event_label: "User read until the end".to_string(),
            value: 100,
        },
    };
    assert_eq!(recorder.sent(), vec![expected.clone(), expected]);
}

#[test]
fn missing_target_is_inert() {
    let mut dom = MockDom::article();
    dom.remove_element(TARGET);
    let recorder = RecordingDispatcher::shared();
    let mut tracker = ReadingTracker::new(dom, Rc::clone(&recorder));

    assert_eq!(tracker.start().unwrap(), WatchState::Unregistered);
    assert_eq!(tracker.host().observation_count(), 0);

    let delivered = tracker
        .host_mut()
        .deliver(TARGET, &[IntersectionRecord::visible(1.0)])
        .unwrap();
    assert_eq!(delivered, 0);
    assert_eq!(recorder.count(), 0);
}

#[test]
fn missing_container_observes_viewport() {
    let mut dom = MockDom::article();
    dom.remove_element("page-content");
    let recorder = RecordingDispatcher::shared();
    let mut tracker = ReadingTracker::new(dom, Rc::clone(&recorder));

    assert_eq!(tracker.start().unwrap(), WatchState::Observing);
    assert_eq!(tracker.host().observations()[0].root_id, None);

    tracker
        .host_mut()
        .deliver(TARGET, &[IntersectionRecord::visible(0.75)])
        .unwrap();
    assert_eq!(recorder.count(), 1);
}

#[test]
fn once_policy_sends_a_single_event() {
    let recorder = RecordingDispatcher::shared();
    let config = WatcherConfig::from_json(r#"{"policy": "once"}"#).unwrap();
    let mut tracker =
        ReadingTracker::with_config(MockDom::article(), Rc::clone(&recorder), config);
    tracker.start().unwrap();

    let dom = tracker.host_mut();
    for _ in 0..3 {
        dom.deliver(TARGET, &[IntersectionRecord::visible(1.0)]).unwrap();
    }
    assert_eq!(recorder.count(), 1);
}

#[test]
fn custom_ids_are_looked_up() {
    let mut dom = MockDom::new();
    dom.register_element(DomElement::new("section").with_id("scroller"));
    dom.register_element(DomElement::new("hr").with_id("the-end"));
    let config = WatcherConfig::new()
        .with_target_id("the-end")
        .with_root_id("scroller");
    let recorder = RecordingDispatcher::shared();
    let mut tracker = ReadingTracker::with_config(dom, Rc::clone(&recorder), config);
    tracker.start().unwrap();

    tracker
        .host_mut()
        .deliver("the-end", &[IntersectionRecord::visible(0.9)])
        .unwrap();
    assert_eq!(recorder.count(), 1);
    assert_eq!(
        tracker.host().observations()[0].root_id.as_deref(),
        Some("scroller")
    );
}

#[test]
fn config_cannot_change_the_event() {
    let recorder = RecordingDispatcher::shared();
    let config = WatcherConfig::from_json(
        r#"{"event": {"name": "x", "category": "y", "label": "z", "value": 1}}"#,
    )
    .unwrap();
    let mut tracker =
        ReadingTracker::with_config(MockDom::article(), Rc::clone(&recorder), config);
    tracker.start().unwrap();
    tracker
        .host_mut()
        .deliver(TARGET, &[IntersectionRecord::visible(0.9)])
        .unwrap();

    assert_eq!(
        recorder.sent(),
        vec![SentEvent {
            name: "finished_reading".to_string(),
            payload: EventPayload {
                event_category: "Articles".to_string(),
                event_label: "User read until the end".to_string(),
                value: 100,
            },
        }]
    );
}
