//! Analytics event emitter
//!
//! The completion event is a fixed record. Delivery goes through an injected
//! [`AnalyticsDispatcher`] so the browser's global `gtag` can be swapped for
//! a recording double in tests.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{ReadError, ReadResult};

/// Metadata object handed to the dispatcher alongside the event name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// Analytics category
    pub event_category: String,
    /// Human-readable label
    pub event_label: String,
    /// Numeric value attached to the event
    pub value: u32,
}

/// The event sent when a reader reaches the end of an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Event name
    pub name: String,
    /// Analytics category
    pub category: String,
    /// Human-readable label
    pub label: String,
    /// Numeric value
    pub value: u32,
}

impl Default for CompletionEvent {
    fn default() -> Self {
        Self::finished_reading()
    }
}

impl CompletionEvent {
    /// Event name reported to the analytics collector
    pub const NAME: &'static str = "finished_reading";
    /// Category of the event
    pub const CATEGORY: &'static str = "Articles";
    /// Label of the event
    pub const LABEL: &'static str = "User read until the end";
    /// Value of the event
    pub const VALUE: u32 = 100;

    /// The fixed `finished_reading` event
    #[must_use]
    pub fn finished_reading() -> Self {
        Self {
            name: Self::NAME.to_string(),
            category: Self::CATEGORY.to_string(),
            label: Self::LABEL.to_string(),
            value: Self::VALUE,
        }
    }

    /// Returns the event name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds the metadata object for the dispatcher
    #[must_use]
    pub fn payload(&self) -> EventPayload {
        EventPayload {
            event_category: self.category.clone(),
            event_label: self.label.clone(),
            value: self.value,
        }
    }
}

/// A single send-event capability
///
/// Fire-and-forget: implementations report failure but nothing retries.
pub trait AnalyticsDispatcher {
    /// Sends `name` with `payload` to the analytics collector
    fn send_event(&self, name: &str, payload: &EventPayload) -> ReadResult<()>;
}

impl<D: AnalyticsDispatcher + ?Sized> AnalyticsDispatcher for &D {
    fn send_event(&self, name: &str, payload: &EventPayload) -> ReadResult<()> {
        (**self).send_event(name, payload)
    }
}

impl<D: AnalyticsDispatcher + ?Sized> AnalyticsDispatcher for Rc<D> {
    fn send_event(&self, name: &str, payload: &EventPayload) -> ReadResult<()> {
        (**self).send_event(name, payload)
    }
}

/// Sends `event` through `dispatcher` exactly once
pub fn send_completion_event<D>(dispatcher: &D, event: &CompletionEvent) -> ReadResult<()>
where
    D: AnalyticsDispatcher + ?Sized,
{
    tracing::info!(event = event.name(), value = event.value, "sending completion event");
    dispatcher.send_event(event.name(), &event.payload())
}

/// One call captured by [`RecordingDispatcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEvent {
    /// Event name
    pub name: String,
    /// Event metadata
    pub payload: EventPayload,
}

/// Dispatcher double that records every call in order
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    sent: RefCell<Vec<SentEvent>>,
}

impl RecordingDispatcher {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder behind an `Rc`, ready to be shared with a tracker
    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Returns a copy of everything sent so far
    #[must_use]
    pub fn sent(&self) -> Vec<SentEvent> {
        self.sent.borrow().clone()
    }

    /// Number of events sent so far
    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.borrow().len()
    }

    /// Forgets all recorded events
    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl AnalyticsDispatcher for RecordingDispatcher {
    fn send_event(&self, name: &str, payload: &EventPayload) -> ReadResult<()> {
        self.sent.borrow_mut().push(SentEvent {
            name: name.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

/// Dispatcher double standing in for an environment without analytics
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingDispatcher;

impl AnalyticsDispatcher for FailingDispatcher {
    fn send_event(&self, _name: &str, _payload: &EventPayload) -> ReadResult<()> {
        Err(ReadError::DispatcherUnavailable)
    }
}
