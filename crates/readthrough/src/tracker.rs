//! Visibility watcher
//!
//! [`IntersectionHost`] abstracts the two browser collaborators the watcher
//! needs: element lookup by id and the intersection observation primitive.
//! [`observe_until_threshold`] registers a gated callback on a host, and
//! [`ReadingTracker`] composes host, dispatcher and config once at
//! initialization.

use std::fmt;

use crate::core::{
    send_completion_event, AnalyticsDispatcher, CompletionEvent, IntersectionRecord, ReadError,
    ReadResult, VisibilityGate, WatcherConfig,
};

/// Callback invoked by the host with each delivered batch of records
///
/// An error aborts the rest of the batch and is handed back to the host.
pub type BatchCallback = Box<dyn FnMut(&[IntersectionRecord]) -> ReadResult<()>>;

/// Host environment capable of intersection observation
pub trait IntersectionHost {
    /// Element handle type
    type Element;
    /// Handle keeping an observation alive
    type Subscription;

    /// Looks up an element by id
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Starts observing `target` relative to `root`
    ///
    /// `root == None` observes relative to the host's default viewport.
    fn observe(
        &mut self,
        target: &Self::Element,
        root: Option<&Self::Element>,
        threshold: f64,
        callback: BatchCallback,
    ) -> ReadResult<Self::Subscription>;
}

/// Registers interest in `target` and calls `on_threshold_reached` for each
/// record the gate admits
///
/// A missing target establishes nothing and returns `Ok(None)`.
pub fn observe_until_threshold<H, F>(
    host: &mut H,
    target: Option<&H::Element>,
    container: Option<&H::Element>,
    threshold: f64,
    mut gate: VisibilityGate,
    mut on_threshold_reached: F,
) -> ReadResult<Option<H::Subscription>>
where
    H: IntersectionHost,
    F: FnMut() -> ReadResult<()> + 'static,
{
    let Some(target) = target else {
        tracing::warn!("target element missing, observation not established");
        return Ok(None);
    };
    if container.is_none() {
        tracing::debug!("container missing, observing relative to the viewport");
    }

    let callback: BatchCallback = Box::new(move |records| {
        for record in records {
            if gate.admit(record) {
                tracing::debug!(
                    ratio = record.intersection_ratio,
                    "visibility threshold reached"
                );
                on_threshold_reached()?;
            }
        }
        Ok(())
    });

    host.observe(target, container, threshold, callback).map(Some)
}

/// Lifecycle of a [`ReadingTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// No observation registered
    Unregistered,
    /// Observation registered for the rest of the document's lifetime
    Observing,
}

/// Watches the end-of-article marker and reports completed reads
pub struct ReadingTracker<H: IntersectionHost, D> {
    host: H,
    dispatcher: D,
    config: WatcherConfig,
    state: WatchState,
    subscription: Option<H::Subscription>,
}

impl<H: IntersectionHost, D> fmt::Debug for ReadingTracker<H, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadingTracker")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

impl<H, D> ReadingTracker<H, D>
where
    H: IntersectionHost,
    D: AnalyticsDispatcher + Clone + 'static,
{
    /// Creates a tracker with the default configuration
    pub fn new(host: H, dispatcher: D) -> Self {
        Self::with_config(host, dispatcher, WatcherConfig::default())
    }

    /// Creates a tracker with a custom configuration
    pub fn with_config(host: H, dispatcher: D, config: WatcherConfig) -> Self {
        Self {
            host,
            dispatcher,
            config,
            state: WatchState::Unregistered,
            subscription: None,
        }
    }

    /// Looks up both elements and registers the observer
    ///
    /// Returns the resulting state. A missing target leaves the tracker
    /// `Unregistered` without raising an error.
    pub fn start(&mut self) -> ReadResult<WatchState> {
        if self.state == WatchState::Observing {
            return Err(ReadError::AlreadyObserving);
        }
        self.config.validate()?;

        let target = self.host.element_by_id(&self.config.target_id);
        let container = self.host.element_by_id(&self.config.root_id);

        let dispatcher = self.dispatcher.clone();
        let event = CompletionEvent::finished_reading();
        let subscription = observe_until_threshold(
            &mut self.host,
            target.as_ref(),
            container.as_ref(),
            self.config.observe_threshold,
            self.config.gate(),
            move || send_completion_event(&dispatcher, &event),
        )?;

        if let Some(subscription) = subscription {
            tracing::info!(
                target = %self.config.target_id,
                root = %self.config.root_id,
                "observing end-of-article marker"
            );
            self.subscription = Some(subscription);
            self.state = WatchState::Observing;
        }
        Ok(self.state)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Whether an observation is registered
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.state == WatchState::Observing
    }

    /// Returns the configuration
    #[must_use]
    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Returns the host
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably, e.g. to deliver records in tests
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the tracker, yielding the live subscription if any
    pub fn into_subscription(self) -> Option<H::Subscription> {
        self.subscription
    }
}
