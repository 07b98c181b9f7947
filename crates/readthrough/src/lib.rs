//! Readthrough - end-of-article read tracking
//!
//! Watches the end-of-article marker inside the page's scroll container and
//! sends a `finished_reading` analytics event once the marker is at least
//! 75% visible.
//!
//! The browser collaborators (element lookup, `IntersectionObserver`, the
//! global analytics function) sit behind [`tracker::IntersectionHost`] and
//! [`core::AnalyticsDispatcher`], so the whole flow runs natively against
//! [`wasm::MockDom`] in tests. The `wasm` feature adds the web-sys bindings.
//!
//! # Example
//!
//! ```rust
//! use readthrough::prelude::*;
//! use std::rc::Rc;
//!
//! let recorder = RecordingDispatcher::shared();
//! let mut tracker = ReadingTracker::new(MockDom::article(), Rc::clone(&recorder));
//! assert_eq!(tracker.start().unwrap(), WatchState::Observing);
//!
//! tracker
//!     .host_mut()
//!     .deliver("chegou-no-fim", &[IntersectionRecord::visible(0.8)])
//!     .unwrap();
//! assert_eq!(recorder.sent()[0].name, "finished_reading");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod tracker;

/// Browser hosts: mock DOM always, web-sys bindings behind `wasm`
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::{
        send_completion_event, AnalyticsDispatcher, CompletionEvent, EventPayload,
        FailingDispatcher, FiringPolicy, IntersectionRecord, ReadError, ReadResult,
        RecordingDispatcher, SentEvent, VisibilityGate, WatcherConfig,
    };
    pub use crate::tracker::{
        observe_until_threshold, BatchCallback, IntersectionHost, ReadingTracker, WatchState,
    };
    pub use crate::wasm::{DomElement, MockDom};

    #[cfg(feature = "wasm")]
    pub use crate::wasm::{BrowserHost, GtagDispatcher};
}
