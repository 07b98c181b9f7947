//! Core read-tracking logic, independent of any browser bindings
//!
//! - `event`: the fixed `finished_reading` event and the dispatcher seam
//! - `visibility`: intersection records and the threshold gate
//! - `config`: element ids, thresholds and firing policy

pub mod config;
pub mod event;
pub mod visibility;

pub use config::WatcherConfig;
pub use event::{
    send_completion_event, AnalyticsDispatcher, CompletionEvent, EventPayload, FailingDispatcher,
    RecordingDispatcher, SentEvent,
};
pub use visibility::{FiringPolicy, IntersectionRecord, VisibilityGate};

use thiserror::Error;

/// Result type for read-tracking operations
pub type ReadResult<T> = Result<T, ReadError>;

/// Errors raised while wiring or running the read tracker
#[derive(Debug, Error)]
pub enum ReadError {
    /// The analytics dispatch function does not exist in the environment
    #[error("Analytics dispatcher is not available")]
    DispatcherUnavailable,

    /// The analytics dispatch function threw or rejected the call
    #[error("Analytics dispatch failed: {message}")]
    DispatchFailed {
        /// Error message
        message: String,
    },

    /// The host refused to create the intersection observer
    #[error("Failed to register intersection observer: {message}")]
    ObserverRegistration {
        /// Error message
        message: String,
    },

    /// A ratio or threshold outside [0, 1]
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidThreshold {
        /// Name of the offending setting
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Any other unusable configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// `start()` called on a tracker that is already observing
    #[error("Tracker is already observing")]
    AlreadyObserving,

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
