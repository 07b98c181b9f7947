//! Browser frontend for the read tracker
//!
//! `dom` is a mock host usable on any target; `browser` binds the tracker to
//! the real DOM through web-sys and is only built with the `wasm` feature.

#[cfg(feature = "wasm")]
mod browser;
mod dom;

#[cfg(feature = "wasm")]
pub use browser::{BrowserHost, BrowserSubscription, GtagDispatcher};
pub use dom::{DomElement, MockDom, MockObservation, MockSubscription};
