//! Browser WASM bindings for the read tracker
//!
//! Wires [`ReadingTracker`] to `document`, `IntersectionObserver` and the
//! page's global `gtag` function. The page calls `trackReading()` once,
//! optionally with a JSON config such as `{"policy": "once"}`.

use js_sys::{Array, Function, Reflect, JSON};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, Document, Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::core::{
    AnalyticsDispatcher, EventPayload, IntersectionRecord, ReadError, ReadResult, WatcherConfig,
};
use crate::tracker::{BatchCallback, IntersectionHost, ReadingTracker};

type ObserverClosure = Closure<dyn FnMut(Array, IntersectionObserver) -> Result<(), JsValue>>;

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// [`IntersectionHost`] backed by the live document
#[derive(Debug)]
pub struct BrowserHost {
    document: Document,
}

impl BrowserHost {
    /// Wraps an existing document
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Uses `window.document`
    pub fn from_window() -> ReadResult<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ReadError::ObserverRegistration {
                message: "no document available".to_string(),
            })?;
        Ok(Self::new(document))
    }
}

/// Closure the browser's observer calls into
///
/// The observer itself stays alive on the JS side while it has a target.
#[derive(Debug)]
pub struct BrowserSubscription {
    callback: ObserverClosure,
}

impl BrowserSubscription {
    /// Keeps the callback alive until the document unloads
    pub fn persist(self) {
        self.callback.forget();
    }
}

impl IntersectionHost for BrowserHost {
    type Element = Element;
    type Subscription = BrowserSubscription;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn observe(
        &mut self,
        target: &Element,
        root: Option<&Element>,
        threshold: f64,
        mut callback: BatchCallback,
    ) -> ReadResult<BrowserSubscription> {
        let closure: ObserverClosure =
            Closure::new(move |entries: Array, _observer: IntersectionObserver| {
                let records: Vec<IntersectionRecord> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| {
                        IntersectionRecord::new(entry.is_intersecting(), entry.intersection_ratio())
                    })
                    .collect();
                callback(&records).map_err(|err| JsValue::from_str(&err.to_string()))
            });

        let options = IntersectionObserverInit::new();
        options.set_root(root);
        options.set_threshold(&JsValue::from_f64(threshold));

        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options)
                .map_err(|err| ReadError::ObserverRegistration {
                    message: js_message(&err),
                })?;
        observer.observe(target);

        Ok(BrowserSubscription { callback: closure })
    }
}

/// Sends events through the page's global `gtag` function
#[derive(Debug, Default, Clone, Copy)]
pub struct GtagDispatcher;

impl AnalyticsDispatcher for GtagDispatcher {
    fn send_event(&self, name: &str, payload: &EventPayload) -> ReadResult<()> {
        let gtag = Reflect::get(&js_sys::global(), &JsValue::from_str("gtag"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or(ReadError::DispatcherUnavailable)?;

        let dispatch_error = |err: JsValue| ReadError::DispatchFailed {
            message: js_message(&err),
        };
        let payload = JSON::parse(&serde_json::to_string(payload)?).map_err(dispatch_error)?;
        gtag.call3(
            &JsValue::NULL,
            &JsValue::from_str("event"),
            &JsValue::from_str(name),
            &payload,
        )
        .map_err(dispatch_error)?;
        Ok(())
    }
}

fn to_js_error(err: &ReadError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Installs the panic hook when the module loads
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Starts read tracking on the current page
///
/// `config_json` overrides any subset of the config fields; `undefined` keeps
/// the defaults. A missing end-of-article marker is not an error.
#[wasm_bindgen(js_name = trackReading)]
pub fn track_reading(config_json: Option<String>) -> Result<(), JsValue> {
    let config = WatcherConfig::from_optional_json(config_json.as_deref())
        .map_err(|e| to_js_error(&e))?;
    let host = BrowserHost::from_window().map_err(|e| to_js_error(&e))?;

    let mut tracker = ReadingTracker::with_config(host, GtagDispatcher, config);
    let state = tracker.start().map_err(|e| to_js_error(&e))?;
    console::log_1(
        &format!(
            "readthrough: {state:?} on #{} ({:?})",
            tracker.config().target_id,
            tracker.config().policy
        )
        .into(),
    );

    if let Some(subscription) = tracker.into_subscription() {
        subscription.persist();
    }
    Ok(())
}
