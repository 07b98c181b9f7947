//! Mock DOM host for testing without a browser
//!
//! Stands in for `document.getElementById` and `IntersectionObserver`:
//! elements are registered by id, observations are recorded, and tests push
//! intersection batches through [`MockDom::deliver`].

use std::collections::HashMap;
use std::fmt;

use crate::core::{IntersectionRecord, ReadResult};
use crate::tracker::{BatchCallback, IntersectionHost};

/// Represents a DOM element for testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Element tag name
    pub tag: String,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates a new DOM element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
        }
    }

    /// Creates an element with an ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }
}

/// An observation registered on the mock host
pub struct MockObservation {
    /// Observed element id
    pub target_id: String,
    /// Root element id, `None` for the viewport
    pub root_id: Option<String>,
    /// Registration threshold
    pub threshold: f64,
    callback: BatchCallback,
}

impl fmt::Debug for MockObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockObservation")
            .field("target_id", &self.target_id)
            .field("root_id", &self.root_id)
            .field("threshold", &self.threshold)
            .finish()
    }
}

/// Handle returned by [`MockDom::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSubscription {
    /// Index of the observation on its host
    pub index: usize,
}

/// Mock DOM implementing [`IntersectionHost`]
#[derive(Debug, Default)]
pub struct MockDom {
    elements: HashMap<String, DomElement>,
    observations: Vec<MockObservation>,
}

impl MockDom {
    /// Creates an empty mock DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an article page: scroll container plus end-of-article marker
    #[must_use]
    pub fn article() -> Self {
        let mut dom = Self::new();
        dom.register_element(DomElement::new("main").with_id("page-content"));
        dom.register_element(DomElement::new("div").with_id("chegou-no-fim"));
        dom
    }

    /// Registers an element for ID lookup
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Removes an element by ID
    pub fn remove_element(&mut self, id: &str) -> Option<DomElement> {
        self.elements.remove(id)
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Registered observations, in registration order
    #[must_use]
    pub fn observations(&self) -> &[MockObservation] {
        &self.observations
    }

    /// Number of registered observations
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Delivers one batch to every observation of `target_id`
    ///
    /// Returns how many callbacks ran. The first callback error stops
    /// delivery, as an uncaught exception would in the browser.
    pub fn deliver(
        &mut self,
        target_id: &str,
        records: &[IntersectionRecord],
    ) -> ReadResult<usize> {
        let mut delivered = 0;
        for observation in self
            .observations
            .iter_mut()
            .filter(|o| o.target_id == target_id)
        {
            (observation.callback)(records)?;
            delivered += 1;
        }
        Ok(delivered)
    }
}

impl IntersectionHost for MockDom {
    type Element = DomElement;
    type Subscription = MockSubscription;

    fn element_by_id(&self, id: &str) -> Option<DomElement> {
        self.elements.get(id).cloned()
    }

    fn observe(
        &mut self,
        target: &DomElement,
        root: Option<&DomElement>,
        threshold: f64,
        callback: BatchCallback,
    ) -> ReadResult<MockSubscription> {
        self.observations.push(MockObservation {
            target_id: target.id.clone(),
            root_id: root.map(|r| r.id.clone()),
            threshold,
            callback,
        });
        Ok(MockSubscription {
            index: self.observations.len() - 1,
        })
    }
}
