//! One-way interpolation binder (model -> view)
//!
//! A [`Binder`] snapshots the view's content as its template, owns the model
//! bag and re-renders synchronously whenever the tracked property is written
//! through [`Binder::set`]. Writes made any other way (there are none: the
//! model is private) cannot trigger a render.
//!
//! ```
//! use serde_json::json;
//! use viewbind::{Binder, TextView, ViewHandle};
//!
//! let view = TextView::new("Hello {{ name }}");
//! let mut binder = Binder::new(view.clone(), [("name", json!("Ada"))], "name");
//! assert_eq!(view.content(), "Hello Ada");
//!
//! binder.set("name", json!("Grace"));
//! assert_eq!(view.content(), "Hello Grace");
//! ```

use std::sync::Arc;

use regex::Regex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::event_log::{EventKind, EventLog};
use crate::placeholder::{self, PATTERNS};
use crate::view::ViewHandle;

/// Text inserted when the tracked property is missing from the model
pub const MISSING_VALUE: &str = "undefined";

/// Binds one model property to a view
pub struct Binder<V: ViewHandle> {
    view: V,
    template: Arc<str>,
    property: String,
    pattern: Arc<Regex>,
    model: FxHashMap<String, Value>,
    renders: u64,
    id: Arc<str>,
    event_log: Option<EventLog>,
}

impl<V: ViewHandle> Binder<V> {
    /// Capture the view's template, take ownership of the model and render once
    ///
    /// # Panics
    ///
    /// Panics if the placeholder pattern for `property` cannot be compiled
    /// (only possible for names exceeding the regex size limit).
    pub fn new<K, I>(view: V, initial: I, property: impl Into<String>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::build(view, initial, property.into(), None)
    }

    /// Same as [`Binder::new`], recording renders and writes in `event_log`
    pub fn with_event_log<K, I>(
        view: V,
        initial: I,
        property: impl Into<String>,
        event_log: EventLog,
    ) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::build(view, initial, property.into(), Some(event_log))
    }

    fn build<K, I>(view: V, initial: I, property: String, event_log: Option<EventLog>) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let pattern = PATTERNS
            .pattern(&property)
            .expect("placeholder pattern must compile");
        let template: Arc<str> = view.content().into();

        if !pattern.is_match(&template) {
            debug!(property = %property, "template has no placeholder for tracked property");
        }

        let mut binder = Self {
            view,
            template,
            id: format!("binder:{}", property).into(),
            property,
            pattern,
            model: initial.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            renders: 0,
            event_log,
        };
        binder.render();
        binder
    }

    /// Write `value` under `key`, re-rendering if `key` is the tracked property
    ///
    /// Every write is accepted. Returns the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let tracked = key == self.property;

        if let Some(log) = &self.event_log {
            log.emit(EventKind::ModelWritten {
                component: Arc::clone(&self.id),
                key: key.clone(),
                tracked,
            });
        }

        let previous = self.model.insert(key, value);
        if tracked {
            self.render();
        }
        previous
    }

    /// Replace the view content with the template rendered from current state
    pub fn render(&mut self) {
        let value = self.display_value();
        let content = placeholder::substitute(&self.template, &self.pattern, &value);
        self.view.set_content(content.into_owned());
        self.renders += 1;

        debug!(property = %self.property, pass = self.renders, "rendered");
        if let Some(log) = &self.event_log {
            log.emit(EventKind::Rendered {
                component: Arc::clone(&self.id),
                pass: self.renders,
            });
        }
    }

    /// String form of the tracked value as it appears in the view
    pub fn display_value(&self) -> String {
        match self.model.get(&self.property) {
            Some(value) => value_to_string(value),
            None => MISSING_VALUE.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model.get(key)
    }

    pub fn model(&self) -> &FxHashMap<String, Value> {
        &self.model
    }

    /// Template captured at construction
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Component id used in the event log (`binder:<property>`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of render passes so far (the initial render included)
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

/// Convert a model value to the text inserted into the view
///
/// Strings are inserted verbatim; `null` becomes the literal `null`;
/// arrays and objects use compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
