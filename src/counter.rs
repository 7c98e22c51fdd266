//! Counter app bound through a [`Binder`]
//!
//! The display template must contain `{{ count }}`; each click increments
//! the counter and writes the new value through the binder.

use serde_json::{json, Value};

use crate::binder::Binder;
use crate::view::ViewHandle;

/// Tracked property name used by [`CounterView`]
pub const COUNT_PROPERTY: &str = "count";

/// Plain counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    value: i64,
}

impl Counter {
    pub fn new(initial: i64) -> Self {
        Self { value: initial }
    }

    /// Add one and return the new value (saturates at `i64::MAX`)
    pub fn increment(&mut self) -> i64 {
        self.value = self.value.saturating_add(1);
        self.value
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

/// Counter whose value is rendered into a view
pub struct CounterView<V: ViewHandle> {
    counter: Counter,
    binder: Binder<V>,
}

impl<V: ViewHandle> CounterView<V> {
    pub fn new(view: V, counter: Counter) -> Self {
        let binder = Binder::new(view, [(COUNT_PROPERTY, json!(counter.value()))], COUNT_PROPERTY);
        Self { counter, binder }
    }

    /// Increment and re-render; returns the new value
    pub fn click(&mut self) -> i64 {
        let value = self.counter.increment();
        self.binder.set(COUNT_PROPERTY, Value::from(value));
        value
    }

    pub fn value(&self) -> i64 {
        self.counter.value()
    }

    pub fn view(&self) -> &V {
        self.binder.view()
    }

    pub fn render_count(&self) -> u64 {
        self.binder.render_count()
    }
}
