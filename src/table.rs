//! Async data table view
//!
//! [`DataTable`] holds a whole-set replaceable list of [`Row`]s and renders
//! one of three views into its private [`ShadowRoot`]:
//!
//! | State | Shown when | View |
//! |-------|------------|------|
//! | `Empty` | no rows | "No data available" |
//! | `Ready` | at least one row | header + one body row per row |
//! | `Error` | last load failed | "Error loading data: <message>" |
//!
//! A failed load does not clear the rows: the error view overrides the data
//! until the next successful assignment, which clears the error.
//!
//! Loads are never cancelled or deduplicated. When several are in flight,
//! whichever resolves last decides the final state.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::cell::Row;
use crate::error::{json_kind, Result, ViewError};
use crate::event_log::{EventKind, EventLog};
use crate::fetch::Fetcher;
use crate::markup::{self, escape_html, RenderedView};

/// Tag name used for the host element
pub const TAG_NAME: &str = "data-table";

/// The one observed attribute
pub const DATA_SOURCE_ATTR: &str = "data-source";

/// Render mode derived from the table state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Empty,
    Ready,
    Error(String),
}

/// Isolated subtree holding the rendered markup
///
/// Nothing rendered here appears in [`DataTable::host_markup`].
#[derive(Debug, Clone)]
pub struct ShadowRoot {
    markup: String,
    view: RenderedView,
}

impl ShadowRoot {
    fn new() -> Self {
        Self {
            markup: String::new(),
            view: RenderedView::Empty,
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.markup
    }

    /// Structured form of the last render
    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    pub fn has_style(&self) -> bool {
        self.markup.contains("<style>")
    }
}

struct TableState {
    rows: Vec<Row>,
    columns: Vec<String>,
    error: Option<String>,
    attributes: Vec<(String, String)>,
    shadow: ShadowRoot,
    renders: u64,
}

impl TableState {
    fn load_state(&self) -> LoadState {
        match (&self.error, self.rows.is_empty()) {
            (Some(message), _) => LoadState::Error(message.clone()),
            (None, true) => LoadState::Empty,
            (None, false) => LoadState::Ready,
        }
    }

    fn view(&self) -> RenderedView {
        if let Some(message) = &self.error {
            return RenderedView::Error {
                message: message.clone(),
            };
        }
        if self.rows.is_empty() {
            return RenderedView::Empty;
        }
        RenderedView::Table {
            headers: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| self.columns.iter().map(|col| row.format(col)).collect())
                .collect(),
        }
    }
}

/// Columns are the keys of the first row, in first-seen order
fn extract_columns(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Coerce an arbitrary value into rows; non-arrays become no rows
fn coerce_rows(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items.into_iter().map(Row::from_json).collect(),
        _ => Vec::new(),
    }
}

/// A load payload must be a JSON array
fn expect_array(value: Value) -> Result<Value> {
    match value {
        Value::Array(_) => Ok(value),
        other => Err(ViewError::UnexpectedShape {
            expected: "array".to_string(),
            actual: json_kind(&other).to_string(),
        }),
    }
}

/// Table component with URL-driven async loading
///
/// Cloning yields another handle to the same table.
#[derive(Clone)]
pub struct DataTable {
    state: Arc<Mutex<TableState>>,
    fetcher: Arc<dyn Fetcher>,
    id: Arc<str>,
    event_log: Option<EventLog>,
}

impl DataTable {
    /// Create an empty table (renders the empty state immediately)
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::build(fetcher, TAG_NAME.into(), None)
    }

    /// Create an empty table that records renders and loads in `event_log`
    pub fn with_event_log(
        fetcher: Arc<dyn Fetcher>,
        id: impl Into<Arc<str>>,
        event_log: EventLog,
    ) -> Self {
        Self::build(fetcher, id.into(), Some(event_log))
    }

    fn build(fetcher: Arc<dyn Fetcher>, id: Arc<str>, event_log: Option<EventLog>) -> Self {
        let table = Self {
            state: Arc::new(Mutex::new(TableState {
                rows: Vec::new(),
                columns: Vec::new(),
                error: None,
                attributes: Vec::new(),
                shadow: ShadowRoot::new(),
                renders: 0,
            })),
            fetcher,
            id,
            event_log,
        };
        table.render_locked(&mut table.state.lock());
        table
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // ─────────────────────────────────────────────────────────────
    // Data property
    // ─────────────────────────────────────────────────────────────

    /// Assign rows from any JSON value (non-arrays become empty)
    pub fn set_data(&self, value: Value) {
        self.set_rows(coerce_rows(value));
    }

    /// Replace all rows, recompute columns, clear any error and re-render
    pub fn set_rows(&self, rows: Vec<Row>) {
        let mut state = self.state.lock();
        state.columns = extract_columns(&rows);
        state.rows = rows;
        state.error = None;
        self.render_locked(&mut state);
    }

    /// Current rows (still held while the error view is shown)
    pub fn data(&self) -> Vec<Row> {
        self.state.lock().rows.clone()
    }

    /// Current rows as a JSON array
    ///
    /// Rows are read back from their cells, so array elements that were not
    /// objects come back as `{}`.
    pub fn data_json(&self) -> Value {
        Value::Array(self.state.lock().rows.iter().map(Row::to_json).collect())
    }

    pub fn columns(&self) -> Vec<String> {
        self.state.lock().columns.clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.state.lock().load_state()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    // ─────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────

    /// Fetch `url` and assign the payload; failures become the error view
    ///
    /// Never fails: the outcome is only observable through the table state.
    #[instrument(skip(self), fields(component = %self.id))]
    pub async fn load(&self, url: &str) {
        self.emit(EventKind::LoadStarted {
            component: Arc::clone(&self.id),
            url: url.to_string(),
        });

        let result = match self.fetcher.get_json(url).await {
            Ok(value) => expect_array(value),
            Err(e) => Err(e),
        };

        match result {
            Ok(payload) => {
                let rows = coerce_rows(payload);
                let count = rows.len();
                debug!(rows = count, "load succeeded");
                self.set_rows(rows);
                self.emit(EventKind::LoadSucceeded {
                    component: Arc::clone(&self.id),
                    url: url.to_string(),
                    rows: count,
                });
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "load failed");
                self.show_error(message.clone());
                self.emit(EventKind::LoadFailed {
                    component: Arc::clone(&self.id),
                    url: url.to_string(),
                    error: message,
                });
            }
        }
    }

    /// Start a load on the current tokio runtime and return immediately
    ///
    /// The handle only signals completion; failures never propagate through
    /// it. Outside a runtime nothing is spawned: the table shows the error
    /// view and `None` is returned.
    pub fn load_from_url(&self, url: impl Into<String>) -> Option<JoinHandle<()>> {
        let url = url.into();
        match Handle::try_current() {
            Ok(handle) => {
                let table = self.clone();
                Some(handle.spawn(async move { table.load(&url).await }))
            }
            Err(_) => {
                let message = ViewError::NoRuntime { url: url.clone() }.to_string();
                warn!(component = %self.id, error = %message, "load not started");
                self.show_error(message.clone());
                self.emit(EventKind::LoadFailed {
                    component: Arc::clone(&self.id),
                    url,
                    error: message,
                });
                None
            }
        }
    }

    fn show_error(&self, message: String) {
        let mut state = self.state.lock();
        state.error = Some(message);
        self.render_locked(&mut state);
    }

    // ─────────────────────────────────────────────────────────────
    // Host attributes
    // ─────────────────────────────────────────────────────────────

    /// Set a host attribute and notify the component
    pub fn set_attribute(&self, name: &str, value: &str) -> Option<JoinHandle<()>> {
        {
            let mut state = self.state.lock();
            match state.attributes.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => state
                    .attributes
                    .push((name.to_string(), value.to_string())),
            }
        }
        self.on_attribute_changed(name, Some(value))
    }

    /// Remove a host attribute and notify the component
    pub fn remove_attribute(&self, name: &str) -> Option<JoinHandle<()>> {
        self.state.lock().attributes.retain(|(k, _)| k != name);
        self.on_attribute_changed(name, None)
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    /// Host notification: a non-empty `data-source` starts exactly one load
    pub fn on_attribute_changed(
        &self,
        name: &str,
        new_value: Option<&str>,
    ) -> Option<JoinHandle<()>> {
        match new_value {
            Some(url) if name == DATA_SOURCE_ATTR && !url.is_empty() => {
                debug!(component = %self.id, url, "data source changed");
                self.load_from_url(url)
            }
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────

    /// Markup of the host element as seen by the surrounding document
    pub fn host_markup(&self) -> String {
        let state = self.state.lock();
        let mut out = format!("<{}", TAG_NAME);
        for (name, value) in &state.attributes {
            out.push_str(&format!(r#" {}="{}""#, name, escape_html(value)));
        }
        out.push_str(&format!("></{}>", TAG_NAME));
        out
    }

    /// Snapshot of the isolated root
    pub fn shadow_root(&self) -> ShadowRoot {
        self.state.lock().shadow.clone()
    }

    pub fn rendered_view(&self) -> RenderedView {
        self.state.lock().shadow.view.clone()
    }

    /// Number of render passes so far (the initial render included)
    pub fn render_count(&self) -> u64 {
        self.state.lock().renders
    }

    fn render_locked(&self, state: &mut TableState) {
        let view = state.view();
        state.shadow.markup = markup::render(&view);
        state.shadow.view = view;
        state.renders += 1;

        debug!(component = %self.id, pass = state.renders, "table rendered");
        self.emit(EventKind::Rendered {
            component: Arc::clone(&self.id),
            pass: state.renders,
        });
    }

    fn emit(&self, kind: EventKind) {
        if let Some(log) = &self.event_log {
            log.emit(kind);
        }
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("id", &self.id)
            .field("fetcher", &self.fetcher.name())
            .field("state", &self.load_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{MockFetcher, MockResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table() -> DataTable {
        DataTable::new(Arc::new(MockFetcher::new()))
    }

    #[test]
    fn starts_empty_with_empty_view() {
        let t = table();
        assert_eq!(t.load_state(), LoadState::Empty);
        assert_eq!(t.data_json(), json!([]));
        assert_eq!(t.rendered_view(), RenderedView::Empty);
        assert!(t.shadow_root().inner_html().contains("No data available"));
        assert_eq!(t.render_count(), 1);
    }

    #[test]
    fn non_sequences_coerce_to_empty() {
        let t = table();
        for value in [json!([]), Value::Null, json!("x"), json!({"a": 1}), json!(7)] {
            t.set_data(json!([{"a": 1}]));
            t.set_data(value);
            assert_eq!(t.load_state(), LoadState::Empty);
            assert!(t.columns().is_empty());
            assert!(t.data().is_empty());
        }
    }

    #[test]
    fn columns_and_cells_row_major() {
        let t = table();
        t.set_data(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));

        assert_eq!(t.load_state(), LoadState::Ready);
        assert_eq!(t.columns(), vec!["a", "b"]);
        let view = t.rendered_view();
        assert_eq!(view.cells(), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn columns_come_from_first_row_only() {
        let t = table();
        t.set_data(json!([{"id": 1}, {"id": 2, "extra": true}]));
        assert_eq!(t.columns(), vec!["id"]);
        assert_eq!(t.rendered_view().cells(), vec!["1", "2"]);
    }

    #[test]
    fn null_missing_and_structured_cells() {
        let t = table();
        t.set_data(json!([
            {"id": 1, "name": null, "meta": {"k": "v"}},
            {"id": 2}
        ]));
        assert_eq!(
            t.rendered_view().cells(),
            vec!["1", "-", r#"{"k":"v"}"#, "2", "-", "-"]
        );
    }

    #[test]
    fn non_object_rows_render_placeholders() {
        let t = table();
        t.set_data(json!([{"a": 1}, 5]));
        assert_eq!(t.rendered_view().cells(), vec!["1", "-"]);
    }

    #[test]
    fn data_round_trips_in_key_order() {
        let t = table();
        let data = json!([{"id": 1, "name": "Test User"}]);
        t.set_data(data.clone());
        assert_eq!(t.data_json(), data);
    }

    #[test]
    fn typed_rows_path() {
        let t = table();
        t.set_rows(vec![Row::new().with("x", "y")]);
        assert_eq!(t.columns(), vec!["x"]);
        assert_eq!(t.rendered_view().cells(), vec!["y"]);
    }

    #[test]
    fn every_assignment_renders() {
        let t = table();
        t.set_data(json!([{"a": 1}]));
        t.set_data(json!([{"a": 1}]));
        t.set_data(Value::Null);
        assert_eq!(t.render_count(), 4);
    }

    #[tokio::test]
    async fn failed_load_keeps_rows_but_shows_error() {
        let fetcher = MockFetcher::new().route(
            "https://api.example.com/data",
            MockResponse::network_error("Network error"),
        );
        let t = DataTable::new(Arc::new(fetcher));
        t.set_data(json!([{"id": 1}]));

        t.load("https://api.example.com/data").await;

        assert!(matches!(t.load_state(), LoadState::Error(ref m) if m.contains("Network error")));
        assert_eq!(t.data_json(), json!([{"id": 1}]));
        let html = t.shadow_root().inner_html().to_string();
        assert!(html.contains(r#"<div class="error">"#));
        assert!(!html.contains("<table>"));
    }

    #[tokio::test]
    async fn assignment_after_error_recovers() {
        let fetcher = MockFetcher::new().route("u", MockResponse::status(503));
        let t = DataTable::new(Arc::new(fetcher));
        t.load("u").await;
        assert_eq!(t.last_error().as_deref(), Some("HTTP error! status: 503"));

        t.set_data(json!([]));
        assert_eq!(t.load_state(), LoadState::Empty);
        t.set_data(json!([{"a": 1}]));
        assert_eq!(t.load_state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn non_array_payload_is_an_error() {
        let fetcher = MockFetcher::new().route("u", MockResponse::json(json!({"rows": []})));
        let t = DataTable::new(Arc::new(fetcher));
        t.load("u").await;
        assert_eq!(
            t.last_error().as_deref(),
            Some("Unexpected payload: expected array, got object")
        );
    }

    #[tokio::test]
    async fn empty_attribute_does_not_load() {
        let fetcher = Arc::new(MockFetcher::new());
        let t = DataTable::new(fetcher.clone());

        assert!(t.set_attribute(DATA_SOURCE_ATTR, "").is_none());
        assert!(t.remove_attribute(DATA_SOURCE_ATTR).is_none());
        assert!(t.set_attribute("title", "https://x.test").is_none());
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn attribute_triggers_one_load() {
        let fetcher = Arc::new(
            MockFetcher::new().route("https://x.test/d", MockResponse::json(json!([{"id": 1}]))),
        );
        let t = DataTable::new(fetcher.clone());

        let handle = t.set_attribute(DATA_SOURCE_ATTR, "https://x.test/d").unwrap();
        handle.await.unwrap();

        assert_eq!(fetcher.requests(), vec!["https://x.test/d"]);
        assert_eq!(t.data_json(), json!([{"id": 1}]));
        assert_eq!(t.get_attribute(DATA_SOURCE_ATTR).as_deref(), Some("https://x.test/d"));
    }

    #[test]
    fn attribute_outside_runtime_shows_error_instead_of_panicking() {
        let fetcher = Arc::new(MockFetcher::new());
        let log = EventLog::new();
        let t = DataTable::with_event_log(fetcher.clone(), "orders", log.clone());
        t.set_data(json!([{"id": 1}]));

        assert!(t.set_attribute(DATA_SOURCE_ATTR, "https://x.test/d").is_none());

        assert_eq!(fetcher.request_count(), 0);
        assert!(matches!(t.load_state(), LoadState::Error(ref m) if m.contains("No async runtime")));
        assert_eq!(t.data_json(), json!([{"id": 1}]));
        assert_eq!(t.get_attribute(DATA_SOURCE_ATTR).as_deref(), Some("https://x.test/d"));

        let loads = log.load_events();
        assert_eq!(loads.len(), 1);
        assert!(matches!(&loads[0].kind, EventKind::LoadFailed { url, .. } if url == "https://x.test/d"));
    }

    #[test]
    fn non_object_rows_read_back_as_empty_objects() {
        let t = table();
        t.set_data(json!([5, "x"]));
        assert_eq!(t.load_state(), LoadState::Ready);
        assert_eq!(t.data_json(), json!([{}, {}]));
    }

    #[test]
    fn host_markup_never_contains_table() {
        let t = table();
        t.set_data(json!([{"id": 1, "name": "Test"}]));
        assert!(t.shadow_root().inner_html().contains("<table>"));
        assert_eq!(t.host_markup(), "<data-table></data-table>");
    }
}
