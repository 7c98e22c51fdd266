//! viewbind - one-way template binding and async table views

pub mod account;
pub mod binder;
pub mod cell;
pub mod counter;
pub mod error;
pub mod event_log;
pub mod fetch;
pub mod markup;
pub mod placeholder;
pub mod table;
pub mod view;

pub use account::{check_balance, DEFAULT_ACCOUNTS_URL};
pub use binder::Binder;
pub use cell::{Cell, Row};
pub use counter::{Counter, CounterView};
pub use error::{FixSuggestion, ViewError};
pub use event_log::{Event, EventKind, EventLog};
pub use fetch::{create_fetcher, Fetcher, HttpFetcher, MockFetcher, MockResponse};
pub use markup::RenderedView;
pub use table::{DataTable, LoadState, ShadowRoot, DATA_SOURCE_ATTR};
pub use view::{TextView, ViewHandle};
