//! Schema-less table rows
//!
//! A [`Row`] is an ordered mapping of column name to [`Cell`]. Cells are a
//! closed set of value kinds; the cell-format rule dispatches on the kind.

use std::fmt;

use serde_json::{Map, Number, Value};

/// Placeholder text for null or missing cells
pub const EMPTY_CELL: &str = "-";

/// One table cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects, kept as JSON
    Structured(Value),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Back to JSON
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Number(n) => Value::Number(n.clone()),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Structured(v) => v.clone(),
        }
    }
}

impl From<Value> for Cell {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(b),
            Value::Number(n) => Cell::Number(n),
            Value::String(s) => Cell::Text(s),
            v @ (Value::Array(_) | Value::Object(_)) => Cell::Structured(v),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(n.into())
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n.into())
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Cell-format rule: `-` for null, compact JSON for structured values,
/// the literal scalar otherwise
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str(EMPTY_CELL),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Structured(v) => write!(f, "{}", v),
        }
    }
}

/// Ordered record of column name -> cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces the value of an existing key in place
    pub fn with(mut self, key: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.insert(key, cell);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, cell: impl Into<Cell>) {
        let key = key.into();
        let cell = cell.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = cell,
            None => self.fields.push((key, cell)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Formatted text for `column`; missing columns render as `-`
    pub fn format(&self, column: &str) -> String {
        match self.get(column) {
            Some(cell) => cell.to_string(),
            None => EMPTY_CELL.to_string(),
        }
    }

    /// Build from a JSON element; non-objects become rows with no fields
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::new(),
        }
    }

    fn from_map(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(k, v)| (k, Cell::from(v))).collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, c)| (k.clone(), c.to_json()))
                .collect(),
        )
    }
}
