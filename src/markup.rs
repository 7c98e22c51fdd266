//! HTML rendering for the table view
//!
//! Rendering happens in two steps: the table state is reduced to a
//! [`RenderedView`] (plain text per cell, no markup), then that view is
//! serialized. All interpolated text is HTML-escaped on serialization.

use std::fmt::Write;

/// Text of the empty-state view
pub const EMPTY_TEXT: &str = "No data available";

/// Prefix of the error view text
pub const ERROR_PREFIX: &str = "Error loading data: ";

/// Stylesheet scoped to the isolated root
pub const STYLE: &str = r#"<style>
  :host { display: block; font-family: Arial, sans-serif; }
  table { width: 100%; border-collapse: collapse; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
  th { background-color: #4CAF50; color: white; padding: 12px; text-align: left; font-weight: bold; text-transform: capitalize; }
  td { padding: 10px 12px; border-bottom: 1px solid #ddd; }
  tr:hover { background-color: #f5f5f5; }
  tr:nth-child(even) { background-color: #f9f9f9; }
  .empty-state { padding: 20px; text-align: center; color: #666; }
  .error { padding: 20px; background-color: #ffebee; color: #c62828; border-radius: 4px; }
</style>"#;

/// What the table currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    Empty,
    Table {
        headers: Vec<String>,
        /// Formatted cell text, row-major
        rows: Vec<Vec<String>>,
    },
    Error {
        message: String,
    },
}

impl RenderedView {
    /// Visible text of the view (like the DOM's textContent, minus styles)
    pub fn text(&self) -> String {
        match self {
            RenderedView::Empty => EMPTY_TEXT.to_string(),
            RenderedView::Table { headers, rows } => {
                let mut out = headers.join("");
                for row in rows {
                    out.push_str(&row.join(""));
                }
                out
            }
            RenderedView::Error { message } => format!("{}{}", ERROR_PREFIX, message),
        }
    }

    /// Cell texts in row-major order (empty unless a table)
    pub fn cells(&self) -> Vec<&str> {
        match self {
            RenderedView::Table { rows, .. } => rows.iter().flatten().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, RenderedView::Table { .. })
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}

/// Serialize a view to markup (stylesheet first)
pub fn render(view: &RenderedView) -> String {
    let mut out = String::with_capacity(STYLE.len() + 256);
    out.push_str(STYLE);
    out.push('\n');

    match view {
        RenderedView::Empty => {
            let _ = write!(out, r#"<div class="empty-state">{}</div>"#, EMPTY_TEXT);
        }
        RenderedView::Error { message } => {
            let _ = write!(
                out,
                r#"<div class="error">{}{}</div>"#,
                ERROR_PREFIX,
                escape_html(message)
            );
        }
        RenderedView::Table { headers, rows } => render_table(&mut out, headers, rows),
    }
    out
}

fn render_table(out: &mut String, headers: &[String], rows: &[Vec<String>]) {
    out.push_str("<table>\n<thead>\n<tr>");
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape_html(header));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_view_markup() {
        let html = render(&RenderedView::Empty);
        assert!(html.starts_with("<style>"));
        assert!(html.ends_with(r#"<div class="empty-state">No data available</div>"#));
    }

    #[test]
    fn error_view_escapes_message() {
        let html = render(&RenderedView::Error {
            message: "<b>boom</b>".into(),
        });
        assert!(html.contains(r#"<div class="error">Error loading data: &lt;b&gt;boom&lt;/b&gt;</div>"#));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn table_markup_structure() {
        let view = RenderedView::Table {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]],
        };
        let html = render(&view);

        assert_eq!(html.matches("<th>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 4);
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>\n<tr><td>3</td><td>4</td></tr>"));
        assert_eq!(view.cells(), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn json_cells_are_escaped_in_markup_only() {
        let view = RenderedView::Table {
            headers: vec!["meta".into()],
            rows: vec![vec![r#"{"k":"v"}"#.into()]],
        };
        assert!(render(&view).contains("<td>{&quot;k&quot;:&quot;v&quot;}</td>"));
        assert_eq!(view.cells(), vec![r#"{"k":"v"}"#]);
    }

    #[test]
    fn text_of_each_view() {
        assert_eq!(RenderedView::Empty.text(), "No data available");
        assert_eq!(
            RenderedView::Error { message: "Network error".into() }.text(),
            "Error loading data: Network error"
        );
    }

    #[test]
    fn escape_html_all_specials() {
        assert_eq!(escape_html(r#"&<>"'"#), "&amp;&lt;&gt;&quot;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
