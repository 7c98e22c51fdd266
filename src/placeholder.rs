//! Placeholder patterns - `{{ name }}` substitution
//!
//! A placeholder is `{{`, optional spaces/tabs, the property name, optional
//! spaces/tabs, `}}`. Patterns are compiled once per property name and shared
//! through a process-wide cache.

use std::borrow::Cow;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Cache of compiled placeholder patterns, keyed by property name
pub struct PatternCache {
    cache: DashMap<String, Arc<Regex>>,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternCache {
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Compiled pattern for `property` (with caching)
    pub fn pattern(&self, property: &str) -> Result<Arc<Regex>, regex::Error> {
        if let Some(cached) = self.cache.get(property) {
            return Ok(Arc::clone(&cached));
        }

        let re = Arc::new(Regex::new(&pattern_source(property))?);
        self.cache.insert(property.to_string(), Arc::clone(&re));
        Ok(re)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Global pattern cache instance
pub static PATTERNS: Lazy<PatternCache> = Lazy::new(PatternCache::new);

/// Regex source for the placeholder of `property`
fn pattern_source(property: &str) -> String {
    format!(r"\{{\{{[ \t]*{}[ \t]*\}}\}}", regex::escape(property))
}

/// Replace every placeholder matched by `pattern` with `value`
///
/// `value` is inserted literally (no `$` group expansion).
/// Returns Cow::Borrowed when the template has no placeholder.
pub fn substitute<'a>(template: &'a str, pattern: &Regex, value: &str) -> Cow<'a, str> {
    pattern.replace_all(template, NoExpand(value))
}

/// Check whether `template` references `property` at least once
pub fn references(template: &str, property: &str) -> bool {
    PATTERNS
        .pattern(property)
        .map(|re| re.is_match(template))
        .unwrap_or(false)
}
