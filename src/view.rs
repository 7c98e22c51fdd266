//! View handles
//!
//! A handle is a reference to content owned by the host: reading and
//! replacing its text goes through `&self`, so several parties (a binder and
//! the code that displays the view) can hold the same handle.

use std::sync::Arc;

use parking_lot::RwLock;

/// Textual content that a component renders into
pub trait ViewHandle {
    /// Current content
    fn content(&self) -> String;

    /// Replace the content wholesale
    fn set_content(&self, content: String);
}

/// Shared in-memory view (cloning shares the same content)
#[derive(Clone, Default)]
pub struct TextView {
    content: Arc<RwLock<String>>,
}

impl TextView {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Arc::new(RwLock::new(content.into())),
        }
    }
}

impl ViewHandle for TextView {
    fn content(&self) -> String {
        self.content.read().clone()
    }

    fn set_content(&self, content: String) {
        *self.content.write() = content;
    }
}

impl<T: ViewHandle + ?Sized> ViewHandle for &T {
    fn content(&self) -> String {
        (**self).content()
    }

    fn set_content(&self, content: String) {
        (**self).set_content(content)
    }
}

impl std::fmt::Debug for TextView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TextView").field(&*self.content.read()).finish()
    }
}
