//! Engine configuration.

use gridkit_model::{KeyFn, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Per-view grouping behavior
#[derive(Clone, Default)]
pub struct GroupingConfig {
    key_fns: HashMap<String, KeyFn>,
    show_summary: bool,
    start_collapsed: bool,
}

impl GroupingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an explicit group key function for a field.
    ///
    /// Used to repair degenerate keys when the source grouped on a complex
    /// field: the sync pass asks the source to re-group with this function
    /// instead of committing indistinguishable keys.
    pub fn with_key_fn(
        mut self,
        field: impl Into<String>,
        f: impl Fn(&Value) -> String + 'static,
    ) -> Self {
        self.key_fns.insert(field.into(), Rc::new(f));
        self
    }

    /// Enable synthetic last-member updates for summary rows
    pub fn with_summary(mut self, show_summary: bool) -> Self {
        self.show_summary = show_summary;
        self
    }

    /// Collapse groups on first observation instead of expanding them
    pub fn with_start_collapsed(mut self, start_collapsed: bool) -> Self {
        self.start_collapsed = start_collapsed;
        self
    }

    pub fn key_fn(&self, field: &str) -> Option<KeyFn> {
        self.key_fns.get(field).cloned()
    }

    pub fn show_summary(&self) -> bool {
        self.show_summary
    }

    pub fn start_collapsed(&self) -> bool {
        self.start_collapsed
    }
}

impl fmt::Debug for GroupingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupingConfig")
            .field("key_fns", &self.key_fns.keys().collect::<Vec<_>>())
            .field("show_summary", &self.show_summary)
            .field("start_collapsed", &self.start_collapsed)
            .finish()
    }
}
