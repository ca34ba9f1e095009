//! Recursion guard for self-referential schemas.

use oxigraph::model::Term;

use crate::graph::term_key;

/// The `(subject, schema node)` pairs already being rendered above the current
/// field.
///
/// The set is persistent: [`with`](Self::with) returns a new guard and leaves
/// the receiver untouched, so siblings never see each other's entries while a
/// nested render still sees all of its ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecursionGuard {
    visited: im::HashSet<String>,
}

impl RecursionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The guard key for rendering `form` about `subject`.
    pub fn key(subject: &Term, form: &Term) -> String {
        format!("{}|{}", term_key(subject), term_key(form))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// A guard that additionally holds `key`.
    pub fn with(&self, key: String) -> Self {
        Self {
            visited: self.visited.update(key),
        }
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
