//! Identifiers for newly created entities.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use oxigraph::model::{NamedNode, Term};

use crate::graph::GraphAccessor;

type Clock = Box<dyn Fn() -> u128>;

/// Mints `<doc>#id<millis>` identifiers.
///
/// The timestamp part never repeats within one minter: a second mint in the
/// same millisecond takes the next number. Identifiers already used anywhere in
/// the graph are skipped.
pub struct Minter {
    last: Cell<u128>,
    clock: Clock,
}

fn system_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

impl Default for Minter {
    fn default() -> Self {
        Self::new()
    }
}

impl Minter {
    pub fn new() -> Self {
        Self::with_clock(system_millis)
    }

    /// A minter reading time from `clock` (milliseconds).
    pub fn with_clock(clock: impl Fn() -> u128 + 'static) -> Self {
        Self {
            last: Cell::new(0),
            clock: Box::new(clock),
        }
    }

    pub fn mint<G: GraphAccessor + ?Sized>(&self, graph: &G, document: &NamedNode) -> NamedNode {
        loop {
            let stamp = (self.clock)().max(self.last.get() + 1);
            self.last.set(stamp);
            let node = NamedNode::new_unchecked(format!("{}#id{stamp}", document.as_str()));
            let term = Term::NamedNode(node.clone());
            let used = !graph
                .statements_matching(Some(&term), None, None, None)
                .is_empty()
                || !graph
                    .statements_matching(None, None, Some(&term), None)
                    .is_empty();
            if !used {
                tracing::debug!(node = %node, "minted identifier");
                return node;
            }
        }
    }
}

impl std::fmt::Debug for Minter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Minter").field("last", &self.last.get()).finish()
    }
}
