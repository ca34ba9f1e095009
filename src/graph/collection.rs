//! RDF collections: ordered lists stored as `rdf:first` / `rdf:rest` chains.

use std::collections::HashSet;

use oxigraph::model::vocab::rdf;
use oxigraph::model::{BlankNode, NamedNodeRef, Quad, Term};

use super::{GraphAccessor, statement};

fn nil() -> Term {
    Term::NamedNode(rdf::NIL.into_owned())
}

/// Elements of the collection at `head`. `rdf:nil` is the empty list; a node
/// without `rdf:first` is not a collection. A chain that loops back on itself
/// stops at the repeated cell.
pub fn elements<G: GraphAccessor + ?Sized>(
    graph: &G,
    head: &Term,
    doc: Option<NamedNodeRef<'_>>,
) -> Option<Vec<Term>> {
    if *head == nil() {
        return Some(Vec::new());
    }
    graph.any(Some(head), Some(rdf::FIRST), None, doc)?;

    let mut out = Vec::new();
    let mut seen: HashSet<Term> = HashSet::new();
    let mut cell = head.clone();
    while cell != nil() && seen.insert(cell.clone()) {
        let Some(first) = graph.any(Some(&cell), Some(rdf::FIRST), None, doc) else {
            tracing::warn!(cell = %cell, "collection cell without rdf:first, truncating");
            break;
        };
        out.push(first);
        match graph.any(Some(&cell), Some(rdf::REST), None, doc) {
            Some(rest) => cell = rest,
            None => break,
        }
    }
    Some(out)
}

/// Every `rdf:first` / `rdf:rest` statement making up the collection at `head`.
pub fn chain_statements<G: GraphAccessor + ?Sized>(
    graph: &G,
    head: &Term,
    doc: Option<NamedNodeRef<'_>>,
) -> Vec<Quad> {
    let mut out = Vec::new();
    let mut seen: HashSet<Term> = HashSet::new();
    let mut cell = head.clone();
    while cell != nil() && seen.insert(cell.clone()) {
        out.extend(graph.statements_matching(Some(&cell), Some(rdf::FIRST), None, doc));
        let rest = graph.statements_matching(Some(&cell), Some(rdf::REST), None, doc);
        let next = rest.first().map(|q| q.object.clone());
        out.extend(rest);
        match next {
            Some(next) => cell = next,
            None => break,
        }
    }
    out
}

/// Fresh statements encoding `items` as a collection in `doc`. Returns the
/// head term (`rdf:nil` when empty) and the chain statements.
pub fn build(items: &[Term], doc: NamedNodeRef<'_>) -> (Term, Vec<Quad>) {
    if items.is_empty() {
        return (nil(), Vec::new());
    }
    let cells: Vec<Term> = items
        .iter()
        .map(|_| Term::BlankNode(BlankNode::default()))
        .collect();
    let mut quads = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.iter().enumerate() {
        let rest = cells.get(i + 1).cloned().unwrap_or_else(nil);
        quads.extend(statement(&cells[i], rdf::FIRST, item.clone(), doc));
        quads.extend(statement(&cells[i], rdf::REST, rest, doc));
    }
    (cells[0].clone(), quads)
}
