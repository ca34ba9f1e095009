//! In-memory graph backed by an oxigraph [`Dataset`].
//!
//! Interior mutability keeps the accessor shareable behind an `Rc` while the
//! in-memory transport applies updates to it. Reads return owned quads, so no
//! borrow outlives a call. Lookups go through the dataset's indexes; matches
//! come back in insertion order, which is the order a Turtle file declares
//! them in.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{Dataset, GraphNameRef, NamedNode, NamedNodeRef, Quad, QuadRef, Term, TermRef};

use crate::error::{GraphError, GraphResult};

use super::GraphAccessor;

/// A mutable quad store living entirely in memory.
#[derive(Default)]
pub struct MemoryGraph {
    dataset: RefCell<Dataset>,
    /// Insertion sequence number of every stored quad.
    sequence: RefCell<HashMap<Quad, u64>>,
    next: Cell<u64>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement. Returns `false` if it was already present.
    pub fn insert(&self, quad: &Quad) -> bool {
        let added = self.dataset.borrow_mut().insert(quad);
        if added {
            let n = self.next.get();
            self.next.set(n + 1);
            self.sequence.borrow_mut().insert(quad.clone(), n);
        }
        added
    }

    /// Remove a statement. Returns `false` if it was not present.
    pub fn remove(&self, quad: &Quad) -> bool {
        let removed = self.dataset.borrow_mut().remove(quad);
        if removed {
            self.sequence.borrow_mut().remove(quad);
        }
        removed
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.dataset.borrow().contains(quad)
    }

    pub fn len(&self) -> usize {
        self.dataset.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.borrow().is_empty()
    }

    /// Snapshot of every statement.
    pub fn quads(&self) -> Vec<Quad> {
        self.statements_matching(None, None, None, None)
    }

    fn in_insertion_order(&self, quads: Vec<Quad>) -> Vec<Quad> {
        let sequence = self.sequence.borrow();
        let mut numbered: Vec<(u64, Quad)> = quads
            .into_iter()
            .map(|q| (sequence.get(&q).copied().unwrap_or(u64::MAX), q))
            .collect();
        numbered.sort_by_key(|(n, _)| *n);
        numbered.into_iter().map(|(_, q)| q).collect()
    }

    /// Parse Turtle into the named graph `document`, resolving relative IRIs
    /// against it. Returns the number of statements read.
    pub fn load_turtle<R: Read>(&self, reader: R, document: &NamedNode) -> GraphResult<usize> {
        let parser = RdfParser::from_format(RdfFormat::Turtle)
            .with_base_iri(document.as_str())
            .map_err(|e| GraphError::InvalidIri {
                iri: document.as_str().to_string(),
                message: e.to_string(),
            })?;

        let mut count = 0;
        for quad in parser.for_reader(reader) {
            let quad = quad.map_err(|e| GraphError::Parse {
                source_name: document.as_str().to_string(),
                message: e.to_string(),
            })?;
            let quad = Quad::new(quad.subject, quad.predicate, quad.object, document.clone());
            self.insert(&quad);
            count += 1;
        }
        tracing::debug!(document = %document, count, "loaded turtle");
        Ok(count)
    }

    /// Load a Turtle file into the named graph `document`.
    pub fn load_file(&self, path: &Path, document: &NamedNode) -> GraphResult<usize> {
        let file = std::fs::File::open(path).map_err(|source| GraphError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load_turtle(std::io::BufReader::new(file), document)
    }
}

impl GraphAccessor for MemoryGraph {
    fn statements_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
        doc: Option<NamedNodeRef<'_>>,
    ) -> Vec<Quad> {
        let dataset = self.dataset.borrow();
        // Start from the most selective index the pattern allows.
        let candidates: Vec<QuadRef<'_>> = match (subject, object) {
            (Some(Term::NamedNode(s)), _) => dataset.quads_for_subject(s.as_ref()).collect(),
            (Some(Term::BlankNode(s)), _) => dataset.quads_for_subject(s.as_ref()).collect(),
            (Some(_), _) => return Vec::new(),
            (None, Some(o)) => dataset.quads_for_object(o.as_ref()).collect(),
            (None, None) => match (predicate, doc) {
                (Some(p), _) => dataset.quads_for_predicate(p).collect(),
                (None, Some(d)) => dataset.quads_for_graph_name(d).collect(),
                (None, None) => dataset.iter().collect(),
            },
        };
        let matches: Vec<Quad> = candidates
            .into_iter()
            .filter(|q| subject.is_none_or(|s| TermRef::from(q.subject) == s.as_ref()))
            .filter(|q| predicate.is_none_or(|p| q.predicate == p))
            .filter(|q| object.is_none_or(|o| q.object == o.as_ref()))
            .filter(|q| doc.is_none_or(|d| q.graph_name == GraphNameRef::NamedNode(d)))
            .map(|q| q.into_owned())
            .collect();
        drop(dataset);
        self.in_insertion_order(matches)
    }
}

impl std::fmt::Debug for MemoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGraph")
            .field("statements", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::statement;
    use oxigraph::model::vocab::rdfs;

    #[test]
    fn load_turtle_into_named_graph() {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/form.ttl");
        let ttl = r#"
            @prefix ui: <http://www.w3.org/ns/ui#> .
            <#form> a ui:Group ; ui:part <#title> .
            <#title> a ui:TextField .
        "#;
        let n = graph.load_turtle(ttl.as_bytes(), &doc).unwrap();
        assert_eq!(n, 3);

        let form = Term::NamedNode(NamedNode::new_unchecked("http://ex.org/form.ttl#form"));
        let parts = graph.each(
            Some(&form),
            Some(crate::vocab::ui::PART),
            None,
            Some(doc.as_ref()),
        );
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn bad_turtle_reports_parse_error() {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/bad.ttl");
        let err = graph.load_turtle("<#a> <#b> .".as_bytes(), &doc).unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
    }

    #[test]
    fn matches_follow_insertion_order() {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/o");
        graph
            .load_turtle(
                "<#f> <#case> <#z>, <#a>, <#m> .".as_bytes(),
                &doc,
            )
            .unwrap();
        let f = Term::NamedNode(NamedNode::new_unchecked("http://ex.org/o#f"));
        let case = NamedNode::new_unchecked("http://ex.org/o#case");
        let locals: Vec<String> = graph
            .each(Some(&f), Some(case.as_ref()), None, None)
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            locals,
            vec!["<http://ex.org/o#z>", "<http://ex.org/o#a>", "<http://ex.org/o#m>"]
        );
        graph.remove(&graph.quads()[0]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn every_index_keeps_insertion_order() {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/o");
        graph
            .load_turtle("<#z> <#p> <#o> . <#a> <#p> <#o> . <#m> <#q> <#o> .".as_bytes(), &doc)
            .unwrap();
        let node =
            |l: &str| Term::NamedNode(NamedNode::new_unchecked(format!("http://ex.org/o#{l}")));
        let p = NamedNode::new_unchecked("http://ex.org/o#p");

        let by_object = graph.each(None, None, Some(&node("o")), None);
        assert_eq!(by_object, vec![node("z"), node("a"), node("m")]);
        let by_predicate = graph.each(None, Some(p.as_ref()), None, None);
        assert_eq!(by_predicate, vec![node("z"), node("a")]);
        assert_eq!(graph.statements_matching(None, None, None, Some(doc.as_ref())).len(), 3);

        let first = graph.quads()[0].clone();
        assert!(graph.remove(&first));
        assert!(graph.insert(&first));
        let by_object = graph.each(None, None, Some(&node("o")), None);
        assert_eq!(by_object, vec![node("a"), node("m"), node("z")]);
    }

    #[test]
    fn literal_subject_matches_nothing() {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/o");
        graph.load_turtle("<#s> <#p> \"v\" .".as_bytes(), &doc).unwrap();
        let literal = Term::Literal(oxigraph::model::Literal::new_simple_literal("v"));
        assert!(graph.statements_matching(Some(&literal), None, None, None).is_empty());
    }

    #[test]
    fn document_filter_separates_graphs() {
        let graph = MemoryGraph::new();
        let a = NamedNode::new_unchecked("http://ex.org/a");
        let b = NamedNode::new_unchecked("http://ex.org/b");
        let s = Term::NamedNode(NamedNode::new_unchecked("http://ex.org/a#s"));
        let label = Term::Literal(oxigraph::model::Literal::new_simple_literal("x"));
        graph.insert(&statement(&s, rdfs::LABEL, label.clone(), a.as_ref()).unwrap());

        assert!(graph.holds(&s, rdfs::LABEL, &label, Some(a.as_ref())));
        assert!(!graph.holds(&s, rdfs::LABEL, &label, Some(b.as_ref())));
        assert!(graph.holds(&s, rdfs::LABEL, &label, None));
    }
}
