//! Human-readable labels for graph terms.

use oxigraph::model::vocab::rdfs;
use oxigraph::model::{NamedNodeRef, Term};

use crate::graph::{GraphAccessor, term_value};
use crate::vocab::{generic, schema, ui};

const LABEL_PREDICATES: [NamedNodeRef<'static>; 5] = [
    ui::LABEL,
    rdfs::LABEL,
    schema::NAME,
    generic::FOAF_NAME,
    generic::DC_TITLE,
];

/// The last segment of an IRI, after `#` or the final `/`.
pub fn local_name(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches(['/', '#']);
    match trimmed.rfind(['#', '/']) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

/// Split a camelCase or snake_case identifier into lowercase words.
pub fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || c == '-' {
            out.push(' ');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Upper-case the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label for `term`: an explicit label in the graph, else the humanized local
/// name, else the lexical value.
pub fn label<G: GraphAccessor + ?Sized>(graph: &G, term: &Term) -> String {
    for predicate in LABEL_PREDICATES {
        if let Some(Term::Literal(l)) = graph.value(term, predicate) {
            return l.value().to_string();
        }
    }
    match term {
        Term::NamedNode(n) => {
            let local = local_name(n.as_str());
            if local.is_empty() {
                n.as_str().to_string()
            } else {
                humanize(local)
            }
        }
        other => term_value(other),
    }
}

/// Label with the vocabulary it comes from, for long mixed lists.
pub fn label_with_ontology<G: GraphAccessor + ?Sized>(graph: &G, term: &Term) -> String {
    let base = capitalize(&label(graph, term));
    let Term::NamedNode(n) = term else {
        return base;
    };
    let iri = n.as_str();
    let namespace = &iri[..iri.len() - local_name(iri).len()];
    let ontology = local_name(namespace.trim_end_matches(['#', '/']));
    if ontology.is_empty() {
        base
    } else {
        format!("{base} ({ontology})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{MemoryGraph, statement};
    use oxigraph::model::{Literal, NamedNode};

    fn node(iri: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(iri))
    }

    #[test]
    fn humanized_local_names() {
        assert_eq!(local_name("http://ex.org/ns#dateOfBirth"), "dateOfBirth");
        assert_eq!(local_name("http://ex.org/people/"), "people");
        assert_eq!(humanize("dateOfBirth"), "date of birth");
        assert_eq!(humanize("phone_number"), "phone number");
        assert_eq!(capitalize("date of birth"), "Date of birth");
    }

    #[test]
    fn explicit_labels_win() {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/o");
        let p = node("http://ex.org/o#dueDate");
        assert_eq!(label(&graph, &p), "due date");
        graph.insert(
            &statement(&p, rdfs::LABEL, Literal::new_simple_literal("Deadline"), doc.as_ref())
                .unwrap(),
        );
        assert_eq!(label(&graph, &p), "Deadline");
    }

    #[test]
    fn ontology_suffix() {
        let graph = MemoryGraph::new();
        let q = node("http://purl.org/dc/terms#title");
        assert_eq!(label_with_ontology(&graph, &q), "Title (terms)");
    }
}
