//! Graph access: the read side of the store the forms edit.
//!
//! The store is an external collaborator; the engine only sees it through
//! [`GraphAccessor`]. Statements are oxigraph [`Quad`]s whose named graph is
//! the Data Document the statement lives in.
//!
//! - [`memory`]: an in-memory accessor over an oxigraph `Dataset`
//! - [`hierarchy`]: type and subclass queries
//! - [`collection`]: RDF collections (rdf:first / rdf:rest chains)

pub mod collection;
pub mod hierarchy;
pub mod memory;

use oxigraph::model::vocab::xsd;
use oxigraph::model::{GraphName, Literal, NamedNode, NamedNodeRef, Quad, Term};

pub use memory::MemoryGraph;

/// Pattern-matching queries over subject/predicate/object/document statements.
///
/// Only [`statements_matching`](GraphAccessor::statements_matching) is required;
/// the single- and multi-value lookups are derived from it.
pub trait GraphAccessor {
    /// All statements matching the pattern; `None` is a wildcard.
    fn statements_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
        doc: Option<NamedNodeRef<'_>>,
    ) -> Vec<Quad>;

    /// The term in the first wildcard position of the first matching statement.
    fn any(
        &self,
        subject: Option<&Term>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
        doc: Option<NamedNodeRef<'_>>,
    ) -> Option<Term> {
        let quad = self
            .statements_matching(subject, predicate, object, doc)
            .into_iter()
            .next()?;
        Some(wildcard_term(quad, subject.is_none(), predicate.is_none()))
    }

    /// The terms in the first wildcard position of every matching statement,
    /// without duplicates, in store order.
    fn each(
        &self,
        subject: Option<&Term>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
        doc: Option<NamedNodeRef<'_>>,
    ) -> Vec<Term> {
        let mut out: Vec<Term> = Vec::new();
        for quad in self.statements_matching(subject, predicate, object, doc) {
            let term = wildcard_term(quad, subject.is_none(), predicate.is_none());
            if !out.contains(&term) {
                out.push(term);
            }
        }
        out
    }

    /// Whether the exact statement is present.
    fn holds(
        &self,
        subject: &Term,
        predicate: NamedNodeRef<'_>,
        object: &Term,
        doc: Option<NamedNodeRef<'_>>,
    ) -> bool {
        !self
            .statements_matching(Some(subject), Some(predicate), Some(object), doc)
            .is_empty()
    }

    /// Shorthand for `any(subject, predicate, ?, any document)`.
    fn value(&self, subject: &Term, predicate: NamedNodeRef<'_>) -> Option<Term> {
        self.any(Some(subject), Some(predicate), None, None)
    }

    /// Shorthand for `each(subject, predicate, ?, any document)`.
    fn values(&self, subject: &Term, predicate: NamedNodeRef<'_>) -> Vec<Term> {
        self.each(Some(subject), Some(predicate), None, None)
    }

    /// Lexical value of the first object: literal text or IRI.
    fn string_value(&self, subject: &Term, predicate: NamedNodeRef<'_>) -> Option<String> {
        self.value(subject, predicate).map(|t| term_value(&t))
    }

    /// A boolean schema flag; absent means `false`.
    fn flag(&self, subject: &Term, predicate: NamedNodeRef<'_>) -> bool {
        self.value(subject, predicate)
            .is_some_and(|t| term_truthy(&t))
    }

    fn integer(&self, subject: &Term, predicate: NamedNodeRef<'_>) -> Option<i64> {
        self.string_value(subject, predicate)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Elements of the RDF collection starting at `head`, or `None` if `head`
    /// is not a collection.
    fn collection_elements(&self, head: &Term, doc: Option<NamedNodeRef<'_>>) -> Option<Vec<Term>> {
        collection::elements(self, head, doc)
    }
}

impl<G: GraphAccessor + ?Sized> GraphAccessor for std::rc::Rc<G> {
    fn statements_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<&Term>,
        doc: Option<NamedNodeRef<'_>>,
    ) -> Vec<Quad> {
        (**self).statements_matching(subject, predicate, object, doc)
    }
}

fn wildcard_term(quad: Quad, subject_open: bool, predicate_open: bool) -> Term {
    if subject_open {
        quad.subject.into()
    } else if predicate_open {
        Term::NamedNode(quad.predicate)
    } else {
        quad.object
    }
}

/// Build a statement in `doc`. Literals cannot be subjects, so those yield `None`.
pub fn statement(
    subject: &Term,
    predicate: NamedNodeRef<'_>,
    object: impl Into<Term>,
    doc: NamedNodeRef<'_>,
) -> Option<Quad> {
    let object = object.into();
    match subject {
        Term::NamedNode(n) => Some(Quad::new(
            n.clone(),
            predicate.into_owned(),
            object,
            doc.into_owned(),
        )),
        Term::BlankNode(b) => Some(Quad::new(
            b.clone(),
            predicate.into_owned(),
            object,
            doc.into_owned(),
        )),
        _ => None,
    }
}

/// The subject of a statement as a plain term.
pub fn quad_subject(quad: &Quad) -> Term {
    quad.subject.clone().into()
}

/// The Data Document a statement lives in.
pub fn quad_document(quad: &Quad) -> Option<NamedNode> {
    match &quad.graph_name {
        GraphName::NamedNode(n) => Some(n.clone()),
        _ => None,
    }
}

/// The document part of a named node (everything before `#`).
pub fn document_of(term: &Term) -> Option<NamedNode> {
    match term {
        Term::NamedNode(n) => {
            let iri = n.as_str();
            let base = iri.split('#').next().unwrap_or(iri);
            Some(NamedNode::new_unchecked(base))
        }
        _ => None,
    }
}

/// Lexical value of a term: literal text, IRI, or blank node id.
pub fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => n.as_str().to_string(),
        Term::BlankNode(b) => b.as_str().to_string(),
        Term::Literal(l) => l.value().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

/// Interpret a flag value the way the form language writes booleans.
pub fn term_truthy(term: &Term) -> bool {
    matches!(term_value(term).trim(), "true" | "1")
}

/// The canonical `xsd:boolean` literal for `value`.
pub fn boolean_term(value: bool) -> Term {
    Term::Literal(Literal::new_typed_literal(
        if value { "true" } else { "false" },
        xsd::BOOLEAN,
    ))
}

/// Stable key for a term, used for recursion guards and sorting.
pub fn term_key(term: &Term) -> String {
    term.to_string()
}
