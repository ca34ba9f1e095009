//! The rendering engine: schema nodes in, live widgets out.
//!
//! Every renderer has the same shape:
//!
//! ```text
//! (ctx, container?, guard, subject, form, doc, done) -> Widget
//! ```
//!
//! `ctx` carries the collaborators (graph, update coordinator, registry,
//! catalog, search provider, minter, configuration), so nothing is ambient.
//! `done` is told about every data change the field makes, with
//! `Ok(())` or the [`FormError`] that stopped it. Renderers never fail: a
//! problem with one field shows up as an inline error block where the field
//! would have been.
//!
//! - [`registry`]: field kinds and dispatch
//! - [`guard`]: recursion guard
//! - [`group`], [`options`], [`multiple`], [`choice`]: structural fields
//! - [`select`]: select builder, category and classifier selectors
//! - [`checkbox`]: boolean and tri-state fields
//! - [`text`]: leaf text fields, comments and headings
//! - [`autocomplete`]: search-backed field
//! - [`create`]: creating new entities through their creation form

pub mod autocomplete;
pub mod checkbox;
pub mod choice;
pub mod create;
pub mod group;
pub mod guard;
pub mod multiple;
pub mod options;
pub mod params;
pub mod registry;
pub mod select;
pub mod text;

use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use futures::task::LocalSpawn;
use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{NamedNode, NamedNodeRef, Term};

use crate::catalog::{Catalog, GraphCatalog};
use crate::config::FormsConfig;
use crate::error::{FieldOutcome, FormError};
use crate::graph::hierarchy::{bottom_types, types_of};
use crate::graph::{GraphAccessor, MemoryGraph, quad_document};
use crate::label::{capitalize, label};
use crate::mint::Minter;
use crate::search::{GraphSearch, SearchProvider};
use crate::update::{MemoryTransport, UpdateCoordinator, UpdateTransport};
use crate::vocab::{generic, ui};
use crate::widget::{Element, ElementKind, Widget};

pub use guard::RecursionGuard;
pub use registry::{FieldKind, FieldRegistry, render_field};

/// Completion callback handed to every renderer.
pub type Completion = Rc<dyn Fn(FieldOutcome)>;

/// A completion that ignores the outcome.
pub fn ignore() -> Completion {
    Rc::new(|_| {})
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Collaborators threaded through every render call.
#[derive(Clone)]
pub struct FormContext {
    pub graph: Rc<dyn GraphAccessor>,
    pub updater: UpdateCoordinator,
    pub registry: Rc<FieldRegistry>,
    pub catalog: Rc<dyn Catalog>,
    pub search: Rc<dyn SearchProvider>,
    pub minter: Rc<Minter>,
    pub config: Rc<FormsConfig>,
}

impl FormContext {
    /// A context with the default registry, a graph-derived catalog and the
    /// built-in graph search.
    pub fn new(
        graph: Rc<dyn GraphAccessor>,
        transport: Rc<dyn UpdateTransport>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let config = FormsConfig::default();
        Self {
            updater: UpdateCoordinator::new(transport, spawner),
            registry: Rc::new(FieldRegistry::with_defaults()),
            catalog: Rc::new(GraphCatalog::new(graph.clone())),
            search: Rc::new(GraphSearch::new(graph.clone(), config.search_result_limit)),
            minter: Rc::new(Minter::new()),
            config: Rc::new(config),
            graph,
        }
    }

    /// A context over an in-memory graph, with the transport that writes to it.
    pub fn in_memory(
        graph: Rc<MemoryGraph>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> (Self, Rc<MemoryTransport>) {
        let transport = Rc::new(MemoryTransport::new(graph.clone()));
        (Self::new(graph, transport.clone(), spawner), transport)
    }

    /// Replace the configuration. The built-in search provider picks up the
    /// new result limit, so call this before [`with_search`](Self::with_search).
    pub fn with_config(mut self, config: FormsConfig) -> Self {
        self.search = Rc::new(GraphSearch::new(
            self.graph.clone(),
            config.search_result_limit,
        ));
        self.config = Rc::new(config);
        self
    }

    pub fn with_registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = Rc::new(registry);
        self
    }

    pub fn with_catalog(mut self, catalog: Rc<dyn Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_search(mut self, search: Rc<dyn SearchProvider>) -> Self {
        self.search = search;
        self
    }

    pub fn with_minter(mut self, minter: Minter) -> Self {
        self.minter = Rc::new(minter);
        self
    }

    pub fn editable(&self, doc: &NamedNode) -> bool {
        self.updater.editable(doc)
    }

    /// A fresh identifier in `doc`.
    pub fn mint(&self, doc: &NamedNode) -> NamedNode {
        self.minter.mint(&*self.graph, doc)
    }
}

impl std::fmt::Debug for FormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Entry points and shared helpers
// ---------------------------------------------------------------------------

/// Render `form` about `subject` into `container`.
pub fn append_form(
    ctx: &FormContext,
    container: Option<&Widget>,
    guard: &RecursionGuard,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    render_field(ctx, container, guard, subject, form, doc, done)
}

/// Show `err` where a field would have been.
pub fn inline_error(container: Option<&Widget>, err: FormError) -> Widget {
    tracing::warn!(error = %err, "field rendered as error");
    let block = Element::error_block(err.to_string());
    if let Some(c) = container {
        c.append(&block);
    }
    block
}

/// The `ui:property` of a field, if it names a predicate.
pub fn field_property(ctx: &FormContext, form: &Term) -> Option<NamedNode> {
    match ctx.graph.value(form, ui::PROPERTY)? {
        Term::NamedNode(n) => Some(n),
        _ => None,
    }
}

/// The document a field writes to: the one already holding a value for
/// `(subject, predicate)` if that is editable, else `default`.
pub fn field_store(
    ctx: &FormContext,
    subject: &Term,
    predicate: NamedNodeRef<'_>,
    default: &NamedNode,
) -> NamedNode {
    ctx.graph
        .statements_matching(Some(subject), Some(predicate), None, None)
        .first()
        .and_then(quad_document)
        .filter(|d| ctx.editable(d))
        .unwrap_or_else(|| default.clone())
}

/// Label text for a field: its `ui:label`, else the property's label.
pub fn field_label_text(ctx: &FormContext, property: &NamedNode, form: &Term) -> String {
    ctx.graph
        .string_value(form, ui::LABEL)
        .unwrap_or_else(|| capitalize(&label(&*ctx.graph, &Term::NamedNode(property.clone()))))
}

/// Label element for a field, linking to the property.
pub fn field_label(ctx: &FormContext, property: &NamedNode, form: &Term) -> Widget {
    let el = Element::with_text(ElementKind::Label, field_label_text(ctx, property, form));
    el.set_attr("href", property.as_str());
    el.set_attr("style", "color: #3B5998; text-decoration: none;");
    el
}

/// Whether a field should be hidden: `ui:suppressEmptyUneditable` applies to
/// empty fields in read-only documents.
pub fn suppress_empty(ctx: &FormContext, form: &Term, doc: &NamedNode, empty: bool) -> bool {
    empty && !ctx.editable(doc) && ctx.graph.flag(form, ui::SUPPRESS_EMPTY_UNEDITABLE)
}

/// Order fields by `ui:sequence`; unsequenced items sort last, ties keep
/// input order.
pub fn sort_by_sequence<G: GraphAccessor + ?Sized>(
    graph: &G,
    items: Vec<Term>,
    default_weight: i64,
) -> Vec<Term> {
    let mut keyed: Vec<(i64, Term)> = items
        .into_iter()
        .map(|t| (graph.integer(&t, ui::SEQUENCE).unwrap_or(default_weight), t))
        .collect();
    keyed.sort_by_key(|(k, _)| *k);
    keyed.into_iter().map(|(_, t)| t).collect()
}

/// Order terms by lowercased label.
pub fn sort_by_label<G: GraphAccessor + ?Sized>(graph: &G, items: Vec<Term>) -> Vec<Term> {
    let mut keyed: Vec<(String, Term)> = items
        .into_iter()
        .map(|t| (label(graph, &t).to_lowercase(), t))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, t)| t).collect()
}

/// Values of `predicate` on `class` or, failing that, on the nearest
/// superclass that has some. Breadth-first up the hierarchy.
pub fn find_closest<G: GraphAccessor + ?Sized>(
    graph: &G,
    class: &NamedNode,
    predicate: NamedNodeRef<'_>,
) -> Vec<Term> {
    let mut agenda: VecDeque<Term> = VecDeque::from([Term::NamedNode(class.clone())]);
    let mut seen: HashSet<Term> = HashSet::new();
    while let Some(c) = agenda.pop_front() {
        if !seen.insert(c.clone()) {
            continue;
        }
        let found = graph.values(&c, predicate);
        if !found.is_empty() {
            return found;
        }
        agenda.extend(graph.values(&c, rdfs::SUB_CLASS_OF));
    }
    Vec::new()
}

/// Creation and annotation forms that apply to `subject`, found from its most
/// specific types.
pub fn forms_for<G: GraphAccessor + ?Sized>(graph: &G, subject: &Term) -> Vec<Term> {
    let types = types_of(graph, subject);
    let mut out: Vec<Term> = Vec::new();
    for bottom in bottom_types(graph, &types) {
        tracing::debug!(subject = %subject, class = %bottom, "looking for forms");
        for predicate in [ui::CREATION_FORM, ui::ANNOTATION_FORM] {
            for form in find_closest(graph, &bottom, predicate) {
                if !out.contains(&form) {
                    out.push(form);
                }
            }
        }
    }
    out
}

/// Properties worth offering for instances of `class`: those used by its first
/// `member_limit` members, those declared with it as range, and a few generic
/// ones.
pub fn properties_for_class<G: GraphAccessor + ?Sized>(
    graph: &G,
    class: &NamedNode,
    member_limit: usize,
) -> Vec<NamedNode> {
    let class_term = Term::NamedNode(class.clone());
    let mut out: Vec<NamedNode> = Vec::new();
    let mut push = |p: NamedNode| {
        if !out.contains(&p) {
            out.push(p);
        }
    };

    let members = graph.each(None, Some(rdf::TYPE), Some(&class_term), None);
    for member in members.iter().take(member_limit) {
        for q in graph.statements_matching(Some(member), None, None, None) {
            push(q.predicate);
        }
    }
    for p in graph.each(None, Some(rdfs::RANGE), Some(&class_term), None) {
        if let Term::NamedNode(n) = p {
            push(n);
        }
    }
    for p in [
        rdfs::COMMENT,
        generic::DC_TITLE,
        generic::FOAF_NAME,
        generic::FOAF_HOMEPAGE,
    ] {
        push(p.into_owned());
    }
    out
}
