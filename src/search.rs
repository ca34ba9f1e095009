//! Search providers backing autocomplete fields.
//!
//! The autocomplete field only knows how to describe a search (a
//! [`SearchRequest`]) and what to do with a pick. Building the search UI and
//! finding candidates is the provider's job. [`GraphSearch`] is the built-in
//! provider: it matches labelled instances in the local graph.

use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture};
use oxigraph::model::{NamedNode, NamedNodeRef, Term};

use crate::error::FormError;
use crate::graph::GraphAccessor;
use crate::graph::hierarchy::members_of;
use crate::label::label;
use crate::widget::{Element, ElementKind, OptionValue, SelectOption, Widget};

/// Where and how to search, as described by a `ui:dataSource` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    /// Display name of the data source.
    pub label: Option<String>,
    pub logo: Option<String>,
    pub target_class: Option<NamedNode>,
    /// SPARQL endpoint, when the source is queried that way.
    pub endpoint: Option<String>,
    pub search_by_name_query: Option<String>,
    pub institute_details_query: Option<String>,
    /// Direct name-lookup URI template, when there is no endpoint.
    pub search_by_name_uri: Option<String>,
}

/// Everything a provider needs to build one autocomplete control.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub subject: NamedNode,
    pub params: QueryParameters,
    /// Predicate holding the display name of candidates.
    pub label_property: NamedNode,
    pub current_object: Option<Term>,
    pub current_name: Option<String>,
    pub editable: bool,
    pub size: Option<i64>,
}

/// Called with the picked object and its name.
pub type PickHandler = Rc<dyn Fn(Term, String)>;

pub trait SearchProvider {
    /// Build the search control. May complete after the form has painted.
    fn build_control(
        &self,
        request: SearchRequest,
        on_pick: PickHandler,
    ) -> LocalBoxFuture<'static, Result<Widget, FormError>>;
}

/// Searches labelled instances of the target class in a local graph.
pub struct GraphSearch {
    graph: Rc<dyn GraphAccessor>,
    limit: usize,
}

impl GraphSearch {
    pub fn new(graph: Rc<dyn GraphAccessor>, limit: usize) -> Self {
        Self { graph, limit }
    }

    /// Candidates whose name contains `text`, case-insensitively, sorted by name.
    pub fn search(
        &self,
        text: &str,
        target_class: Option<&NamedNode>,
        label_property: NamedNodeRef<'_>,
    ) -> Vec<(Term, String)> {
        search_graph(&*self.graph, text, target_class, label_property, self.limit)
    }
}

fn search_graph(
    graph: &dyn GraphAccessor,
    text: &str,
    target_class: Option<&NamedNode>,
    label_property: NamedNodeRef<'_>,
    limit: usize,
) -> Vec<(Term, String)> {
    let needle = text.trim().to_lowercase();
    let candidates = match target_class {
        Some(class) => members_of(graph, class),
        None => graph.each(None, Some(label_property), None, None),
    };
    let mut hits: Vec<(Term, String)> = candidates
        .into_iter()
        .map(|c| {
            let name = graph
                .string_value(&c, label_property)
                .unwrap_or_else(|| label(graph, &c));
            (c, name)
        })
        .filter(|(_, name)| name.to_lowercase().contains(&needle))
        .collect();
    hits.sort_by(|a, b| a.1.cmp(&b.1));
    hits.truncate(limit);
    hits
}

impl SearchProvider for GraphSearch {
    fn build_control(
        &self,
        request: SearchRequest,
        on_pick: PickHandler,
    ) -> LocalBoxFuture<'static, Result<Widget, FormError>> {
        let control = Element::new(ElementKind::Container);
        let current = request
            .current_name
            .clone()
            .or_else(|| request.current_object.as_ref().map(|o| label(&*self.graph, o)))
            .unwrap_or_default();
        control.append(&Element::with_text(ElementKind::Text, current));

        if request.editable {
            let input = Element::new(ElementKind::TextInput);
            if let Some(size) = request.size {
                input.set_attr("size", size.to_string());
            }
            let results = Element::new(ElementKind::Select);
            control.append(&input);
            control.append(&results);

            let graph = self.graph.clone();
            let limit = self.limit;
            let target = request.params.target_class.clone();
            let label_property = request.label_property.clone();
            let input_ref: Weak<Element> = Rc::downgrade(&input);
            let results_ref = results.clone();
            input.on_activate(Rc::new(move || {
                let Some(input) = input_ref.upgrade() else { return };
                let hits = search_graph(
                    &*graph,
                    &input.text(),
                    target.as_ref(),
                    label_property.as_ref(),
                    limit,
                );
                tracing::debug!(query = %input.text(), hits = hits.len(), "autocomplete search");
                let mut options = vec![SelectOption {
                    label: format!("{} matches", hits.len()),
                    value: OptionValue::Prompt,
                    selected: true,
                }];
                options.extend(hits.into_iter().map(|(term, name)| SelectOption {
                    label: name,
                    value: OptionValue::Term(term),
                    selected: false,
                }));
                results_ref.set_options(options);
            }));

            let select_ref: Weak<Element> = Rc::downgrade(&results);
            results.on_activate(Rc::new(move || {
                let Some(select) = select_ref.upgrade() else { return };
                let picked = select
                    .options()
                    .into_iter()
                    .find(|o| o.selected && o.term().is_some());
                if let Some(SelectOption {
                    label,
                    value: OptionValue::Term(term),
                    ..
                }) = picked
                {
                    on_pick(term, label);
                }
            }));
        }
        futures::future::ready(Ok(control)).boxed_local()
    }
}
