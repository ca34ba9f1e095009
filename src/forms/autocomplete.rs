//! Autocomplete fields: pick the object of a property by searching a data
//! source by name.
//!
//! The search control itself comes from the context's [`SearchProvider`]
//! and may arrive after the rest of the form has painted.
//!
//! [`SearchProvider`]: crate::search::SearchProvider

use std::rc::Rc;

use oxigraph::model::{NamedNode, Quad, Term};

use crate::error::FormError;
use crate::graph::{GraphAccessor, statement, term_value};
use crate::search::{PickHandler, QueryParameters, SearchRequest};
use crate::vocab::{schema, ui};
use crate::widget::{Element, ElementKind, Widget};

use super::{Completion, FormContext, field_label, field_property, inline_error};

/// Read the query description of a `ui:dataSource`. A class on the form
/// takes precedence over one on the data source.
pub fn query_parameters(
    ctx: &FormContext,
    form: &Term,
    data_source: &Term,
) -> Result<QueryParameters, FormError> {
    let graph = &ctx.graph;
    let target_class = graph
        .value(form, ui::TARGET_CLASS)
        .or_else(|| graph.value(data_source, ui::TARGET_CLASS));
    let mut params = QueryParameters {
        label: graph.string_value(data_source, schema::NAME),
        logo: graph.string_value(data_source, schema::LOGO),
        target_class: match target_class {
            Some(Term::NamedNode(n)) => Some(n),
            _ => None,
        },
        ..QueryParameters::default()
    };
    match graph.string_value(data_source, ui::ENDPOINT) {
        Some(endpoint) => {
            params.endpoint = Some(endpoint);
            params.search_by_name_query = graph.string_value(data_source, ui::SEARCH_BY_NAME_QUERY);
            if params.search_by_name_query.is_none() {
                return Err(FormError::schema(
                    form,
                    "No searchByNameQuery given for endpoint data source",
                ));
            }
            params.institute_details_query =
                graph.string_value(data_source, ui::INSTITUTE_DETAILS_QUERY);
        }
        None => {
            params.search_by_name_uri = graph.string_value(data_source, ui::SEARCH_BY_NAME_URI);
            if params.search_by_name_uri.is_none() {
                return Err(FormError::schema(
                    data_source,
                    "No searchByNameURI OR sparql endpoint given for data source",
                ));
            }
        }
    }
    Ok(params)
}

/// Replace every `(subject, property)` statement, in whatever document, with
/// the single statement `(subject, property, object)` in `doc`.
pub fn replace_all(
    ctx: &FormContext,
    subject: &Term,
    property: &NamedNode,
    object: Term,
    doc: &NamedNode,
) -> (Vec<Quad>, Vec<Quad>) {
    let deletions = ctx
        .graph
        .statements_matching(Some(subject), Some(property.as_ref()), None, None);
    let insertions = statement(subject, property.as_ref(), object, doc.as_ref())
        .into_iter()
        .collect();
    (deletions, insertions)
}

pub fn render(
    ctx: &FormContext,
    container: Option<&Widget>,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    let Term::NamedNode(subject_node) = subject else {
        return inline_error(
            container,
            FormError::schema(subject, "Autocomplete only works on named subjects"),
        );
    };
    let Some(property) = field_property(ctx, form) else {
        return inline_error(
            container,
            FormError::schema(form, "No property given for autocomplete field"),
        );
    };
    let Some(data_source) = ctx.graph.value(form, ui::DATA_SOURCE) else {
        return inline_error(
            container,
            FormError::schema(form, "No data source given for autocomplete field"),
        );
    };
    let params = match query_parameters(ctx, form, &data_source) {
        Ok(params) => params,
        Err(err) => return inline_error(container, err),
    };
    let label_property = match ctx.graph.value(form, ui::LABEL_PROPERTY) {
        Some(Term::NamedNode(p)) => p,
        _ => schema::NAME.into_owned(),
    };
    let editable = ctx.editable(doc);

    let row = Element::new(ElementKind::Row);
    if let Some(c) = container {
        c.append(&row);
    }

    let current_object = ctx
        .graph
        .any(Some(subject), Some(property.as_ref()), None, Some(doc.as_ref()))
        .or_else(|| ctx.graph.value(form, ui::DEFAULT));
    if current_object.is_none()
        && !editable
        && ctx.graph.flag(form, ui::SUPPRESS_EMPTY_UNEDITABLE)
    {
        row.hide();
        return row;
    }
    let current_name = current_object
        .as_ref()
        .and_then(|o| ctx.graph.value(o, label_property.as_ref()))
        .map(|n| term_value(&n));

    row.append(&field_label(ctx, &property, form));
    let rhs = Element::new(ElementKind::Container);
    row.append(&rhs);

    let request = SearchRequest {
        subject: subject_node.clone(),
        params,
        label_property,
        current_object,
        current_name,
        editable,
        size: ctx.graph.integer(form, ui::SIZE),
    };

    let on_pick: PickHandler = {
        let ctx = ctx.clone();
        let subject = subject.clone();
        let doc = doc.clone();
        let rhs_ref = Rc::downgrade(&rhs);
        let row_ref = Rc::downgrade(&row);
        Rc::new(move |object: Term, name: String| {
            let (Some(rhs), Some(row)) = (rhs_ref.upgrade(), row_ref.upgrade()) else {
                return;
            };
            tracing::debug!(subject = %subject, object = %object, %name, "autocomplete pick");
            let (deletions, insertions) = replace_all(&ctx, &subject, &property, object, &doc);
            let done = done.clone();
            ctx.updater
                .submit(&rhs, &row, deletions, insertions, move |outcome| done(outcome));
        })
    };

    let pending = ctx.search.build_control(request, on_pick);
    let rhs_ref = Rc::downgrade(&rhs);
    let form = form.clone();
    ctx.updater.spawn(async move {
        let built = pending.await;
        let Some(rhs) = rhs_ref.upgrade() else { return };
        match built {
            Ok(control) => rhs.append(&control),
            Err(err) => {
                tracing::error!(form = %form, error = %err, "autocomplete control failed");
                rhs.append(&Element::error_block(format!(
                    "Error rendering autocomplete {form}: {err}"
                )));
            }
        }
    });
    row
}
