//! Options fields: pick one sub-form by the subject's current value of a
//! predicate (its types by default).

use oxigraph::model::vocab::rdf;
use oxigraph::model::{NamedNode, Term};

use crate::error::FormError;
use crate::graph::GraphAccessor;
use crate::graph::hierarchy::types_of;
use crate::vocab::ui;
use crate::widget::{Element, ElementKind, Widget};

use super::{Completion, FormContext, RecursionGuard, append_form, inline_error};

pub fn render(
    ctx: &FormContext,
    container: Option<&Widget>,
    guard: &RecursionGuard,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    let branch = Element::new(ElementKind::Container);
    if let Some(c) = container {
        c.append(&branch);
    }

    let depending_on = match ctx.graph.value(form, ui::DEPENDING_ON) {
        Some(Term::NamedNode(p)) => p,
        _ => rdf::TYPE.into_owned(),
    };
    let cases = ctx.graph.values(form, ui::CASE);
    if cases.is_empty() {
        inline_error(Some(&branch), FormError::schema(form, "No cases to Options form"));
        return branch;
    }

    let values: Vec<Term> = if depending_on.as_ref() == rdf::TYPE {
        types_of(&*ctx.graph, subject)
            .into_iter()
            .map(Term::NamedNode)
            .collect()
    } else {
        ctx.graph.values(subject, depending_on.as_ref())
    };
    if values.is_empty() {
        tracing::debug!(form = %form, depending_on = %depending_on, "no value to select a case");
        return branch;
    }

    for case in cases {
        let matched = ctx
            .graph
            .values(&case, ui::FOR)
            .iter()
            .any(|trigger| values.contains(trigger));
        if !matched {
            continue;
        }
        match ctx.graph.value(&case, ui::USE) {
            Some(field) => {
                append_form(ctx, Some(&branch), guard, subject, &field, doc, done);
            }
            None => {
                inline_error(
                    Some(&branch),
                    FormError::schema(form, "No \"use\" part for case in form"),
                );
            }
        }
        break;
    }
    branch
}
