//! Choice fields: one value from a class's members, with an optional sub-form
//! for the chosen object.

use std::rc::Rc;

use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{NamedNode, Term};

use crate::error::FormError;
use crate::graph::{GraphAccessor, document_of};
use crate::graph::hierarchy::members_of;
use crate::label::{capitalize, label};
use crate::vocab::{owl, ui};
use crate::widget::{Element, ElementKind, Widget};

use super::select::{SelectOptions, make_select_for_options};
use super::{
    Completion, FormContext, RecursionGuard, append_form, field_label, field_property,
    inline_error, sort_by_label,
};

/// Candidates for a `ui:from` class, and whether their labels need the
/// vocabulary suffix to be told apart.
pub fn candidates(ctx: &FormContext, from: &NamedNode) -> (Vec<Term>, bool) {
    let named = |nodes: Vec<NamedNode>| nodes.into_iter().map(Term::NamedNode).collect::<Vec<_>>();
    let from_ref = from.as_ref();
    let (found, disambiguate) = if from_ref == rdfs::CLASS {
        (named(ctx.catalog.all_classes()), false)
    } else if from_ref == rdf::PROPERTY {
        let triage = ctx.catalog.property_triage();
        let mut all = triage.object;
        all.extend(triage.datatype);
        all.extend(triage.mixed);
        (named(all), true)
    } else if from_ref == owl::OBJECT_PROPERTY {
        (named(ctx.catalog.property_triage().object), true)
    } else if from_ref == owl::DATATYPE_PROPERTY {
        (named(ctx.catalog.property_triage().datatype), true)
    } else {
        let class = Term::NamedNode(from.clone());
        let mut found = ctx.graph.each(None, Some(rdf::TYPE), Some(&class), None);
        found.extend(members_of(&*ctx.graph, from));
        (found, false)
    };

    let mut unique: Vec<Term> = Vec::new();
    for term in found {
        if !unique.contains(&term) {
            unique.push(term);
        }
    }
    (sort_by_label(&*ctx.graph, unique), disambiguate)
}

pub fn render(
    ctx: &FormContext,
    container: Option<&Widget>,
    guard: &RecursionGuard,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    let Some(property) = field_property(ctx, form) else {
        return inline_error(container, FormError::schema(form, "No property for Choice"));
    };
    let Some(Term::NamedNode(from)) = ctx.graph.value(form, ui::FROM) else {
        return inline_error(container, FormError::schema(form, "No 'from' for Choice"));
    };

    let row = Element::new(ElementKind::Row);
    if let Some(c) = container {
        c.append(&row);
    }
    row.append(&field_label(ctx, &property, form));
    let rhs = Element::new(ElementKind::Container);
    row.append(&rhs);

    let sub_form = ctx.graph.value(form, ui::USE);
    let (possible, disambiguate) = candidates(ctx, &from);
    tracing::debug!(form = %form, from = %from, candidates = possible.len(), "choice candidates");

    let can_mint = ctx.graph.flag(form, ui::CAN_MINT_NEW);
    let from_label = capitalize(&label(&*ctx.graph, &Term::NamedNode(from.clone())));
    let opts = SelectOptions {
        multiple: false,
        null_label: Some(format!("* Select from {from_label} *")),
        mint: can_mint.then(|| ctx.config.mint_label.clone()),
        mint_class: (can_mint && sub_form.is_none()).then(|| from.clone()),
        sub_form: sub_form.clone(),
        disambiguate,
    };

    match make_select_for_options(ctx, subject, &property, possible, opts, doc, done.clone()) {
        Ok((select, _)) => rhs.append(&select),
        Err(err) => {
            inline_error(Some(&rhs), err);
            return row;
        }
    }

    let current = ctx.graph.value(subject, property.as_ref());
    let follow = ctx.graph.flag(form, ui::FOLLOW);
    if follow {
        if let Some(Term::NamedNode(object)) = &current {
            let link = Element::with_text(ElementKind::Label, "follow");
            link.set_attr("href", object.as_str());
            rhs.append(&link);
        }
    }
    if let (Some(object), Some(sub_form)) = (current, sub_form) {
        let sub_doc = if follow {
            document_of(&object).unwrap_or_else(|| doc.clone())
        } else {
            doc.clone()
        };
        tracing::debug!(object = %object, document = %sub_doc, "choice sub-form");
        let nested: Completion = Rc::clone(&done);
        append_form(ctx, Some(&rhs), guard, &object, &sub_form, &sub_doc, nested);
    }
    row
}
