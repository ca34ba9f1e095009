//! Creating a new entity through its class's creation form.

use std::rc::Rc;

use oxigraph::model::vocab::rdf;
use oxigraph::model::{NamedNode, Quad, Term};

use crate::graph::{GraphAccessor, statement};
use crate::label::label;
use crate::vocab::ui;
use crate::widget::{Element, ElementKind, Widget};

use super::{Completion, FormContext, RecursionGuard, append_form, find_closest};

/// Link statements for a freshly created `object` that are not in the graph
/// yet: `(subject, predicate, object)` and `(object, rdf:type, class)`.
fn missing_links(
    ctx: &FormContext,
    subject: Option<&Term>,
    predicate: Option<&NamedNode>,
    object: &Term,
    class: &NamedNode,
    doc: &NamedNode,
) -> Vec<Quad> {
    let mut out = Vec::new();
    if let (Some(s), Some(p)) = (subject, predicate) {
        if !ctx.graph.holds(s, p.as_ref(), object, None) {
            out.extend(statement(s, p.as_ref(), object.clone(), doc.as_ref()));
        }
    }
    let class_term = Term::NamedNode(class.clone());
    if !ctx.graph.holds(object, rdf::TYPE, &class_term, None) {
        out.extend(statement(object, rdf::TYPE, class_term, doc.as_ref()));
    }
    out
}

/// Ask for a new `class` instance: mint an identifier, render the creation
/// form for it, and once the form reports a successful change link it to
/// `subject` through `predicate` and type it.
///
/// `form` overrides the class's `ui:creationForm`. Returns the prompt widget
/// and the minted object, or no object when no creation form is known.
pub fn prompt_for_new(
    ctx: &FormContext,
    subject: Option<&Term>,
    predicate: Option<&NamedNode>,
    class: &NamedNode,
    form: Option<&Term>,
    doc: &NamedNode,
    done: Completion,
) -> (Widget, Option<Term>) {
    let prompt = Element::new(ElementKind::Container);
    prompt.set_attr("style", "border: 0.05em solid brown; padding: 0.5em;");
    let class_label = label(&*ctx.graph, &Term::NamedNode(class.clone()));

    let form = form
        .cloned()
        .or_else(|| find_closest(&*ctx.graph, class, ui::CREATION_FORM).into_iter().next());
    let Some(form) = form else {
        tracing::info!(class = %class, "no creation form for class");
        prompt.append(&Element::with_text(
            ElementKind::Text,
            format!(
                "I am sorry, you need to provide information about a {class_label} \
                 but I don't know enough information about those to ask you."
            ),
        ));
        return (prompt, None);
    };

    prompt.append(&Element::with_text(
        ElementKind::Text,
        format!("New {class_label}"),
    ));
    let object = Term::NamedNode(ctx.mint(doc));
    tracing::debug!(class = %class, object = %object, form = %form, "prompting for new entity");

    let linked: Completion = {
        let ctx = ctx.clone();
        let subject = subject.cloned();
        let predicate = predicate.cloned();
        let object = object.clone();
        let class = class.clone();
        let doc = doc.clone();
        let prompt_ref = Rc::downgrade(&prompt);
        Rc::new(move |outcome| {
            if outcome.is_err() {
                done(outcome);
                return;
            }
            let links = missing_links(
                &ctx,
                subject.as_ref(),
                predicate.as_ref(),
                &object,
                &class,
                &doc,
            );
            let Some(prompt) = prompt_ref.upgrade() else {
                done(outcome);
                return;
            };
            if links.is_empty() {
                done(outcome);
                return;
            }
            let done = done.clone();
            ctx.updater
                .submit(&prompt, &prompt, Vec::new(), links, move |linked| done(linked));
        })
    };
    append_form(ctx, Some(&prompt), &RecursionGuard::new(), &object, &form, doc, linked);
    (prompt, Some(object))
}

/// A "New <class>" button. Each press opens a [`prompt_for_new`] beside the
/// button, inside its parent.
pub fn new_button(
    ctx: &FormContext,
    subject: Option<&Term>,
    predicate: Option<&NamedNode>,
    class: &NamedNode,
    form: Option<&Term>,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    let class_label = label(&*ctx.graph, &Term::NamedNode(class.clone()));
    let button = Element::with_text(ElementKind::Button, format!("New {class_label}"));
    button.set_attr("type", "button");

    let ctx = ctx.clone();
    let subject = subject.cloned();
    let predicate = predicate.cloned();
    let class = class.clone();
    let form = form.cloned();
    let doc = doc.clone();
    let button_ref = Rc::downgrade(&button);
    button.on_activate(Rc::new(move || {
        let Some(parent) = button_ref.upgrade().and_then(|b| b.parent()) else {
            tracing::debug!(class = %class, "new button pressed outside a container");
            return;
        };
        let (prompt, _) = prompt_for_new(
            &ctx,
            subject.as_ref(),
            predicate.as_ref(),
            &class,
            form.as_ref(),
            &doc,
            done.clone(),
        );
        parent.append(&prompt);
    }));
    button
}
