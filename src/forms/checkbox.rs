//! Boolean and tri-state fields.
//!
//! The state is never stored as such: it is read from two statement sets, the
//! ones asserting the value (`ins`) and the ones denying it (`del`). Holding
//! both at once is inconsistent data and is shown as an error, not resolved.

use std::cell::Cell;
use std::rc::Rc;

use oxigraph::model::{NamedNode, Quad, Term};

use crate::error::FormError;
use crate::graph::{
    GraphAccessor, boolean_term, quad_document, quad_subject, statement, term_truthy,
};
use crate::vocab::ui;
use crate::widget::{Element, ElementKind, Widget};

use super::{Completion, FormContext, field_label_text, field_property, field_store, inline_error};

const LABEL_STYLE: &str = "color: black;";
const PENDING_STYLE: &str = "color: #bbb;";
const FAILED_STYLE: &str = "color: black; background-color: #fee;";

fn holds_all(ctx: &FormContext, quads: &[Quad]) -> bool {
    quads.iter().all(|q| {
        let doc = quad_document(q);
        ctx.graph.holds(
            &quad_subject(q),
            q.predicate.as_ref(),
            &q.object,
            doc.as_ref().map(|d| d.as_ref()),
        )
    })
}

/// Current state from the graph: `Some(true)` when `ins` holds, `Some(false)`
/// when `del` holds, `None` when neither does.
pub fn checkbox_state(
    ctx: &FormContext,
    ins: &[Quad],
    del: &[Quad],
) -> Result<Option<bool>, FormError> {
    let affirmed = holds_all(ctx, ins);
    if del.is_empty() {
        return Ok(Some(affirmed));
    }
    let negated = holds_all(ctx, del);
    match (affirmed, negated) {
        (true, true) => Err(FormError::InconsistentData {
            message: format!(
                "{} and {}",
                ins.iter().map(|q| q.to_string()).collect::<Vec<_>>().join(", "),
                del.iter().map(|q| q.to_string()).collect::<Vec<_>>().join(", "),
            ),
        }),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}

/// The state a click moves to. Plain booleans alternate between true and
/// false; tri-state fields go false, true, unset, false.
pub fn next_state(current: Option<bool>, tristate: bool) -> Option<bool> {
    match (current, tristate) {
        (Some(false), _) => Some(true),
        (Some(true), true) => None,
        (Some(true), false) => Some(false),
        (None, true) => Some(false),
        (None, false) => Some(true),
    }
}

fn statements_for(state: Option<bool>, ins: &[Quad], del: &[Quad]) -> Vec<Quad> {
    match state {
        Some(true) => ins.to_vec(),
        Some(false) => del.to_vec(),
        None => Vec::new(),
    }
}

/// What to show when neither set holds.
fn unset_display(ctx: &FormContext, form: &Term, tristate: bool) -> Option<bool> {
    match ctx.graph.value(form, ui::DEFAULT) {
        Some(default) => Some(term_truthy(&default)),
        None if tristate => None,
        None => Some(false),
    }
}

/// A labelled checkbox bound to two statement sets.
#[allow(clippy::too_many_arguments)]
pub fn build_checkbox(
    ctx: &FormContext,
    label: &str,
    del: Vec<Quad>,
    ins: Vec<Quad>,
    form: &Term,
    doc: &NamedNode,
    tristate: bool,
    done: Completion,
) -> Widget {
    let row = Element::new(ElementKind::Row);
    let text = Element::with_text(ElementKind::Label, label);
    text.set_attr("style", LABEL_STYLE);
    let toggle = Element::new(ElementKind::Checkbox);
    row.append(&text);
    row.append(&toggle);

    let state = match checkbox_state(ctx, &ins, &del) {
        Ok(state) => state,
        Err(err) => {
            toggle.hide();
            inline_error(Some(&row), err);
            return row;
        }
    };
    let current = Rc::new(Cell::new(state));
    toggle.set_toggle(state.or_else(|| unset_display(ctx, form, tristate)));

    {
        let ctx = ctx.clone();
        let ins = ins.clone();
        let del = del.clone();
        let form = form.clone();
        let toggle_ref = Rc::downgrade(&toggle);
        let current = current.clone();
        row.set_refresh(Rc::new(move || {
            let Some(toggle) = toggle_ref.upgrade() else { return };
            if let Ok(state) = checkbox_state(&ctx, &ins, &del) {
                current.set(state);
                toggle.set_toggle(state.or_else(|| unset_display(&ctx, &form, tristate)));
            }
        }));
    }

    if !ctx.editable(doc) {
        toggle.disable();
        return row;
    }

    let ctx = ctx.clone();
    let row_ref = Rc::downgrade(&row);
    let toggle_ref = Rc::downgrade(&toggle);
    let text_ref = Rc::downgrade(&text);
    toggle.on_activate(Rc::new(move || {
        let (Some(row), Some(toggle), Some(text)) =
            (row_ref.upgrade(), toggle_ref.upgrade(), text_ref.upgrade())
        else {
            return;
        };
        let from = current.get();
        let to = next_state(from, tristate);
        let deletions = statements_for(from, &ins, &del);
        let insertions = statements_for(to, &ins, &del);
        tracing::debug!(
            ?from,
            ?to,
            deletions = deletions.len(),
            insertions = insertions.len(),
            "checkbox click"
        );
        text.set_attr("style", PENDING_STYLE);

        let current = current.clone();
        let done = done.clone();
        let toggle_after = Rc::downgrade(&toggle);
        let text_after = Rc::downgrade(&text);
        ctx.updater.submit(&toggle, &row, deletions, insertions, move |outcome| {
            if let Some(text) = text_after.upgrade() {
                text.set_attr("style", if outcome.is_ok() { LABEL_STYLE } else { FAILED_STYLE });
            }
            if outcome.is_ok() {
                current.set(to);
                if let Some(toggle) = toggle_after.upgrade() {
                    toggle.set_toggle(to);
                }
            }
            done(outcome);
        });
    }));
    row
}

/// `ui:BooleanField` (`tristate = false`) and `ui:TristateField`.
pub fn render(
    ctx: &FormContext,
    container: Option<&Widget>,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    tristate: bool,
    done: Completion,
) -> Widget {
    let Some(property) = field_property(ctx, form) else {
        return inline_error(container, FormError::schema(form, "No property to boolean field"));
    };
    let label = field_label_text(ctx, &property, form);
    let doc = field_store(ctx, subject, property.as_ref(), doc);
    let ins = statement(subject, property.as_ref(), boolean_term(true), doc.as_ref());
    let del = statement(subject, property.as_ref(), boolean_term(false), doc.as_ref());
    let (Some(ins), Some(del)) = (ins, del) else {
        return inline_error(
            container,
            FormError::schema(subject, "A literal cannot be a form subject"),
        );
    };
    let widget = build_checkbox(ctx, &label, vec![del], vec![ins], form, &doc, tristate, done);
    if let Some(c) = container {
        c.append(&widget);
    }
    widget
}
