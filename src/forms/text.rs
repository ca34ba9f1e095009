//! Leaf text fields, multi-line text, and the read-only Comment and Heading.

use std::rc::Rc;

use oxigraph::model::{Literal, NamedNode, Quad, Term};

use crate::error::FormError;
use crate::graph::{GraphAccessor, quad_document, statement};
use crate::vocab::ui;
use crate::widget::{Element, ElementKind, Widget};

use super::params::{BasicKind, COMMENT_PARAMS, HEADING_PARAMS, FieldParams};
use super::{
    Completion, FormContext, field_label, field_property, field_store, inline_error,
    suppress_empty,
};

/// The statements that replace the `(subject, property)` values with `value`
/// written into `doc`. Values in read-only documents are left in place.
/// `None` deletes the values.
pub fn replacement(
    ctx: &FormContext,
    subject: &Term,
    property: &NamedNode,
    value: Option<Term>,
    doc: &NamedNode,
) -> (Vec<Quad>, Vec<Quad>) {
    let mut deletions: Vec<Quad> = ctx
        .graph
        .statements_matching(Some(subject), Some(property.as_ref()), None, None)
        .into_iter()
        .filter(|q| quad_document(q).is_some_and(|d| ctx.editable(&d)))
        .collect();
    let mut insertions: Vec<Quad> = value
        .and_then(|v| statement(subject, property.as_ref(), v, doc.as_ref()))
        .into_iter()
        .collect();
    // Rewriting a statement with itself is not a change.
    if let Some(same) = deletions.iter().position(|q| insertions.contains(q)) {
        let kept = deletions.remove(same);
        insertions.retain(|q| *q != kept);
    }
    (deletions, insertions)
}

/// Wire an input so that committing it writes its value.
#[allow(clippy::too_many_arguments)]
fn bind_input(
    ctx: &FormContext,
    input: &Widget,
    feedback: &Widget,
    subject: &Term,
    property: &NamedNode,
    doc: &NamedNode,
    encode: Rc<dyn Fn(&str) -> Result<Option<Term>, String>>,
    done: Completion,
) {
    let ctx = ctx.clone();
    let subject = subject.clone();
    let property = property.clone();
    let doc = doc.clone();
    let input_ref = Rc::downgrade(input);
    let feedback_ref = Rc::downgrade(feedback);
    input.on_activate(Rc::new(move || {
        let (Some(input), Some(feedback)) = (input_ref.upgrade(), feedback_ref.upgrade()) else {
            return;
        };
        let value = match encode(&input.text()) {
            Ok(value) => value,
            Err(message) => {
                tracing::warn!(property = %property, %message, "rejected input");
                feedback.append(&Element::error_block(message));
                return;
            }
        };
        let (deletions, insertions) = replacement(&ctx, &subject, &property, value, &doc);
        if deletions.is_empty() && insertions.is_empty() {
            input.set_dirty(false);
            return;
        }
        let done = done.clone();
        let saved = Rc::downgrade(&input);
        ctx.updater.submit(&input, &feedback, deletions, insertions, move |outcome| {
            if outcome.is_ok() {
                if let Some(input) = saved.upgrade() {
                    input.set_dirty(false);
                }
            }
            done(outcome);
        });
    }));
}

fn refresh_hook(
    ctx: &FormContext,
    input: &Widget,
    subject: &Term,
    property: &NamedNode,
    params: FieldParams,
) {
    let graph = ctx.graph.clone();
    let subject = subject.clone();
    let property = property.clone();
    let input_ref = Rc::downgrade(input);
    input.set_refresh(Rc::new(move || {
        let Some(input) = input_ref.upgrade() else { return };
        if input.is_dirty() {
            return;
        }
        let text = graph
            .value(&subject, property.as_ref())
            .map(|t| params.display(&t))
            .unwrap_or_default();
        input.set_text(text);
    }));
}

/// Single-statement leaf fields: text, numbers, dates, phone, email, color
/// and URI.
pub fn render_basic(
    ctx: &FormContext,
    container: Option<&Widget>,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    kind: BasicKind,
    done: Completion,
) -> Widget {
    let Some(property) = field_property(ctx, form) else {
        return inline_error(container, FormError::schema(form, "No property to text field"));
    };
    let params = kind.params();
    let row = Element::new(ElementKind::Row);
    if let Some(c) = container {
        c.append(&row);
    }
    row.append(&field_label(ctx, &property, form));

    let input = Element::new(ElementKind::TextInput);
    input.set_attr("type", params.input_type);
    let size = ctx.graph.integer(form, ui::SIZE).map_or(params.size.to_string(), |s| s.to_string());
    input.set_attr("size", size);
    let max_length = ctx.graph.integer(form, ui::MAX_LENGTH).unwrap_or(4096);
    input.set_attr("maxLength", max_length.to_string());
    if let Some(style) = params.style {
        input.set_attr("style", style);
    }
    row.append(&input);

    let doc = field_store(ctx, subject, property.as_ref(), doc);
    let current = ctx.graph.value(subject, property.as_ref());
    input.set_text(current.as_ref().map(|t| params.display(t)).unwrap_or_default());
    refresh_hook(ctx, &input, subject, &property, params);

    if !ctx.editable(&doc) {
        input.disable();
        if suppress_empty(ctx, form, &doc, current.is_none()) {
            row.hide();
        }
        return row;
    }

    let encode: Rc<dyn Fn(&str) -> Result<Option<Term>, String>> = Rc::new(move |text: &str| {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if !params.is_valid(text) {
            return Err(format!("Invalid {} value: {text:?}", kind.class_name()));
        }
        params.encode(text).map(Some)
    });
    bind_input(ctx, &input, &row, subject, &property, &doc, encode, done);
    row
}

/// `ui:MultiLineTextField`: a text area holding one plain literal.
pub fn render_multiline(
    ctx: &FormContext,
    container: Option<&Widget>,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    let Some(property) = field_property(ctx, form) else {
        return inline_error(container, FormError::schema(form, "No property to text field"));
    };
    let field = Element::new(ElementKind::Container);
    if let Some(c) = container {
        c.append(&field);
    }
    field.append(&field_label(ctx, &property, form));

    let doc = field_store(ctx, subject, property.as_ref(), doc);
    let text = ctx
        .graph
        .any(Some(subject), Some(property.as_ref()), None, Some(doc.as_ref()))
        .map(|t| crate::graph::term_value(&t))
        .unwrap_or_default();
    let area = Element::with_text(ElementKind::TextArea, text.clone());
    field.append(&area);
    refresh_hook(ctx, &area, subject, &property, FieldParams::default());

    if !ctx.editable(&doc) {
        area.disable();
        if suppress_empty(ctx, form, &doc, text.is_empty()) {
            field.hide();
        }
        return field;
    }
    let encode: Rc<dyn Fn(&str) -> Result<Option<Term>, String>> = Rc::new(|text: &str| {
        Ok((!text.is_empty()).then(|| Term::Literal(Literal::new_simple_literal(text))))
    });
    bind_input(ctx, &area, &field, subject, &property, &doc, encode, done);
    field
}

/// `ui:Comment` and `ui:Heading`: static text from `ui:contents`.
pub fn render_comment(
    ctx: &FormContext,
    container: Option<&Widget>,
    form: &Term,
    doc: &NamedNode,
    heading: bool,
) -> Widget {
    let params = if heading { HEADING_PARAMS } else { COMMENT_PARAMS };
    let contents = ctx
        .graph
        .string_value(form, ui::CONTENTS)
        .unwrap_or_else(|| "Error: No contents in comment field.".to_string());

    let wrapper = Element::new(ElementKind::Container);
    if let Some(c) = container {
        c.append(&wrapper);
    }
    let text = Element::with_text(ElementKind::Text, contents);
    text.set_attr("element", params.element);
    let style = ctx
        .graph
        .string_value(form, ui::STYLE)
        .unwrap_or_else(|| params.style.to_string());
    text.set_attr("style", style);
    wrapper.append(&text);

    if ctx.graph.flag(form, ui::SUPPRESS_IF_UNEDITABLE) && !ctx.editable(doc) {
        wrapper.hide();
    }
    wrapper
}
