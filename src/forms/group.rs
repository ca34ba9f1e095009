//! Group (and Form) fields: an ordered run of child fields in a nested box.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use oxigraph::model::{NamedNode, Term};

use crate::error::{FieldOutcome, FormError};
use crate::graph::GraphAccessor;
use crate::vocab::ui;
use crate::widget::{Element, ElementKind, Widget};

use super::{
    Completion, FieldKind, FormContext, RecursionGuard, inline_error, render_field,
    sort_by_sequence,
};

/// Child fields of a group, in display order: an explicit `ui:parts` list
/// verbatim, else the `ui:part`s sorted by `ui:sequence`.
pub fn group_parts(ctx: &FormContext, form: &Term) -> Result<Vec<Term>, FormError> {
    if let Some(head) = ctx.graph.value(form, ui::PARTS) {
        return ctx
            .graph
            .collection_elements(&head, None)
            .ok_or_else(|| FormError::schema(form, "ui:parts is not a list"));
    }
    let parts = ctx.graph.values(form, ui::PART);
    if parts.is_empty() {
        return Err(FormError::schema(form, "No parts to form"));
    }
    Ok(sort_by_sequence(
        &*ctx.graph,
        parts,
        ctx.config.unsequenced_weight,
    ))
}

struct Branch {
    field: Term,
    widget: Widget,
}

/// Re-renders every Options child of a group after any child changes data,
/// since a branch may depend on what just changed.
struct BranchBroadcast {
    ctx: FormContext,
    container: Weak<Element>,
    guard: RecursionGuard,
    subject: Term,
    doc: NamedNode,
    done: Completion,
    branches: RefCell<Vec<Branch>>,
    me: Weak<BranchBroadcast>,
}

impl BranchBroadcast {
    /// Completion for one child: forwards to [`notify`](Self::notify).
    fn listener(&self) -> Completion {
        let me = self.me.clone();
        Rc::new(move |outcome| {
            if let Some(b) = me.upgrade() {
                b.notify(outcome);
            }
        })
    }

    fn notify(&self, outcome: FieldOutcome) {
        if outcome.is_ok() {
            self.rerender_branches();
        }
        (self.done)(outcome);
    }

    fn rerender_branches(&self) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        let fields: Vec<(usize, Term, Widget)> = self
            .branches
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, b)| (i, b.field.clone(), b.widget.clone()))
            .collect();
        for (i, field, old) in fields {
            let fresh = render_field(
                &self.ctx,
                None,
                &self.guard,
                &self.subject,
                &field,
                &self.doc,
                self.listener(),
            );
            if !container.replace_child(&old, &fresh) {
                container.append(&fresh);
            }
            tracing::debug!(field = %field, "re-rendered options branch");
            if let Some(b) = self.branches.borrow_mut().get_mut(i) {
                b.widget = fresh;
            }
        }
    }
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
    let group = Element::new(ElementKind::Container);
    group.set_attr("style", "padding-left: 2em; border: 0.05em solid #888;");
    if let Some(c) = container {
        c.append(&group);
    }

    let key = RecursionGuard::key(subject, form);
    if guard.contains(&key) {
        tracing::debug!(key = %key, "form loop, rendering stub");
        let stub = FormError::LoopDetected { key: key.clone() };
        group.append(&Element::with_text(ElementKind::LoopStub, stub.to_string()));
        return group;
    }
    let inner = guard.with(key);

    let parts = match group_parts(ctx, form) {
        Ok(parts) => parts,
        Err(err) => {
            inline_error(Some(&group), err);
            return group;
        }
    };

    let broadcast = Rc::new_cyclic(|me| BranchBroadcast {
        ctx: ctx.clone(),
        container: Rc::downgrade(&group),
        guard: inner.clone(),
        subject: subject.clone(),
        doc: doc.clone(),
        done,
        branches: RefCell::new(Vec::new()),
        me: me.clone(),
    });

    for part in parts {
        let is_branch = ctx.registry.resolve(&*ctx.graph, &part) == Ok(FieldKind::Options);
        let widget = render_field(
            ctx,
            Some(&group),
            &inner,
            subject,
            &part,
            doc,
            broadcast.listener(),
        );
        if is_branch {
            broadcast
                .branches
                .borrow_mut()
                .push(Branch { field: part, widget });
        }
    }
    group.retain(broadcast);
    group
}
