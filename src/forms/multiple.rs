//! Multiple fields: zero or more objects of a relationship, each rendered with
//! the same part form.
//!
//! Unordered lists are plain `(subject, property, object)` statements (or
//! `(object, property, subject)` when reversed). Ordered lists hang a single
//! RDF collection off the subject and rewrite the whole chain on every change.

use std::rc::{Rc, Weak};

use oxigraph::model::{NamedNode, Quad, Term};

use crate::error::{FieldOutcome, FormError, UpdateError};
use crate::graph::{GraphAccessor, collection, quad_subject, statement, term_key};
use crate::label::label;
use crate::vocab::ui;
use crate::widget::{Element, ElementKind, Widget};

use super::{Completion, FormContext, RecursionGuard, inline_error, render_field};

/// Where a move sends an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Swap `object` with its neighbour. `None` when it is already at that end
/// or not in the list.
pub fn moved(items: &[Term], object: &Term, direction: Direction) -> Option<Vec<Term>> {
    let i = items.iter().position(|t| t == object)?;
    let j = match direction {
        Direction::Up => i.checked_sub(1)?,
        Direction::Down => Some(i + 1).filter(|j| *j < items.len())?,
    };
    let mut out = items.to_vec();
    out.swap(i, j);
    Some(out)
}

struct MultipleState {
    ctx: FormContext,
    guard: RecursionGuard,
    subject: Term,
    property: NamedNode,
    reverse: bool,
    ordered: bool,
    part: Term,
    doc: NamedNode,
    done: Completion,
    editable: bool,
    frame: Weak<Element>,
    body: Weak<Element>,
    add_button: Weak<Element>,
    me: Weak<MultipleState>,
}

impl MultipleState {
    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    fn link_statements(&self) -> Vec<Quad> {
        let p = Some(self.property.as_ref());
        let doc = Some(self.doc.as_ref());
        if self.reverse {
            self.ctx
                .graph
                .statements_matching(None, p, Some(&self.subject), doc)
        } else {
            self.ctx
                .graph
                .statements_matching(Some(&self.subject), p, None, doc)
        }
    }

    fn far_end(&self, quad: &Quad) -> Term {
        if self.reverse {
            quad_subject(quad)
        } else {
            quad.object.clone()
        }
    }

    fn link(&self, object: Term) -> Option<Quad> {
        if self.reverse {
            statement(&object, self.property.as_ref(), self.subject.clone(), self.doc.as_ref())
        } else {
            statement(&self.subject, self.property.as_ref(), object, self.doc.as_ref())
        }
    }

    /// Current items: the collection's elements when ordered, else every
    /// linked object sorted into a stable order.
    fn values(&self) -> Vec<Term> {
        let links = self.link_statements();
        if self.ordered {
            return links
                .first()
                .and_then(|q| {
                    self.ctx
                        .graph
                        .collection_elements(&self.far_end(q), Some(self.doc.as_ref()))
                })
                .unwrap_or_default();
        }
        let mut values: Vec<Term> = Vec::new();
        for q in &links {
            let v = self.far_end(q);
            if !values.contains(&v) {
                values.push(v);
            }
        }
        values.sort_by_key(term_key);
        values
    }

    fn predicate_label(&self) -> String {
        let base = label(&*self.ctx.graph, &Term::NamedNode(self.property.clone()));
        if self.reverse {
            format!("is {base} of")
        } else {
            base
        }
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    fn report(&self, kind: ElementKind, message: String) {
        if let Some(frame) = self.frame.upgrade() {
            frame.append(&Element::with_text(kind, message));
        }
    }

    fn item_done(&self, object: &Term) -> Completion {
        let done = self.done.clone();
        let object = object.clone();
        Rc::new(move |outcome: FieldOutcome| {
            if let Err(err) = &outcome {
                tracing::error!(item = %object, error = %err, "list item update failed");
            }
            done(outcome);
        })
    }

    fn render_item(&self, object: &Term) -> Widget {
        tracing::debug!(item = %object, "render list item");
        let item = Element::new(ElementKind::Row);
        item.set_subject(object.clone());
        render_field(
            &self.ctx,
            Some(&item),
            &self.guard,
            object,
            &self.part,
            &self.doc,
            self.item_done(object),
        );
        if !self.editable {
            return item;
        }

        let delete = Element::with_text(ElementKind::Button, "Delete");
        delete.set_attr("title", format!("Remove this {}", self.predicate_label()));
        item.append(&delete);
        self.on_item_action(&delete, &item, object, None);
        if self.ordered {
            let up = Element::with_text(ElementKind::Button, "Move Up");
            let down = Element::with_text(ElementKind::Button, "Move Down");
            item.append(&up);
            item.append(&down);
            self.on_item_action(&up, &item, object, Some(Direction::Up));
            self.on_item_action(&down, &item, object, Some(Direction::Down));
        }
        item
    }

    /// Wire a delete (`None`) or move button. The item is locked while the
    /// write is in flight.
    fn on_item_action(
        &self,
        button: &Widget,
        item: &Widget,
        object: &Term,
        direction: Option<Direction>,
    ) {
        let me = self.me.clone();
        let item = Rc::downgrade(item);
        let object = object.clone();
        button.on_activate(Rc::new(move || {
            let (Some(state), Some(item)) = (me.upgrade(), item.upgrade()) else {
                return;
            };
            item.disable();
            let object = object.clone();
            let task_state = state.clone();
            state.ctx.updater.spawn(async move {
                let outcome = match direction {
                    None => task_state.clone().delete(object).await,
                    Some(d) => task_state.clone().move_item(object, d).await,
                };
                item.enable();
                if let Some(outcome) = outcome {
                    (task_state.done)(outcome);
                }
            });
        }));
    }

    /// Bring the item widgets in line with the graph, reusing the widget of
    /// every item still present.
    fn refresh(&self) {
        let Some(body) = self.body.upgrade() else { return };
        let existing = body.children();
        let values = self.values();
        let rows: Vec<Widget> = values
            .iter()
            .map(|v| {
                existing
                    .iter()
                    .find(|w| w.subject().as_ref() == Some(v))
                    .cloned()
                    .unwrap_or_else(|| self.render_item(v))
            })
            .collect();
        body.set_children(rows);
        if let Some(add) = self.add_button.upgrade() {
            add.set_text(self.add_prompt(values.len()));
        }
    }

    fn add_prompt(&self, count: usize) -> String {
        let verb = if count == 0 { "Add one or more" } else { "Add more" };
        format!("{verb} {}", self.predicate_label())
    }

    // -----------------------------------------------------------------------
    // Writing
    // -----------------------------------------------------------------------

    fn failure(&self, e: UpdateError) -> FormError {
        FormError::UpdateFailure {
            document: self.doc.as_str().to_string(),
            message: e.to_string(),
        }
    }

    /// Replace the stored collection with `items`, then refresh.
    async fn save_list(self: Rc<Self>, items: Vec<Term>) -> FieldOutcome {
        let links = self.link_statements();
        let mut deletions = links.clone();
        for link in &links {
            deletions.extend(collection::chain_statements(
                &*self.ctx.graph,
                &self.far_end(link),
                Some(self.doc.as_ref()),
            ));
        }
        let (head, chain) = collection::build(&items, self.doc.as_ref());
        let mut insertions: Vec<Quad> = self.link(head).into_iter().collect();
        insertions.extend(chain);
        tracing::debug!(items = items.len(), "save ordered list");

        match self.ctx.updater.apply(deletions, insertions).await {
            Ok(()) => {
                self.refresh();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "saving ordered list failed");
                let message = format!("Error trying to put back a list: {e}");
                self.report(ElementKind::ErrorBlock, message);
                Err(self.failure(e))
            }
        }
    }

    /// Add `count` fresh items in one write.
    async fn add(self: Rc<Self>, count: usize) -> FieldOutcome {
        let fresh: Vec<Term> = (0..count)
            .map(|_| Term::NamedNode(self.ctx.mint(&self.doc)))
            .collect();
        if self.ordered {
            let mut items = self.values();
            items.extend(fresh);
            return self.save_list(items).await;
        }
        let insertions: Vec<Quad> = fresh.into_iter().filter_map(|o| self.link(o)).collect();
        let result = self.ctx.updater.apply(Vec::new(), insertions).await;
        self.refresh();
        result.map_err(|e| {
            tracing::error!(error = %e, "adding to unordered list failed");
            let message = format!("Error adding to unordered multiple: {e}");
            self.report(ElementKind::ErrorBlock, message);
            self.failure(e)
        })
    }

    async fn delete(self: Rc<Self>, object: Term) -> Option<FieldOutcome> {
        if self.ordered {
            let mut items = self.values();
            let i = items.iter().position(|t| *t == object)?;
            items.remove(i);
            return Some(self.save_list(items).await);
        }
        let link = self.link(object)?;
        if !self.ctx.graph.holds(
            &quad_subject(&link),
            link.predicate.as_ref(),
            &link.object,
            Some(self.doc.as_ref()),
        ) {
            return None;
        }
        let result = self.ctx.updater.apply(vec![link], Vec::new()).await;
        self.refresh();
        Some(result.map_err(|e| {
            self.report(ElementKind::ErrorBlock, format!("Multiple: delete failed: {e}"));
            self.failure(e)
        }))
    }

    async fn move_item(self: Rc<Self>, object: Term, direction: Direction) -> Option<FieldOutcome> {
        let items = self.values();
        match moved(&items, &object, direction) {
            Some(items) => Some(self.save_list(items).await),
            None => {
                let message = match direction {
                    Direction::Up => "Already at the top",
                    Direction::Down => "Already at the bottom",
                };
                tracing::info!(item = %object, message, "list move ignored");
                self.report(ElementKind::Notice, message.to_string());
                None
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
    let frame = Element::new(ElementKind::Container);
    if let Some(c) = container {
        c.append(&frame);
    }
    let Some(Term::NamedNode(property)) = ctx.graph.value(form, ui::PROPERTY) else {
        inline_error(Some(&frame), FormError::schema(form, "No property to multiple"));
        return frame;
    };
    let Some(part) = ctx.graph.value(form, ui::PART) else {
        inline_error(Some(&frame), FormError::schema(form, "No part to multiple"));
        return frame;
    };
    let min = ctx.graph.integer(form, ui::MIN).unwrap_or(0).max(0) as usize;
    let editable = ctx.editable(doc);

    let body = Element::new(ElementKind::Container);
    frame.append(&body);
    let add_button = Element::new(ElementKind::Button);
    if editable {
        add_button.set_attr("style", "margin: 0.2em;");
        frame.append(&add_button);
    }

    let state = Rc::new_cyclic(|me| MultipleState {
        ctx: ctx.clone(),
        guard: guard.clone(),
        subject: subject.clone(),
        property,
        reverse: ctx.graph.flag(form, ui::REVERSE),
        ordered: ctx.graph.flag(form, ui::ORDERED),
        part,
        doc: doc.clone(),
        done,
        editable,
        frame: Rc::downgrade(&frame),
        body: Rc::downgrade(&body),
        add_button: Rc::downgrade(&add_button),
        me: me.clone(),
    });
    state.refresh();

    if editable {
        let me = Rc::downgrade(&state);
        let button = Rc::downgrade(&add_button);
        add_button.on_activate(Rc::new(move || {
            let (Some(state), Some(button)) = (me.upgrade(), button.upgrade()) else {
                return;
            };
            button.disable();
            let task_state = state.clone();
            state.ctx.updater.spawn(async move {
                let outcome = task_state.clone().add(1).await;
                button.enable();
                (task_state.done)(outcome);
            });
        }));
    }
    let me = Rc::downgrade(&state);
    frame.set_refresh(Rc::new(move || {
        if let Some(state) = me.upgrade() {
            state.refresh();
        }
    }));

    let present = state.values().len();
    if editable && present < min {
        let extra = min - present;
        tracing::debug!(form = %form, min, present, "backfilling list to minimum");
        let task_state = state.clone();
        ctx.updater.spawn(async move {
            let outcome = task_state.clone().add(extra).await;
            if let Err(err) = &outcome {
                tracing::error!(error = %err, "list backfill failed");
            }
            (task_state.done)(outcome);
        });
    }
    frame.retain(state);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(local: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(format!("http://ex.org/d#{local}")))
    }

    #[test]
    fn moves_swap_neighbours() {
        let items = vec![t("a"), t("b"), t("c")];
        assert_eq!(moved(&items, &t("b"), Direction::Up), Some(vec![t("b"), t("a"), t("c")]));
        assert_eq!(moved(&items, &t("b"), Direction::Down), Some(vec![t("a"), t("c"), t("b")]));
    }

    #[test]
    fn moves_past_the_ends_are_refused() {
        let items = vec![t("a"), t("b")];
        assert_eq!(moved(&items, &t("a"), Direction::Up), None);
        assert_eq!(moved(&items, &t("b"), Direction::Down), None);
        assert_eq!(moved(&items, &t("z"), Direction::Up), None);
    }
}
