//! The select builder shared by Choice and Classifier fields, and the
//! category selectors built on it.
//!
//! A change to a select is written as one diff: newly chosen values are
//! inserted, values no longer chosen are deleted. For `rdf:type` selects the
//! diff also retracts classes made redundant by the new choice, so only the
//! most specific class is ever asserted.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use oxigraph::model::vocab::rdf;
use oxigraph::model::{NamedNode, Quad, Term};

use crate::error::FormError;
use crate::graph::hierarchy::{direct_subclasses_of, subclasses_of, superclasses_of, types_of};
use crate::graph::{GraphAccessor, statement};
use crate::label::{label, label_with_ontology};
use crate::vocab::{owl, ui};
use crate::widget::{Element, ElementKind, OptionValue, SelectOption, Widget};

use super::create::prompt_for_new;
use super::{Completion, FormContext, RecursionGuard, append_form, inline_error};

/// How a select behaves.
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub multiple: bool,
    /// Prompt shown while nothing is chosen.
    pub null_label: Option<String>,
    /// Label of the "create a new one" option; `None` disables minting.
    pub mint: Option<String>,
    /// Class of minted objects; when set, minting goes through the class's
    /// creation form.
    pub mint_class: Option<NamedNode>,
    /// Form rendered for a newly minted object.
    pub sub_form: Option<Term>,
    /// Suffix labels with their vocabulary.
    pub disambiguate: bool,
}

/// Live state behind one select widget. Owned by the widget.
pub struct SelectControl {
    ctx: FormContext,
    widget: Weak<Element>,
    subject: Term,
    predicate: NamedNode,
    possible: Vec<Term>,
    opts: SelectOptions,
    doc: NamedNode,
    done: Completion,
    sub_select: RefCell<Weak<SelectControl>>,
    super_select: RefCell<Weak<SelectControl>>,
    me: Weak<SelectControl>,
}

impl std::fmt::Debug for SelectControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectControl")
            .field("subject", &self.subject)
            .field("predicate", &self.predicate)
            .field("possible", &self.possible.len())
            .finish_non_exhaustive()
    }
}

/// Chain two selects so a change above retracts what is chosen below.
pub fn link(parent: &Rc<SelectControl>, child: &Rc<SelectControl>) {
    *parent.sub_select.borrow_mut() = Rc::downgrade(child);
    *child.super_select.borrow_mut() = Rc::downgrade(parent);
}

impl SelectControl {
    pub fn widget(&self) -> Option<Widget> {
        self.widget.upgrade()
    }

    fn is_type(&self) -> bool {
        self.predicate.as_ref() == rdf::TYPE
    }

    /// Values the subject currently has: for `rdf:type` every inferred type,
    /// otherwise the values stated in the data document.
    pub fn actual(&self) -> Vec<Term> {
        if self.is_type() {
            types_of(&*self.ctx.graph, &self.subject)
                .into_iter()
                .map(Term::NamedNode)
                .collect()
        } else {
            self.ctx.graph.each(
                Some(&self.subject),
                Some(self.predicate.as_ref()),
                None,
                Some(self.doc.as_ref()),
            )
        }
    }

    /// The first chosen option.
    pub fn current(&self) -> Option<Term> {
        self.widget()?.selected_terms().into_iter().next()
    }

    /// Whether the data document states `value` itself.
    fn held(&self, value: &Term) -> bool {
        self.ctx.graph.holds(
            &self.subject,
            self.predicate.as_ref(),
            value,
            Some(self.doc.as_ref()),
        )
    }

    /// The data document's statements of `value`; the only ones this select
    /// may delete.
    fn held_statements(&self, value: &Term) -> Vec<Quad> {
        self.ctx.graph.statements_matching(
            Some(&self.subject),
            Some(self.predicate.as_ref()),
            Some(value),
            Some(self.doc.as_ref()),
        )
    }

    fn build_options(&self) -> Vec<SelectOption> {
        let actual = self.actual();
        let mut out = Vec::new();
        let any_chosen = self.possible.iter().any(|p| actual.contains(p));
        if !any_chosen && !self.opts.multiple {
            out.push(SelectOption {
                label: self
                    .opts
                    .null_label
                    .clone()
                    .unwrap_or_else(|| "--- choose ---".to_string()),
                value: OptionValue::Prompt,
                selected: true,
            });
        }
        if let Some(mint) = &self.opts.mint {
            if self.ctx.editable(&self.doc) {
                out.push(SelectOption {
                    label: mint.clone(),
                    value: OptionValue::Mint,
                    selected: false,
                });
            }
        }
        for value in &self.possible {
            let text = if self.opts.disambiguate {
                label_with_ontology(&*self.ctx.graph, value)
            } else {
                label(&*self.ctx.graph, value)
            };
            out.push(SelectOption {
                label: text,
                value: OptionValue::Term(value.clone()),
                selected: actual.contains(value),
            });
        }
        out
    }

    /// Re-read the selection from the graph and unlock the widget.
    pub fn refresh(&self) {
        let Some(widget) = self.widget() else { return };
        widget.set_options(self.build_options());
        if self.ctx.editable(&self.doc) {
            widget.enable();
        }
    }

    /// Statements made redundant by asserting `class`: held sub- and
    /// superclasses, and whatever the selects below this one hold.
    fn retractions(&self, class: &NamedNode) -> Vec<Quad> {
        let graph = &*self.ctx.graph;
        let mut out = Vec::new();
        for related in superclasses_of(graph, class)
            .into_iter()
            .chain(subclasses_of(graph, class))
        {
            out.extend(self.held_statements(&Term::NamedNode(related)));
        }
        let mut below = self.sub_select.borrow().upgrade();
        while let Some(sub) = below {
            for value in &sub.possible {
                out.extend(sub.held_statements(value));
            }
            below = sub.sub_select.borrow().upgrade();
        }
        out
    }

    fn on_change(&self) {
        let Some(select) = self.widget() else { return };
        let chosen = select.selected_terms();
        let mint_chosen = select
            .options()
            .iter()
            .any(|o| o.selected && o.value == OptionValue::Mint);
        let actual = self.actual();

        let mut deletions: Vec<Quad> = Vec::new();
        let mut insertions: Vec<Quad> = Vec::new();
        for value in &self.possible {
            let now = chosen.contains(value);
            let shown = actual.contains(value);
            if shown && !now {
                extend_unique(self.held_statements(value), &mut deletions);
                if self.is_type() && !self.held(value) {
                    if let Term::NamedNode(class) = value {
                        for sub in subclasses_of(&*self.ctx.graph, class) {
                            let held = self.held_statements(&Term::NamedNode(sub));
                            extend_unique(held, &mut deletions);
                        }
                    }
                }
            }
            if now && !shown {
                insertions.extend(statement(
                    &self.subject,
                    self.predicate.as_ref(),
                    value.clone(),
                    self.doc.as_ref(),
                ));
                if let (true, Term::NamedNode(class)) = (self.is_type(), value) {
                    extend_unique(self.retractions(class), &mut deletions);
                }
            }
        }

        let mut minted: Option<Term> = None;
        if mint_chosen {
            if let Some(class) = &self.opts.mint_class {
                let (prompt, _) = prompt_for_new(
                    &self.ctx,
                    Some(&self.subject),
                    Some(&self.predicate),
                    class,
                    self.opts.sub_form.as_ref(),
                    &self.doc,
                    self.done.clone(),
                );
                if let Some(parent) = select.parent() {
                    parent.append(&prompt);
                }
                self.refresh();
                return;
            }
            let object = Term::NamedNode(self.ctx.mint(&self.doc));
            insertions.extend(statement(
                &self.subject,
                self.predicate.as_ref(),
                object.clone(),
                self.doc.as_ref(),
            ));
            minted = Some(object);
        }

        if deletions.is_empty() && insertions.is_empty() {
            return;
        }
        tracing::debug!(
            subject = %self.subject,
            predicate = %self.predicate,
            deletions = deletions.len(),
            insertions = insertions.len(),
            "select changed"
        );
        let feedback = select.parent().unwrap_or_else(|| select.clone());
        let me = self.me.clone();
        let done = self.done.clone();
        self.ctx
            .updater
            .submit(&select, &feedback, deletions, insertions, move |outcome| {
                let Some(control) = me.upgrade() else {
                    done(outcome);
                    return;
                };
                control.refresh();
                let mut above = control.super_select.borrow().upgrade();
                while let Some(sup) = above {
                    sup.refresh();
                    above = sup.super_select.borrow().upgrade();
                }
                if outcome.is_ok() {
                    control.open_sub_form(minted.as_ref());
                }
                done(outcome);
            });
    }

    /// Render the sub-form for a freshly minted object next to the select.
    fn open_sub_form(&self, object: Option<&Term>) {
        let (Some(object), Some(form)) = (object, self.opts.sub_form.as_ref()) else {
            return;
        };
        let Some(parent) = self.widget().and_then(|w| w.parent()) else {
            return;
        };
        append_form(
            &self.ctx,
            Some(&parent),
            &RecursionGuard::new(),
            object,
            form,
            &self.doc,
            self.done.clone(),
        );
    }
}

fn extend_unique(quads: Vec<Quad>, into: &mut Vec<Quad>) {
    for q in quads {
        if !into.contains(&q) {
            into.push(q);
        }
    }
}

/// Build a select over `possible` values of `predicate` on `subject`.
pub fn make_select_for_options(
    ctx: &FormContext,
    subject: &Term,
    predicate: &NamedNode,
    possible: Vec<Term>,
    opts: SelectOptions,
    doc: &NamedNode,
    done: Completion,
) -> Result<(Widget, Rc<SelectControl>), FormError> {
    if possible.is_empty() && opts.mint.is_none() {
        return Err(FormError::schema(predicate, "No options to select from"));
    }
    if opts.mint.is_some() && opts.sub_form.is_none() && opts.mint_class.is_none() {
        return Err(FormError::schema(
            predicate,
            "Minting a new value needs a sub-form or a class",
        ));
    }

    let select = Element::new(ElementKind::Select);
    select.set_multiple(opts.multiple);
    let control = Rc::new_cyclic(|me| SelectControl {
        ctx: ctx.clone(),
        widget: Rc::downgrade(&select),
        subject: subject.clone(),
        predicate: predicate.clone(),
        possible,
        opts,
        doc: doc.clone(),
        done,
        sub_select: RefCell::new(Weak::new()),
        super_select: RefCell::new(Weak::new()),
        me: me.clone(),
    });
    control.refresh();
    if !ctx.editable(doc) {
        select.disable();
    }

    let weak = Rc::downgrade(&control);
    select.on_activate(Rc::new(move || {
        if let Some(c) = weak.upgrade() {
            c.on_change();
        }
    }));
    let weak = Rc::downgrade(&control);
    select.set_refresh(Rc::new(move || {
        if let Some(c) = weak.upgrade() {
            c.refresh();
        }
    }));
    select.retain(control.clone());
    Ok((select, control))
}

/// A type selector for the subclasses of `category`: single choice over an
/// `owl:disjointUnionOf` list, else multiple choice over direct subclasses.
pub fn make_select_for_category(
    ctx: &FormContext,
    subject: &Term,
    category: &NamedNode,
    doc: &NamedNode,
    done: Completion,
) -> Result<(Widget, Rc<SelectControl>), FormError> {
    let category_term = Term::NamedNode(category.clone());
    let union = ctx
        .graph
        .value(&category_term, owl::DISJOINT_UNION_OF)
        .and_then(|head| ctx.graph.collection_elements(&head, None));
    let (possible, multiple) = match union {
        Some(classes) => (classes, false),
        None => (
            direct_subclasses_of(&*ctx.graph, category)
                .into_iter()
                .map(Term::NamedNode)
                .collect(),
            true,
        ),
    };
    match possible.len() {
        0 => {
            return Err(FormError::schema(
                category,
                "Can't do selector with no subclasses of category",
            ));
        }
        1 => {
            return Err(FormError::schema(
                category,
                "Can't do selector with only 1 subclass of category",
            ));
        }
        _ => {}
    }
    let opts = SelectOptions {
        multiple,
        null_label: Some(ctx.config.classify_prompt.clone()),
        ..SelectOptions::default()
    };
    make_select_for_options(
        ctx,
        subject,
        &rdf::TYPE.into_owned(),
        possible,
        opts,
        doc,
        done,
    )
}

/// One level of a nested classifier: its select plus the child selector for
/// the chosen class, rebuilt whenever the choice changes.
struct NestedCategory {
    ctx: FormContext,
    subject: Term,
    doc: NamedNode,
    done: Completion,
    container: Weak<Element>,
    control: RefCell<Option<Rc<SelectControl>>>,
    child: RefCell<Option<Widget>>,
    me: Weak<NestedCategory>,
}

impl NestedCategory {
    fn own_listener(&self) -> Completion {
        let me = self.me.clone();
        Rc::new(move |outcome| {
            let Some(level) = me.upgrade() else { return };
            if outcome.is_ok() {
                level.rebuild_child();
            }
            (level.done)(outcome);
        })
    }

    fn child_listener(&self) -> Completion {
        let me = self.me.clone();
        Rc::new(move |outcome| {
            let Some(level) = me.upgrade() else { return };
            (level.done)(outcome);
        })
    }

    fn rebuild_child(&self) {
        let Some(container) = self.container.upgrade() else {
            return;
        };
        if let Some(old) = self.child.borrow_mut().take() {
            container.remove_child(&old);
        }
        let Some(control) = self.control.borrow().clone() else {
            return;
        };
        *control.sub_select.borrow_mut() = Weak::new();
        let Some(Term::NamedNode(chosen)) = control.current() else {
            return;
        };
        let chosen_term = Term::NamedNode(chosen.clone());
        if self
            .ctx
            .graph
            .value(&chosen_term, owl::DISJOINT_UNION_OF)
            .is_none()
        {
            return;
        }
        tracing::debug!(category = %chosen, "nested classifier level");
        let (child, child_control) =
            nested(&self.ctx, &self.subject, &chosen, &self.doc, self.child_listener());
        if let Some(child_control) = child_control {
            link(&control, &child_control);
        }
        container.append(&child);
        *self.child.borrow_mut() = Some(child);
    }
}

fn nested(
    ctx: &FormContext,
    subject: &Term,
    category: &NamedNode,
    doc: &NamedNode,
    done: Completion,
) -> (Widget, Option<Rc<SelectControl>>) {
    let container = Element::new(ElementKind::Row);
    let level = Rc::new_cyclic(|me| NestedCategory {
        ctx: ctx.clone(),
        subject: subject.clone(),
        doc: doc.clone(),
        done,
        container: Rc::downgrade(&container),
        control: RefCell::new(None),
        child: RefCell::new(None),
        me: me.clone(),
    });
    match make_select_for_category(ctx, subject, category, doc, level.own_listener()) {
        Ok((select, control)) => {
            container.append(&select);
            *level.control.borrow_mut() = Some(control.clone());
            level.rebuild_child();
            container.retain(level);
            (container, Some(control))
        }
        Err(err) => {
            inline_error(Some(&container), err);
            (container, None)
        }
    }
}

/// A chain of category selectors: choosing a class that is itself a disjoint
/// union opens a selector for its subclasses beneath it.
pub fn make_select_for_nested_category(
    ctx: &FormContext,
    subject: &Term,
    category: &NamedNode,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    nested(ctx, subject, category, doc, done).0
}

/// `ui:Classifier`: classify the subject under `ui:category`.
pub fn render_classifier(
    ctx: &FormContext,
    container: Option<&Widget>,
    _guard: &RecursionGuard,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    let Some(Term::NamedNode(category)) = ctx.graph.value(form, ui::CATEGORY) else {
        return inline_error(container, FormError::schema(form, "No category for classifier"));
    };
    let widget = make_select_for_nested_category(ctx, subject, &category, doc, done);
    if let Some(c) = container {
        c.append(&widget);
    }
    widget
}
