//! Retained widget tree: the engine's stand-in for the host UI.
//!
//! Renderers build [`Element`]s and wire handlers onto them; a host (a browser
//! bridge, a TUI, or a test) displays the tree and forwards user actions
//! through [`Element::click`], [`Element::type_text`], [`Element::commit`] and
//! [`Element::choose`]. Elements are shared through `Rc` and keep a weak
//! back-pointer to their parent so a widget can be swapped in place.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use oxigraph::model::Term;
use serde::Serialize;

/// A node in the widget tree.
pub type Widget = Rc<Element>;

/// A callback attached to an element.
pub type Handler = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Container,
    Row,
    Text,
    Label,
    Checkbox,
    TextInput,
    TextArea,
    Select,
    Button,
    ErrorBlock,
    LoopStub,
    Notice,
}

/// What a select option stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// "Nothing selected" placeholder.
    Prompt,
    /// Synthetic "create a new one" entry.
    Mint,
    Term(Term),
}

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub label: String,
    pub value: OptionValue,
    pub selected: bool,
}

impl SelectOption {
    pub fn term(&self) -> Option<&Term> {
        match &self.value {
            OptionValue::Term(t) => Some(t),
            _ => None,
        }
    }
}

/// One UI element.
pub struct Element {
    kind: ElementKind,
    text: RefCell<String>,
    attrs: RefCell<BTreeMap<String, String>>,
    children: RefCell<Vec<Widget>>,
    parent: RefCell<Weak<Element>>,
    disabled: Cell<bool>,
    hidden: Cell<bool>,
    dirty: Cell<bool>,
    toggle: Cell<Option<bool>>,
    multiple: Cell<bool>,
    options: RefCell<Vec<SelectOption>>,
    subject: RefCell<Option<Term>>,
    on_refresh: RefCell<Option<Handler>>,
    on_activate: RefCell<Option<Handler>>,
    retained: RefCell<Vec<Rc<dyn Any>>>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Widget {
        Rc::new(Self {
            kind,
            text: RefCell::new(String::new()),
            attrs: RefCell::new(BTreeMap::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            disabled: Cell::new(false),
            hidden: Cell::new(false),
            dirty: Cell::new(false),
            toggle: Cell::new(None),
            multiple: Cell::new(false),
            options: RefCell::new(Vec::new()),
            subject: RefCell::new(None),
            on_refresh: RefCell::new(None),
            on_activate: RefCell::new(None),
            retained: RefCell::new(Vec::new()),
        })
    }

    pub fn with_text(kind: ElementKind, text: impl Into<String>) -> Widget {
        let el = Self::new(kind);
        el.set_text(text);
        el
    }

    /// An inline error message block, shown where a failing widget would be.
    pub fn error_block(message: impl Into<String>) -> Widget {
        let el = Self::with_text(ElementKind::ErrorBlock, message);
        el.set_attr("style", "margin: 0.1em; padding: 0.5em; background-color: #fee;");
        el
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.attrs.borrow().get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: impl Into<String>) {
        self.attrs.borrow_mut().insert(name.to_string(), value.into());
    }

    // -----------------------------------------------------------------------
    // Tree structure
    // -----------------------------------------------------------------------

    pub fn children(&self) -> Vec<Widget> {
        self.children.borrow().clone()
    }

    pub fn parent(&self) -> Option<Widget> {
        self.parent.borrow().upgrade()
    }

    fn adopt(self: &Rc<Self>, child: &Widget) {
        child.detach();
        *child.parent.borrow_mut() = Rc::downgrade(self);
    }

    /// Append `child`, moving it out of any previous parent.
    pub fn append(self: &Rc<Self>, child: &Widget) {
        self.adopt(child);
        self.children.borrow_mut().push(child.clone());
    }

    /// Insert `child` before `reference`, or at the end if `reference` is not a child.
    pub fn insert_before(self: &Rc<Self>, child: &Widget, reference: &Widget) {
        self.adopt(child);
        let mut children = self.children.borrow_mut();
        match children.iter().position(|c| Rc::ptr_eq(c, reference)) {
            Some(i) => children.insert(i, child.clone()),
            None => children.push(child.clone()),
        }
    }

    /// Swap `old` for `new` in place. Returns `false` if `old` is not a child.
    pub fn replace_child(self: &Rc<Self>, old: &Widget, new: &Widget) -> bool {
        if Rc::ptr_eq(old, new) {
            return true;
        }
        let Some(i) = self.children.borrow().iter().position(|c| Rc::ptr_eq(c, old)) else {
            return false;
        };
        self.adopt(new);
        // adopting may have shifted `old` if `new` was an earlier sibling
        let i = self
            .children
            .borrow()
            .iter()
            .position(|c| Rc::ptr_eq(c, old))
            .unwrap_or(i);
        self.children.borrow_mut()[i] = new.clone();
        *old.parent.borrow_mut() = Weak::new();
        true
    }

    pub fn remove_child(&self, child: &Widget) -> bool {
        let mut children = self.children.borrow_mut();
        match children.iter().position(|c| Rc::ptr_eq(c, child)) {
            Some(i) => {
                children.remove(i);
                *child.parent.borrow_mut() = Weak::new();
                true
            }
            None => false,
        }
    }

    /// Replace all children, in the given order.
    pub fn set_children(self: &Rc<Self>, children: Vec<Widget>) {
        let old = std::mem::take(&mut *self.children.borrow_mut());
        for c in &old {
            *c.parent.borrow_mut() = Weak::new();
        }
        for c in &children {
            self.adopt(c);
        }
        *self.children.borrow_mut() = children;
    }

    /// Remove this element from its parent, if any.
    pub fn detach(self: &Rc<Self>) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// This element followed by all descendants, depth first.
    pub fn descendants(self: &Rc<Self>) -> Vec<Widget> {
        let mut out = vec![self.clone()];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    pub fn find_all(self: &Rc<Self>, kind: ElementKind) -> Vec<Widget> {
        self.descendants()
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }

    /// First descendant of `kind` whose text equals `text`.
    pub fn find_text(self: &Rc<Self>, kind: ElementKind, text: &str) -> Option<Widget> {
        self.descendants()
            .into_iter()
            .find(|e| e.kind == kind && e.text() == text)
    }

    /// Texts of all error blocks in this subtree.
    pub fn error_messages(self: &Rc<Self>) -> Vec<String> {
        self.find_all(ElementKind::ErrorBlock)
            .iter()
            .map(|e| e.text())
            .collect()
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    pub fn disable(&self) {
        self.disabled.set(true);
    }

    pub fn enable(&self) {
        self.disabled.set(false);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Disabled itself or inside a disabled ancestor.
    pub fn is_inert(&self) -> bool {
        self.disabled.get() || self.parent().is_some_and(|p| p.is_inert())
    }

    pub fn hide(&self) {
        self.hidden.set(true);
    }

    pub fn show(&self) {
        self.hidden.set(false);
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    /// Edited but not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.set(dirty);
    }

    /// Checkbox state: `Some(true)`, `Some(false)` or unset.
    pub fn toggle(&self) -> Option<bool> {
        self.toggle.get()
    }

    pub fn set_toggle(&self, state: Option<bool>) {
        self.toggle.set(state);
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple.get()
    }

    pub fn set_multiple(&self, multiple: bool) {
        self.multiple.set(multiple);
    }

    pub fn options(&self) -> Vec<SelectOption> {
        self.options.borrow().clone()
    }

    pub fn set_options(&self, options: Vec<SelectOption>) {
        *self.options.borrow_mut() = options;
    }

    pub fn update_options(&self, f: impl FnOnce(&mut Vec<SelectOption>)) {
        f(&mut self.options.borrow_mut());
    }

    /// Terms of the currently selected options.
    pub fn selected_terms(&self) -> Vec<Term> {
        self.options
            .borrow()
            .iter()
            .filter(|o| o.selected)
            .filter_map(|o| o.term().cloned())
            .collect()
    }

    /// The RDF object this widget represents, for list items.
    pub fn subject(&self) -> Option<Term> {
        self.subject.borrow().clone()
    }

    pub fn set_subject(&self, subject: Term) {
        *self.subject.borrow_mut() = Some(subject);
    }

    /// Keep `value` alive as long as this element.
    pub fn retain(&self, value: Rc<dyn Any>) {
        self.retained.borrow_mut().push(value);
    }

    // -----------------------------------------------------------------------
    // Handlers and host interaction
    // -----------------------------------------------------------------------

    pub fn set_refresh(&self, handler: Handler) {
        *self.on_refresh.borrow_mut() = Some(handler);
    }

    pub fn has_refresh(&self) -> bool {
        self.on_refresh.borrow().is_some()
    }

    /// Pull the latest graph state into the display.
    pub fn refresh(&self) {
        let handler = self.on_refresh.borrow().clone();
        if let Some(h) = handler {
            h();
        }
    }

    pub fn on_activate(&self, handler: Handler) {
        *self.on_activate.borrow_mut() = Some(handler);
    }

    /// Fire the activation handler. Returns `false` if the element is inert or
    /// has no handler.
    pub fn activate(&self) -> bool {
        if self.is_inert() {
            return false;
        }
        let handler = self.on_activate.borrow().clone();
        match handler {
            Some(h) => {
                h();
                true
            }
            None => false,
        }
    }

    /// A button press or checkbox toggle.
    pub fn click(&self) -> bool {
        self.activate()
    }

    /// Keystrokes into a text input: update the value and mark it unsaved.
    pub fn type_text(&self, text: impl Into<String>) -> bool {
        if self.is_inert() {
            return false;
        }
        self.set_text(text);
        self.dirty.set(true);
        true
    }

    /// Save an edited text input (the "change" event).
    pub fn commit(&self) -> bool {
        self.activate()
    }

    /// Select exactly the options carrying `terms`, then fire the change handler.
    pub fn choose(&self, terms: &[Term]) -> bool {
        if self.is_inert() {
            return false;
        }
        self.update_options(|opts| {
            for o in opts.iter_mut() {
                o.selected = o.term().is_some_and(|t| terms.contains(t));
            }
        });
        self.activate()
    }

    /// Select the "mint new" option, then fire the change handler.
    pub fn choose_mint(&self) -> bool {
        if self.is_inert() {
            return false;
        }
        self.update_options(|opts| {
            for o in opts.iter_mut() {
                o.selected = o.value == OptionValue::Mint;
            }
        });
        self.activate()
    }

    // -----------------------------------------------------------------------
    // Presentation
    // -----------------------------------------------------------------------

    fn describe(&self) -> String {
        let mut line = format!("{:?}", self.kind).to_lowercase();
        let text = self.text();
        match self.kind {
            ElementKind::Checkbox => {
                line.push_str(match self.toggle() {
                    Some(true) => " [x]",
                    Some(false) => " [ ]",
                    None => " [-]",
                });
            }
            ElementKind::Select => {
                let chosen: Vec<String> = self
                    .options()
                    .iter()
                    .filter(|o| o.selected)
                    .map(|o| o.label.clone())
                    .collect();
                line.push_str(&format!(" <{}>", chosen.join(", ")));
            }
            _ => {}
        }
        if !text.is_empty() {
            line.push_str(&format!(" {text:?}"));
        }
        if self.is_disabled() {
            line.push_str(" (disabled)");
        }
        if self.is_hidden() {
            line.push_str(" (hidden)");
        }
        line
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{}{}", "  ".repeat(depth), self.describe())?;
        for child in self.children() {
            child.write_outline(f, depth + 1)?;
        }
        Ok(())
    }

    /// Serializable copy of this subtree.
    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            kind: self.kind,
            text: self.text(),
            disabled: self.is_disabled(),
            hidden: self.is_hidden(),
            toggle: self.toggle(),
            subject: self.subject().map(|t| t.to_string()),
            options: self
                .options()
                .into_iter()
                .map(|o| (o.label, o.selected))
                .collect(),
            children: self.children().iter().map(|c| c.snapshot()).collect(),
        }
    }
}

/// Indented outline of the subtree, one element per line.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("text", &self.text())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

/// Plain-data view of a widget subtree, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<(String, bool)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<WidgetSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_child_keeps_position() {
        let parent = Element::new(ElementKind::Container);
        let a = Element::with_text(ElementKind::Text, "a");
        let b = Element::with_text(ElementKind::Text, "b");
        let c = Element::with_text(ElementKind::Text, "c");
        parent.append(&a);
        parent.append(&b);
        assert!(parent.replace_child(&a, &c));
        let texts: Vec<String> = parent.children().iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["c", "b"]);
        assert!(a.parent().is_none());
        assert!(Rc::ptr_eq(&c.parent().unwrap(), &parent));
    }

    #[test]
    fn append_moves_between_parents() {
        let p1 = Element::new(ElementKind::Container);
        let p2 = Element::new(ElementKind::Container);
        let child = Element::new(ElementKind::Text);
        p1.append(&child);
        p2.append(&child);
        assert!(p1.children().is_empty());
        assert_eq!(p2.children().len(), 1);
    }

    #[test]
    fn disabled_elements_ignore_activation() {
        let button = Element::with_text(ElementKind::Button, "go");
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        button.on_activate(Rc::new(move || h.set(h.get() + 1)));
        assert!(button.click());
        button.disable();
        assert!(!button.click());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn outline_lists_nested_elements() {
        let root = Element::new(ElementKind::Container);
        let row = Element::new(ElementKind::Row);
        root.append(&row);
        row.append(&Element::with_text(ElementKind::Label, "Title"));
        let out = root.to_string();
        assert_eq!(out, "container\n  row\n    label \"Title\"\n");
    }
}
