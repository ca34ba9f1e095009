//! Field registry: field-type IRIs to renderer variants, and the dispatcher
//! every recursive render goes through.

use std::collections::HashMap;

use oxigraph::model::{NamedNode, NamedNodeRef, Term};

use crate::error::FormError;
use crate::graph::GraphAccessor;
use crate::graph::hierarchy::{bottom_types, types_of};
use crate::vocab::ui;
use crate::widget::Widget;

use super::guard::RecursionGuard;
use super::params::BasicKind;
use super::{
    Completion, FormContext, autocomplete, checkbox, choice, group, inline_error, multiple,
    options, select, text,
};

/// The renderer a schema node dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Group,
    Options,
    Multiple,
    Choice,
    Classifier,
    Boolean,
    Tristate,
    MultiLineText,
    Comment,
    Heading,
    Autocomplete,
    Basic(BasicKind),
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Group => "group",
            FieldKind::Options => "options",
            FieldKind::Multiple => "multiple",
            FieldKind::Choice => "choice",
            FieldKind::Classifier => "classifier",
            FieldKind::Boolean => "boolean",
            FieldKind::Tristate => "tristate",
            FieldKind::MultiLineText => "multi-line text",
            FieldKind::Comment => "comment",
            FieldKind::Heading => "heading",
            FieldKind::Autocomplete => "autocomplete",
            FieldKind::Basic(_) => "basic",
        }
    }

    /// Render `form` about `subject` with this variant's renderer.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        self,
        ctx: &FormContext,
        container: Option<&Widget>,
        guard: &RecursionGuard,
        subject: &Term,
        form: &Term,
        doc: &NamedNode,
        done: Completion,
    ) -> Widget {
        match self {
            FieldKind::Group => group::render(ctx, container, guard, subject, form, doc, done),
            FieldKind::Options => options::render(ctx, container, guard, subject, form, doc, done),
            FieldKind::Multiple => {
                multiple::render(ctx, container, guard, subject, form, doc, done)
            }
            FieldKind::Choice => choice::render(ctx, container, guard, subject, form, doc, done),
            FieldKind::Classifier => {
                select::render_classifier(ctx, container, guard, subject, form, doc, done)
            }
            FieldKind::Boolean => checkbox::render(ctx, container, subject, form, doc, false, done),
            FieldKind::Tristate => checkbox::render(ctx, container, subject, form, doc, true, done),
            FieldKind::MultiLineText => {
                text::render_multiline(ctx, container, subject, form, doc, done)
            }
            FieldKind::Comment | FieldKind::Heading => {
                text::render_comment(ctx, container, form, doc, self == FieldKind::Heading)
            }
            FieldKind::Autocomplete => {
                autocomplete::render(ctx, container, subject, form, doc, done)
            }
            FieldKind::Basic(kind) => {
                text::render_basic(ctx, container, subject, form, doc, kind, done)
            }
        }
    }
}

fn ui_class(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{}{local}", ui::NS))
}

/// Field-type IRI to [`FieldKind`] table.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    kinds: HashMap<NamedNode, FieldKind>,
}

impl FieldRegistry {
    /// A registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every field class of the `ui:` vocabulary.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        let fixed: [(NamedNodeRef<'_>, FieldKind); 12] = [
            (ui::FORM, FieldKind::Group),
            (ui::GROUP, FieldKind::Group),
            (ui::OPTIONS, FieldKind::Options),
            (ui::MULTIPLE, FieldKind::Multiple),
            (ui::CHOICE, FieldKind::Choice),
            (ui::CLASSIFIER, FieldKind::Classifier),
            (ui::BOOLEAN_FIELD, FieldKind::Boolean),
            (ui::TRISTATE_FIELD, FieldKind::Tristate),
            (ui::MULTI_LINE_TEXT_FIELD, FieldKind::MultiLineText),
            (ui::COMMENT, FieldKind::Comment),
            (ui::HEADING, FieldKind::Heading),
            (ui::AUTOCOMPLETE_FIELD, FieldKind::Autocomplete),
        ];
        for (iri, kind) in fixed {
            registry.register(iri.into_owned(), kind);
        }
        for kind in BasicKind::ALL {
            registry.register(ui_class(kind.class_name()), FieldKind::Basic(kind));
        }
        registry
    }

    pub fn register(&mut self, field_type: NamedNode, kind: FieldKind) {
        self.kinds.insert(field_type, kind);
    }

    pub fn kind_for(&self, field_type: &NamedNode) -> Option<FieldKind> {
        self.kinds.get(field_type).copied()
    }

    /// All registrations, sorted by IRI.
    pub fn entries(&self) -> Vec<(NamedNode, FieldKind)> {
        let mut out: Vec<(NamedNode, FieldKind)> =
            self.kinds.iter().map(|(k, v)| (k.clone(), *v)).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// The renderer for `field`: the registered kind of its most specific type.
    ///
    /// Bottom types are tried first; failing those, the remaining types in
    /// nearest-first order, so a field typed with a subclass of a registered
    /// class still resolves.
    pub fn resolve<G: GraphAccessor + ?Sized>(
        &self,
        graph: &G,
        field: &Term,
    ) -> Result<FieldKind, FormError> {
        let types = types_of(graph, field);
        let bottom = bottom_types(graph, &types);
        bottom
            .iter()
            .chain(types.iter())
            .find_map(|t| self.kind_for(t))
            .ok_or_else(|| FormError::UnknownFieldType {
                node: field.to_string(),
                field_type: bottom
                    .first()
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "(untyped)".to_string()),
            })
    }
}

/// Resolve and render one field. A field that cannot be resolved renders as
/// an inline error in place.
pub fn render_field(
    ctx: &FormContext,
    container: Option<&Widget>,
    guard: &RecursionGuard,
    subject: &Term,
    form: &Term,
    doc: &NamedNode,
    done: Completion,
) -> Widget {
    match ctx.registry.resolve(&*ctx.graph, form) {
        Ok(kind) => {
            tracing::debug!(field = %form, kind = kind.name(), subject = %subject, "render field");
            kind.render(ctx, container, guard, subject, form, doc, done)
        }
        Err(err) => inline_error(container, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;

    fn load(ttl: &str) -> MemoryGraph {
        let g = MemoryGraph::new();
        g.load_turtle(ttl.as_bytes(), &NamedNode::new_unchecked("http://ex.org/f"))
            .unwrap();
        g
    }

    fn node(local: &str) -> Term {
        Term::NamedNode(NamedNode::new_unchecked(format!("http://ex.org/f#{local}")))
    }

    #[test]
    fn resolves_most_specific_registered_type() {
        let g = load(
            r#"
            @prefix ui: <http://www.w3.org/ns/ui#> .
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            <#MyTitle> rdfs:subClassOf ui:SingleLineTextField .
            <#a> a ui:Group .
            <#b> a ui:BooleanField, ui:TristateField .
            <#c> a <#MyTitle> .
            <#d> a ui:IntegerField .
            "#,
        );
        let registry = FieldRegistry::with_defaults();
        assert_eq!(registry.resolve(&g, &node("a")), Ok(FieldKind::Group));
        assert!(matches!(
            registry.resolve(&g, &node("b")),
            Ok(FieldKind::Boolean | FieldKind::Tristate)
        ));
        assert_eq!(
            registry.resolve(&g, &node("c")),
            Ok(FieldKind::Basic(BasicKind::SingleLineText))
        );
        assert_eq!(
            registry.resolve(&g, &node("d")),
            Ok(FieldKind::Basic(BasicKind::Integer))
        );
    }

    #[test]
    fn untyped_and_unknown_fields_fail() {
        let g = load("<#x> a <#Widget> .");
        let registry = FieldRegistry::with_defaults();
        let err = registry.resolve(&g, &node("x")).unwrap_err();
        assert!(matches!(
            err,
            FormError::UnknownFieldType { ref field_type, .. } if field_type.contains("Widget")
        ));
        let err = registry.resolve(&g, &node("nothing")).unwrap_err();
        assert!(matches!(
            err,
            FormError::UnknownFieldType { ref field_type, .. } if field_type == "(untyped)"
        ));
    }
}
