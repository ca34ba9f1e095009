//! Vocabulary catalog: which classes and properties exist.
//!
//! Choice fields whose `ui:from` is `rdfs:Class`, `rdf:Property`,
//! `owl:ObjectProperty` or `owl:DatatypeProperty` list vocabulary terms rather
//! than instances. Those lists come from a [`Catalog`].

use std::collections::BTreeMap;
use std::rc::Rc;

use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{NamedNode, Term};

use crate::graph::GraphAccessor;
use crate::vocab::owl;

/// Properties sorted by the kind of value they take.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTriage {
    /// Properties whose values are resources.
    pub object: Vec<NamedNode>,
    /// Properties whose values are literals.
    pub datatype: Vec<NamedNode>,
    /// Properties used with both.
    pub mixed: Vec<NamedNode>,
}

pub trait Catalog {
    /// Every class known to the application.
    fn all_classes(&self) -> Vec<NamedNode>;

    /// Every known property, split by value kind.
    fn property_triage(&self) -> PropertyTriage;
}

/// A [`Catalog`] derived from what a graph declares and uses.
pub struct GraphCatalog {
    graph: Rc<dyn GraphAccessor>,
}

impl GraphCatalog {
    pub fn new(graph: Rc<dyn GraphAccessor>) -> Self {
        Self { graph }
    }
}

fn push_named(out: &mut Vec<NamedNode>, term: Term) {
    match term {
        Term::NamedNode(n) if !out.contains(&n) => out.push(n),
        _ => {}
    }
}

impl Catalog for GraphCatalog {
    fn all_classes(&self) -> Vec<NamedNode> {
        let g = &self.graph;
        let mut out = Vec::new();
        for class in [rdfs::CLASS.into_owned(), owl::CLASS.into_owned()] {
            let class = Term::NamedNode(class);
            for t in g.each(None, Some(rdf::TYPE), Some(&class), None) {
                push_named(&mut out, t);
            }
        }
        for q in g.statements_matching(None, Some(rdfs::SUB_CLASS_OF), None, None) {
            push_named(&mut out, q.subject.into());
            push_named(&mut out, q.object);
        }
        for q in g.statements_matching(None, Some(rdf::TYPE), None, None) {
            push_named(&mut out, q.object);
        }
        out.sort();
        out
    }

    fn property_triage(&self) -> PropertyTriage {
        let g = &self.graph;
        let mut triage = PropertyTriage::default();

        let declared = |class: oxigraph::model::NamedNodeRef<'_>| {
            g.each(None, Some(rdf::TYPE), Some(&Term::NamedNode(class.into_owned())), None)
        };
        for p in declared(owl::OBJECT_PROPERTY) {
            push_named(&mut triage.object, p);
        }
        for p in declared(owl::DATATYPE_PROPERTY) {
            push_named(&mut triage.datatype, p);
        }

        // (literal uses, resource uses) per undeclared predicate
        let mut usage: BTreeMap<NamedNode, (usize, usize)> = BTreeMap::new();
        for q in g.statements_matching(None, None, None, None) {
            let p = q.predicate;
            if triage.object.contains(&p) || triage.datatype.contains(&p) {
                continue;
            }
            let entry = usage.entry(p).or_default();
            match q.object {
                Term::Literal(_) => entry.0 += 1,
                _ => entry.1 += 1,
            }
        }
        for (p, (literals, resources)) in usage {
            match (literals, resources) {
                (0, _) => triage.object.push(p),
                (_, 0) => triage.datatype.push(p),
                _ => triage.mixed.push(p),
            }
        }
        triage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;

    #[test]
    fn triage_by_object_kind() {
        let graph = Rc::new(MemoryGraph::new());
        let doc = NamedNode::new_unchecked("http://ex.org/d");
        graph
            .load_turtle(
                r#"
                @prefix ex: <http://ex.org/o#> .
                @prefix owl: <http://www.w3.org/2002/07/owl#> .
                ex:knows a owl:ObjectProperty .
                <#a> ex:name "A" ; ex:friend <#b> ; ex:note "n", <#c> .
                "#
                .as_bytes(),
                &doc,
            )
            .unwrap();
        let catalog = GraphCatalog::new(graph);
        let triage = catalog.property_triage();
        let o = |l: &str| NamedNode::new_unchecked(format!("http://ex.org/o#{l}"));
        assert!(triage.object.contains(&o("knows")));
        assert!(triage.object.contains(&o("friend")));
        assert!(triage.datatype.contains(&o("name")));
        assert_eq!(triage.mixed, vec![o("note")]);
    }

    #[test]
    fn classes_from_types_and_hierarchy() {
        let graph = Rc::new(MemoryGraph::new());
        let doc = NamedNode::new_unchecked("http://ex.org/d");
        graph
            .load_turtle(
                r#"
                @prefix ex: <http://ex.org/o#> .
                @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
                ex:Cat rdfs:subClassOf ex:Animal .
                <#tom> a ex:Cat .
                "#
                .as_bytes(),
                &doc,
            )
            .unwrap();
        let classes = GraphCatalog::new(graph).all_classes();
        assert_eq!(classes.len(), 2);
    }
}
