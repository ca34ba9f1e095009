//! Type hierarchy queries over `rdf:type` and `rdfs:subClassOf`.
//!
//! All walks are breadth-first with a visited set, so cyclic subclass
//! declarations terminate.

use std::collections::{HashSet, VecDeque};

use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{NamedNode, Term};

use super::GraphAccessor;

fn named(term: Term) -> Option<NamedNode> {
    match term {
        Term::NamedNode(n) => Some(n),
        _ => None,
    }
}

fn closure<G, F>(graph: &G, start: &NamedNode, step: F) -> Vec<NamedNode>
where
    G: GraphAccessor + ?Sized,
    F: Fn(&G, &Term) -> Vec<Term>,
{
    let mut visited: HashSet<NamedNode> = HashSet::new();
    let mut out = Vec::new();
    let mut queue: VecDeque<NamedNode> = VecDeque::new();
    visited.insert(start.clone());
    queue.push_back(start.clone());

    while let Some(class) = queue.pop_front() {
        for next in step(graph, &Term::NamedNode(class)) {
            let Some(next) = named(next) else { continue };
            if visited.insert(next.clone()) {
                out.push(next.clone());
                queue.push_back(next);
            }
        }
    }
    out
}

/// Strict superclasses of `class`, nearest first.
pub fn superclasses_of<G: GraphAccessor + ?Sized>(graph: &G, class: &NamedNode) -> Vec<NamedNode> {
    closure(graph, class, |g, c| g.values(c, rdfs::SUB_CLASS_OF))
}

/// Strict subclasses of `class`, nearest first.
pub fn subclasses_of<G: GraphAccessor + ?Sized>(graph: &G, class: &NamedNode) -> Vec<NamedNode> {
    closure(graph, class, |g, c| {
        g.each(None, Some(rdfs::SUB_CLASS_OF), Some(c), None)
    })
}

/// Classes declared directly as `rdfs:subClassOf` `class`.
pub fn direct_subclasses_of<G: GraphAccessor + ?Sized>(
    graph: &G,
    class: &NamedNode,
) -> Vec<NamedNode> {
    graph
        .each(
            None,
            Some(rdfs::SUB_CLASS_OF),
            Some(&Term::NamedNode(class.clone())),
            None,
        )
        .into_iter()
        .filter_map(named)
        .collect()
}

/// Every type of `subject`: its declared types plus all their superclasses.
pub fn types_of<G: GraphAccessor + ?Sized>(graph: &G, subject: &Term) -> Vec<NamedNode> {
    let mut out: Vec<NamedNode> = Vec::new();
    for declared in graph.values(subject, rdf::TYPE).into_iter().filter_map(named) {
        if !out.contains(&declared) {
            out.push(declared.clone());
        }
        for sup in superclasses_of(graph, &declared) {
            if !out.contains(&sup) {
                out.push(sup);
            }
        }
    }
    out
}

/// The most specific members of `types`: those that are not a superclass of
/// another member.
pub fn bottom_types<G: GraphAccessor + ?Sized>(graph: &G, types: &[NamedNode]) -> Vec<NamedNode> {
    let mut redundant: HashSet<NamedNode> = HashSet::new();
    for t in types {
        for sup in superclasses_of(graph, t) {
            if &sup != t {
                redundant.insert(sup);
            }
        }
    }
    types
        .iter()
        .filter(|t| !redundant.contains(*t))
        .cloned()
        .collect()
}

/// Instances of `class` or of any of its subclasses.
pub fn members_of<G: GraphAccessor + ?Sized>(graph: &G, class: &NamedNode) -> Vec<Term> {
    let mut classes = vec![class.clone()];
    classes.extend(subclasses_of(graph, class));

    let mut out: Vec<Term> = Vec::new();
    for c in classes {
        for member in graph.each(None, Some(rdf::TYPE), Some(&Term::NamedNode(c)), None) {
            if !out.contains(&member) {
                out.push(member);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{statement, MemoryGraph};

    fn n(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://ex.org/o#{local}"))
    }

    fn t(local: &str) -> Term {
        Term::NamedNode(n(local))
    }

    fn graph_with(edges: &[(&str, &str)], typed: &[(&str, &str)]) -> MemoryGraph {
        let graph = MemoryGraph::new();
        let doc = NamedNode::new_unchecked("http://ex.org/o");
        for (sub, sup) in edges {
            graph.insert(&statement(&t(sub), rdfs::SUB_CLASS_OF, t(sup), doc.as_ref()).unwrap());
        }
        for (inst, class) in typed {
            graph.insert(&statement(&t(inst), rdf::TYPE, t(class), doc.as_ref()).unwrap());
        }
        graph
    }

    #[test]
    fn types_include_superclasses() {
        let g = graph_with(&[("Cat", "Mammal"), ("Mammal", "Animal")], &[("tom", "Cat")]);
        let types = types_of(&g, &t("tom"));
        assert_eq!(types, vec![n("Cat"), n("Mammal"), n("Animal")]);
        assert_eq!(bottom_types(&g, &types), vec![n("Cat")]);
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let g = graph_with(&[("A", "B"), ("B", "A")], &[]);
        assert_eq!(superclasses_of(&g, &n("A")), vec![n("B")]);
    }

    #[test]
    fn members_cover_subclasses() {
        let g = graph_with(&[("Cat", "Animal")], &[("tom", "Cat"), ("rex", "Animal")]);
        let members = members_of(&g, &n("Animal"));
        assert!(members.contains(&t("tom")));
        assert!(members.contains(&t("rex")));
        assert_eq!(direct_subclasses_of(&g, &n("Animal")), vec![n("Cat")]);
    }
}
