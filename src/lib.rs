// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # rdf-forms
//!
//! Schema-driven editing forms bound to a mutable RDF graph. A form is itself
//! described in RDF with the `ui:` vocabulary; rendering walks the form
//! definition and produces a live widget tree whose edits are written back as
//! atomic delete/insert updates.
//!
//! ## Architecture
//!
//! - **Graph access** (`graph`): pattern queries, type hierarchy, RDF collections,
//!   and an in-memory store over `oxigraph` datasets
//! - **Updates** (`update`): the single write path and its transport
//! - **Widgets** (`widget`): the retained element tree handed to a host
//! - **Forms** (`forms`): field registry, recursion guard and the renderers
//! - **Collaborators** (`catalog`, `search`, `mint`, `label`): vocabulary
//!   catalogs, autocomplete search, identifier minting, display labels
//!
//! ## Library usage
//!
//! ```no_run
//! use std::rc::Rc;
//! use futures::executor::LocalPool;
//! use oxigraph::model::{NamedNode, Term};
//! use rdf_forms::forms::{FormContext, RecursionGuard, append_form, ignore};
//! use rdf_forms::graph::MemoryGraph;
//!
//! let doc = NamedNode::new("https://example.org/todo").unwrap();
//! let graph = Rc::new(MemoryGraph::new());
//! graph.load_file("todo-form.ttl".as_ref(), &doc).unwrap();
//!
//! let mut pool = LocalPool::new();
//! let (ctx, _transport) = FormContext::in_memory(graph, Rc::new(pool.spawner()));
//! let subject = Term::NamedNode(NamedNode::new("https://example.org/todo#task1").unwrap());
//! let form = Term::NamedNode(NamedNode::new("https://example.org/todo#form").unwrap());
//! let widget = append_form(&ctx, None, &RecursionGuard::new(), &subject, &form, &doc, ignore());
//! pool.run_until_stalled();
//! println!("{widget}");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod forms;
pub mod graph;
pub mod label;
pub mod mint;
pub mod search;
pub mod update;
pub mod vocab;
pub mod widget;
