//! Rich diagnostic error types for the forms engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. Field-level failures ([`FormError`]) are
//! never propagated through the widget tree: renderers turn them into inline
//! error blocks where the failing widget would have been.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the crate's fallible entry points (loading,
/// configuration, CLI).
#[derive(Debug, Error, Diagnostic)]
pub enum FormsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias for crate-level results.
pub type FormsResult<T> = std::result::Result<T, FormsError>;

// ---------------------------------------------------------------------------
// Field errors
// ---------------------------------------------------------------------------

/// Outcome of a single field: what a completion callback receives and what an
/// inline error block displays.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FormError {
    #[error("{message} ({node})")]
    #[diagnostic(
        code(forms::schema),
        help(
            "The form definition is missing a required edge such as ui:property, \
             ui:from, ui:use or ui:category. Fix the schema; sibling fields still render."
        )
    )]
    Schema { node: String, message: String },

    #[error("loop detected: {key} is already being rendered above")]
    #[diagnostic(
        code(forms::loop_detected),
        help("The form refers back to itself for the same subject. The repeat is shown as a stub.")
    )]
    LoopDetected { key: String },

    #[error("error saving to {document}: {message}")]
    #[diagnostic(
        code(forms::update_failed),
        help("The remote store rejected the change. The control is re-enabled; retry by editing again.")
    )]
    UpdateFailure { document: String, message: String },

    #[error("inconsistent data: {message}")]
    #[diagnostic(
        code(forms::inconsistent),
        help("Both the affirming and the negating statements are present. Remove one of them.")
    )]
    InconsistentData { message: String },

    #[error("unknown field type {field_type} for {node}")]
    #[diagnostic(
        code(forms::unknown_field_type),
        help("Declare the field with one of the registered ui: field classes, or register the type.")
    )]
    UnknownFieldType { node: String, field_type: String },
}

impl FormError {
    pub fn schema(node: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Schema {
            node: node.to_string(),
            message: message.into(),
        }
    }
}

/// What every completion callback is given.
pub type FieldOutcome = std::result::Result<(), FormError>;

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("invalid IRI {iri:?}: {message}")]
    #[diagnostic(
        code(forms::graph::iri),
        help("Use an absolute IRI such as https://example.org/doc#thing.")
    )]
    InvalidIri { iri: String, message: String },

    #[error("failed to parse {source_name}: {message}")]
    #[diagnostic(
        code(forms::graph::parse),
        help("The input must be valid Turtle. Check the reported line for syntax errors.")
    )]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("I/O error reading {path}: {source}")]
    #[diagnostic(
        code(forms::graph::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

// ---------------------------------------------------------------------------
// Update transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum UpdateError {
    #[error("document {document} is not editable")]
    #[diagnostic(
        code(forms::update::read_only),
        help("The transport reports the document as read-only; no statements were changed.")
    )]
    ReadOnly { document: String },

    #[error("statement to delete does not hold: {statement}")]
    #[diagnostic(
        code(forms::update::conflict),
        help("Someone else changed the data first. Refresh the form and try again.")
    )]
    Conflict { statement: String },

    #[error("update rejected: {message}")]
    #[diagnostic(code(forms::update::rejected))]
    Rejected { message: String },

    #[error("update abandoned before completion")]
    #[diagnostic(
        code(forms::update::abandoned),
        help("The transport was dropped while the write was pending.")
    )]
    Abandoned,
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    #[diagnostic(code(forms::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {message}")]
    #[diagnostic(
        code(forms::config::parse),
        help("The configuration file must be TOML with the keys documented on FormsConfig.")
    )]
    Parse { message: String },
}
