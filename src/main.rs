//! rdf-forms CLI: render RDF-described forms as widget outlines.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use futures::executor::LocalPool;
use miette::{IntoDiagnostic, Result};
use oxigraph::model::{NamedNode, Term};

use rdf_forms::config::FormsConfig;
use rdf_forms::error::{FormsError, GraphError};
use rdf_forms::forms::{FieldRegistry, FormContext, RecursionGuard, append_form, forms_for, ignore};
use rdf_forms::graph::{MemoryGraph, document_of};
use rdf_forms::label::label;

#[derive(Parser)]
#[command(name = "rdf-forms", version, about = "Schema-driven forms over RDF graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a form about a subject and print the resulting widget tree.
    Render {
        /// Turtle file holding the form definitions.
        #[arg(long)]
        schema: PathBuf,

        /// Turtle file holding the data being edited.
        #[arg(long)]
        data: PathBuf,

        /// IRI of the form (or field) to render.
        #[arg(long)]
        form: String,

        /// IRI of the subject the form is about.
        #[arg(long)]
        subject: String,

        /// Data document IRI (default: the subject's document).
        #[arg(long)]
        doc: Option<String>,

        /// Treat the data document as read-only.
        #[arg(long)]
        read_only: bool,

        /// TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print a JSON snapshot instead of the outline.
        #[arg(long)]
        json: bool,
    },

    /// List the registered field types.
    Fields,

    /// List the creation and annotation forms that apply to a subject.
    Suggest {
        /// Turtle file holding the form definitions.
        #[arg(long)]
        schema: PathBuf,

        /// Turtle file holding the data.
        #[arg(long)]
        data: PathBuf,

        /// IRI of the subject.
        #[arg(long)]
        subject: String,
    },
}

fn iri(text: &str) -> std::result::Result<NamedNode, FormsError> {
    NamedNode::new(text).map_err(|e| {
        GraphError::InvalidIri {
            iri: text.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn document(node: &NamedNode) -> NamedNode {
    document_of(&Term::NamedNode(node.clone())).unwrap_or_else(|| node.clone())
}

/// Load the schema into the form's document and the data into `data_doc`.
fn load(
    schema: &Path,
    schema_doc: &NamedNode,
    data: &Path,
    data_doc: &NamedNode,
) -> std::result::Result<Rc<MemoryGraph>, FormsError> {
    let graph = Rc::new(MemoryGraph::new());
    let n = graph.load_file(schema, schema_doc)?;
    tracing::info!(file = %schema.display(), statements = n, "loaded schema");
    let n = graph.load_file(data, data_doc)?;
    tracing::info!(file = %data.display(), statements = n, "loaded data");
    Ok(graph)
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            schema,
            data,
            form,
            subject,
            doc,
            read_only,
            config,
            json,
        } => {
            let form = iri(&form)?;
            let subject = iri(&subject)?;
            let data_doc = match doc {
                Some(d) => iri(&d)?,
                None => document(&subject),
            };
            let config = match config {
                Some(path) => FormsConfig::load(&path).map_err(FormsError::from)?,
                None => FormsConfig::default(),
            };

            let graph = load(&schema, &document(&form), &data, &data_doc)?;
            let mut pool = LocalPool::new();
            let (ctx, transport) = FormContext::in_memory(graph, Rc::new(pool.spawner()));
            let ctx = ctx.with_config(config);
            if read_only {
                transport.set_read_only(&data_doc);
            }

            let widget = append_form(
                &ctx,
                None,
                &RecursionGuard::new(),
                &Term::NamedNode(subject),
                &Term::NamedNode(form),
                &data_doc,
                ignore(),
            );
            pool.run_until_stalled();

            if json {
                let out = serde_json::to_string_pretty(&widget.snapshot()).into_diagnostic()?;
                println!("{out}");
            } else {
                print!("{widget}");
            }
            let errors = widget.error_messages();
            if !errors.is_empty() {
                tracing::warn!(count = errors.len(), "form rendered with inline errors");
            }
        }

        Commands::Fields => {
            let registry = FieldRegistry::with_defaults();
            let entries = registry.entries();
            println!("Field types ({}):", entries.len());
            for (field_type, kind) in entries {
                println!("  {:<45} {}", field_type.as_str(), kind.name());
            }
        }

        Commands::Suggest {
            schema,
            data,
            subject,
        } => {
            let subject = iri(&subject)?;
            let data_doc = document(&subject);
            let absolute = std::fs::canonicalize(&schema).into_diagnostic()?;
            let schema_doc = iri(&format!("file://{}", absolute.display()))?;
            let graph = load(&schema, &schema_doc, &data, &data_doc)?;
            let forms = forms_for(&*graph, &Term::NamedNode(subject.clone()));
            if forms.is_empty() {
                println!("No forms apply to {subject}.");
            } else {
                println!("Forms for {subject} ({}):", forms.len());
                for form in &forms {
                    println!("  {form} \"{}\"", label(&*graph, form));
                }
            }
        }
    }

    Ok(())
}
