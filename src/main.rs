//! reqdoc — normalize, render and edit LLM-generated requirements documents.
//!
//! - `reqdoc render draft.txt -f html` renders raw model output
//! - `reqdoc edit doc.json --category performance --lines perf.txt` folds an edit back in
//! - `reqdoc generate "a booking app" --backend http://localhost:8080` asks the generator
//! - `reqdoc export doc.json --as pdf -o out/` calls an export service

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reqdoc::backend::{Backend, HttpBackend};
use reqdoc::config::BackendConfig;
use reqdoc::export::{
    artifact_file_name, artifact_stem, text_download, write_atomic, ArtifactKind, ExportPayload,
};
use reqdoc::generate::{generate, Generated};
use reqdoc::render::html::HtmlRenderer;
use reqdoc::render::{create_renderer, render_content};
use reqdoc::{intake, Category, Content, DocumentStore, Error, Taxonomy};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reqdoc",
    about = "Normalize, render and edit LLM-generated requirements documents"
)]
struct Cli {
    /// JSON file overriding the non-functional keyword tables
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render raw model output (file or - for stdin)
    Render {
        input: String,

        /// Output format: markdown (default), html, json
        #[arg(short = 'f', long, default_value = "markdown")]
        format: String,

        /// Write into this directory instead of stdout, named after the title
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the canonical document model as JSON
    Normalize { input: String },

    /// Fold a flat list of edited lines back into a document model
    Edit {
        /// Document model (or raw model output) to edit
        model: PathBuf,

        /// Replace the non-highlighted functional requirements
        #[arg(long, conflicts_with = "category")]
        functional: bool,

        /// Replace one non-functional category
        #[arg(long)]
        category: Option<String>,

        /// File with one statement per line (- for stdin)
        #[arg(long)]
        lines: String,

        /// Write here instead of overwriting MODEL
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Generate a document from a short idea
    Generate {
        idea: String,

        #[command(flatten)]
        backend: BackendArgs,

        /// Write the result into this directory instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Export a document through the print/office export services
    Export {
        input: String,

        #[arg(long = "as", value_enum)]
        kind: ExportKind,

        #[command(flatten)]
        backend: BackendArgs,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct BackendArgs {
    /// Base URL of the generation/export service
    #[arg(long, env = "REQDOC_BACKEND")]
    backend: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

impl BackendArgs {
    fn connect(&self) -> HttpBackend {
        HttpBackend::new(
            BackendConfig::new(&self.backend).with_timeout(Duration::from_secs(self.timeout_secs)),
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    Pdf,
    Docx,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let taxonomy = Taxonomy::load(cli.taxonomy.as_deref()).context("failed to load taxonomy")?;

    let outcome = match cli.command {
        Command::Render {
            input,
            format,
            output,
        } => render(taxonomy, &input, &format, output.as_deref()),
        Command::Normalize { input } => normalize(&input),
        Command::Edit {
            model,
            functional,
            category,
            lines,
            output,
        } => edit(taxonomy, &model, functional, category.as_deref(), &lines, output.as_deref()),
        Command::Generate {
            idea,
            backend,
            output,
        } => generate_cmd(taxonomy, &idea, &backend, output.as_deref()),
        Command::Export {
            input,
            kind,
            backend,
            output,
        } => export(taxonomy, &input, kind, &backend, &output),
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<Error>() {
            // friendly prompt, not an error report
            Some(Error::InputValidation(message)) => {
                eprintln!("{}", message);
                Ok(ExitCode::from(2))
            }
            _ => Err(err),
        },
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read a file, or stdin for `-`.
fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        return Ok(input);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

fn load_store(taxonomy: Taxonomy, input: &str) -> Result<DocumentStore> {
    let text = read_input(input)?;
    let mut store = DocumentStore::new(taxonomy);
    store.load_raw(&serde_json::Value::String(text));
    Ok(store)
}

fn write_into(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
    let path = dir.join(file_name);
    write_atomic(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote artifact");
    Ok(path)
}

fn render(taxonomy: Taxonomy, input: &str, format: &str, output: Option<&Path>) -> Result<()> {
    let store = load_store(taxonomy, input)?;
    let renderer = create_renderer(format)?;

    let Some(dir) = output else {
        print!("{}", store.render(&*renderer)?);
        return Ok(());
    };

    // markdown goes through the download path so opaque text keeps .txt
    let (file_name, bytes) = if renderer.file_extension() == "md" {
        let artifact = store.text_download()?;
        (artifact.file_name, artifact.bytes)
    } else {
        let title = store.model().map(|m| m.title.as_str()).unwrap_or_default();
        (
            format!("{}.{}", artifact_stem(title), renderer.file_extension()),
            store.render(&*renderer)?.into_bytes(),
        )
    };
    let path = write_into(dir, &file_name, &bytes)?;
    println!("{}", path.display());
    Ok(())
}

fn normalize(input: &str) -> Result<()> {
    let text = read_input(input)?;
    match intake::load_text(&text) {
        Content::Structured(model) => {
            println!("{}", serde_json::to_string_pretty(&model)?);
            Ok(())
        }
        Content::Opaque(_) => bail!("input is not a structured requirements document"),
    }
}

fn edit(
    taxonomy: Taxonomy,
    model_path: &Path,
    functional: bool,
    category: Option<&str>,
    lines_path: &str,
    output: Option<&Path>,
) -> Result<()> {
    let path_str = model_path.to_string_lossy();
    let mut store = load_store(taxonomy, &path_str)?;
    let lines: Vec<String> = read_input(lines_path)?.lines().map(str::to_string).collect();

    let model = match (functional, category) {
        (true, None) => store.apply_functional_edit(&lines)?,
        (false, Some(category)) => {
            let category: Category = category.parse()?;
            store.apply_nfr_edit(category, &lines)?
        }
        _ => bail!("pass exactly one of --functional or --category"),
    };

    let json = serde_json::to_string_pretty(model)?;
    let target = output.unwrap_or(model_path);
    write_atomic(target, format!("{}\n", json).as_bytes())
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), "saved edited document");
    Ok(())
}

fn generate_cmd(
    taxonomy: Taxonomy,
    idea: &str,
    backend: &BackendArgs,
    output: Option<&Path>,
) -> Result<()> {
    let content = match generate(&backend.connect(), idea)? {
        Generated::Greeting(text) => {
            println!("{}", text);
            return Ok(());
        }
        Generated::Content(content) => content,
    };

    let (file_name, body) = match &content {
        Content::Structured(model) => (
            format!("{}.json", artifact_stem(&model.title)),
            format!("{}\n", serde_json::to_string_pretty(model)?),
        ),
        Content::Opaque(text) => {
            warn!("generator output is not a structured document; keeping raw text");
            (artifact_file_name("", ArtifactKind::Text), text.clone())
        }
    };

    match output {
        Some(dir) => {
            let path = write_into(dir, &file_name, body.as_bytes())?;
            println!("{}", path.display());
            // the markdown rendition rides along for quick reading
            if content.model().is_some() {
                let artifact = text_download(&content, &taxonomy);
                write_into(dir, &artifact.file_name, &artifact.bytes)?;
            }
        }
        None => print!("{}", body),
    }
    Ok(())
}

fn export(
    taxonomy: Taxonomy,
    input: &str,
    kind: ExportKind,
    backend: &BackendArgs,
    output: &Path,
) -> Result<()> {
    let store = load_store(taxonomy, input)?;
    let content = store.content().context("nothing loaded")?;
    let title = store.model().map(|m| m.title.as_str()).unwrap_or_default();
    let client = backend.connect();

    let (bytes, file_name) = match kind {
        ExportKind::Pdf => {
            let html = render_content(&HtmlRenderer, content, store.taxonomy());
            (client.export_pdf(&html)?, artifact_file_name(title, ArtifactKind::Pdf))
        }
        ExportKind::Docx => {
            let payload = ExportPayload::for_content(content);
            (
                client.export_docx(&payload)?,
                artifact_file_name(payload.title(), ArtifactKind::Docx),
            )
        }
    };

    let path = write_into(output, &file_name, &bytes)?;
    println!("{}", path.display());
    Ok(())
}
