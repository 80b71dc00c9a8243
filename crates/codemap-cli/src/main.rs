use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use codemap_core::{Document, ItemId};
use codemap_graph::{HighlightSet, LayoutConfig, LayoutEngine, PositionOverrides};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codemap", author, version, about, long_about = None)]
struct Args {
    /// Partial layout configuration (JSON); missing fields keep defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the full diagram layout
    Layout {
        /// Structural document (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Saved file positions, keyed by file path
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Write the layout here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Show what a file or item connects to and from
    Highlight {
        #[arg(short, long)]
        input: PathBuf,

        /// Item id, e.g. `file-0::foo`
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        item: Option<String>,

        /// File path as it appears in the document
        #[arg(long)]
        file: Option<String>,
    },
    /// Print reference resolution statistics
    Stats {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct HighlightReport<'a> {
    outgoing: &'a HighlightSet,
    incoming: &'a HighlightSet,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    #[serde(flatten)]
    build: codemap_graph::BuildStats,
    connections: usize,
    placement_fallbacks: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let rendered = run(&args)?;
    if let Command::Layout {
        output: Some(path), ..
    } = &args.command
    {
        fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Layout written to {}", path.display());
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn run(args: &Args) -> Result<String> {
    let config = match &args.config {
        Some(path) => read_json::<LayoutConfig>(path)?,
        None => LayoutConfig::default(),
    };
    let engine = LayoutEngine::new(config);

    match &args.command {
        Command::Layout {
            input,
            overrides,
            pretty,
            ..
        } => {
            let document = load_document(input)?;
            let overrides = match overrides {
                Some(path) => read_json::<PositionOverrides>(path)?,
                None => PositionOverrides::new(),
            };
            let output = engine.layout(&document, &overrides);
            to_json(&output.layout, *pretty)
        }
        Command::Highlight { input, item, file } => {
            let document = load_document(input)?;
            let output = engine.layout(&document, &PositionOverrides::new());
            let highlight = &output.highlight;

            let report = match (item, file) {
                (Some(item), _) => {
                    let id = ItemId(item.clone());
                    if output.layout.item(&id).is_none() {
                        tracing::warn!("No item with id {item}");
                    }
                    HighlightReport {
                        outgoing: highlight.outgoing_for_item(&id),
                        incoming: highlight.incoming_for_item(&id),
                    }
                }
                (None, Some(path)) => {
                    let Some(file) = output.layout.file_by_path(path) else {
                        bail!("file {path} is not in the document");
                    };
                    let id = file.id;
                    HighlightReport {
                        outgoing: highlight.outgoing_for_file(id),
                        incoming: highlight.incoming_for_file(id),
                    }
                }
                (None, None) => bail!("either --item or --file is required"),
            };
            to_json(&report, true)
        }
        Command::Stats { input } => {
            let document = load_document(input)?;
            let output = engine.layout(&document, &PositionOverrides::new());
            to_json(
                &StatsReport {
                    build: output.graph.stats,
                    connections: output.layout.connections.len(),
                    placement_fallbacks: output.placement.fallbacks,
                },
                true,
            )
        }
    }
}

fn load_document(path: &Path) -> Result<Document> {
    let document =
        Document::from_path(path).with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!("Loaded {} files from {}", document.files.len(), path.display());
    Ok(document)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
