use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tangled_tree::course::{CourseDataset, DatasetError};
use tangled_tree::layout::{LayoutEngine, LayoutOptions, NodeStub, OptionsError};
use tangled_tree::leveling::level_courses;
use tangled_tree::selection::Selection;
use tangled_tree::svg::SvgRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Json,
}

/// Lay out a course prerequisite graph as a tangled tree.
#[derive(Debug, Parser)]
#[command(name = "tangled-tree", version)]
struct Cli {
    /// Course dataset (JSON list of course records, or object keyed by course id)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input is already leveled: a JSON array of levels of {id, parents}
    #[arg(long)]
    levels: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// JSON file with layout options (camelCase keys)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Level pitch; overrides the options file
    #[arg(long)]
    node_width: Option<f64>,

    /// Remove excess vertical space between families
    #[arg(long)]
    compress: bool,

    /// Highlight a node with its ancestors and descendants
    #[arg(short, long)]
    select: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unknown node: {0}")]
    UnknownNode(String),
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T, CliError> {
    serde_json::from_str(text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut options: LayoutOptions = match &cli.options {
        Some(path) => parse_json(path, &read(path)?)?,
        None => LayoutOptions::default(),
    };
    if cli.node_width.is_some() {
        options.node_width = cli.node_width;
    }
    if cli.compress {
        options.compress_vertical = true;
    }
    options.validate()?;

    let input = read(&cli.input)?;
    let levels: Vec<Vec<NodeStub>> = if cli.levels {
        parse_json(&cli.input, &input)?
    } else {
        let dataset = CourseDataset::from_json(&input)?;
        level_courses(&dataset).levels
    };

    let layout = LayoutEngine::new(options).layout(&levels);
    for warning in &layout.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut selection = Selection::new();
    if let Some(id) = &cli.select {
        if layout.node_index(id).is_none() {
            return Err(CliError::UnknownNode(id.clone()));
        }
        selection.pointer_enter(&layout, id);
    }

    let output = match cli.format {
        Format::Svg => SvgRenderer::default().render(&layout, Some(&selection)),
        Format::Json => {
            let document = match selection.current() {
                Some(id) => serde_json::json!({
                    "layout": &layout,
                    "selection": {
                        "id": id,
                        "ancestors": selection.ancestor_ids(),
                        "descendants": selection.descendant_ids(),
                    },
                }),
                None => serde_json::json!({ "layout": &layout }),
            };
            serde_json::to_string_pretty(&document).map_err(|source| CliError::Json {
                path: cli.input.clone(),
                source,
            })?
        }
    };

    match &cli.output {
        Some(path) => fs::write(path, &output).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => {
            print!("{}", output);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
