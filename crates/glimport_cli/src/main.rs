// SPDX-License-Identifier: MIT OR Apache-2.0
//! `gltf2shadergraph` - convert the materials of a glTF file into shader
//! node graphs.
//!
//! Every material is written as a pretty-printed RON graph to
//! `<output>/<index>_<name>.<ext>`. Materials that cannot be imported are
//! logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use glimport_graph::Graph;
use glimport_material::settings::SETTINGS_FILE_NAME;
use glimport_material::{import_document, GltfDocument, ImportSettings};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// glTF file (JSON form)
    #[arg(short, long)]
    input: PathBuf,
    /// Directory receiving one graph per material
    #[arg(short, long)]
    output: PathBuf,
    /// Import settings; defaults to `glimport.ron` next to the input if present
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("glimport=info,gltf2shadergraph=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!("Conversion failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = load_settings(args)?;

    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let document = GltfDocument::from_json(&json)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    tracing::info!("Loaded {} materials from {}", document.materials.len(), args.input.display());

    fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut written = 0;
    for imported in import_document(&document, &settings) {
        let Ok(graph) = imported.result else {
            continue;
        };
        let file_name = format!("{}_{}.{}", imported.index, file_stem(&imported.name), settings.output_extension);
        let path = args.output.join(file_name);
        write_graph(&graph, &path)?;
        tracing::debug!("Wrote {}", path.display());
        written += 1;
    }

    tracing::info!("Wrote {} of {} material graphs", written, document.materials.len());
    Ok(())
}

fn load_settings(args: &Args) -> anyhow::Result<ImportSettings> {
    if let Some(path) = &args.settings {
        return ImportSettings::load(path).with_context(|| format!("failed to load settings {}", path.display()));
    }

    let beside_input = args
        .input
        .parent()
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
        .filter(|path| path.exists());
    match beside_input {
        Some(path) => {
            tracing::info!("Using settings from {}", path.display());
            ImportSettings::load(&path).with_context(|| format!("failed to load settings {}", path.display()))
        }
        None => Ok(ImportSettings::default()),
    }
}

fn write_graph(graph: &Graph, path: &Path) -> anyhow::Result<()> {
    let config = ron::ser::PrettyConfig::new().struct_names(true);
    let content = ron::ser::to_string_pretty(graph, config)
        .with_context(|| format!("failed to serialize graph '{}'", graph.name))?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Material name reduced to characters safe in a file name
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Material.001"), "Material.001");
        assert_eq!(file_stem("wood/dark oak"), "wood_dark_oak");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["gltf2shadergraph", "-i", "scene.gltf", "-o", "out"]);
        assert_eq!(args.input, PathBuf::from("scene.gltf"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert!(args.settings.is_none());
    }
}
