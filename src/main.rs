use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use htmlpack::core::{create_bundled_document, BundleOptions, ANSI_COLOR_RED, ANSI_COLOR_RESET};
use htmlpack::manifest::Manifest;

#[derive(Parser)]
#[command(
    name = "htmlpack",
    version,
    about = "Bundles a tree of HTML documents into a single self-contained file"
)]
struct Cli {
    /// Logical path of the document to bundle
    input_path: String,

    /// Logical path the bundled document will be served from
    output_path: String,

    /// Logical path for the extracted script; pass "" to keep scripts inline
    js_path: String,

    /// File to write the bundled document to
    output: PathBuf,

    /// File to write the extracted script to
    js_output: PathBuf,

    /// Manifest files mapping logical paths to real locations
    manifests: Vec<PathBuf>,

    /// Re-encode the serialized document with this charset
    #[arg(long)]
    charset: Option<String>,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "error" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(&cli) {
        eprintln!("{ANSI_COLOR_RED}Error: {error}{ANSI_COLOR_RESET}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::load(&cli.manifests)?;

    let options = BundleOptions {
        input_path: cli.input_path.clone(),
        output_path: cli.output_path.clone(),
        js_path: cli.js_path.clone(),
        charset: cli.charset.clone(),
    };

    let (html, js) = create_bundled_document(manifest, options)?;

    // Neither artifact is committed until the whole pipeline has succeeded;
    // the script file is written even when extraction is off, so downstream
    // checksumming always finds both outputs
    fs::write(&cli.output, html)?;
    fs::write(&cli.js_output, js)?;

    Ok(())
}
