/*
cargo run --bin make_manifest

cargo run --bin make_manifest -- \
    --root annotation_data \
    --out docs/manifest.json \
    --path-prefix annotation_data \
    --mode flat
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use ludobench_tools::{
    logging,
    manifest::{self, DEFAULT_MANIFEST_NAME},
    sanitize::DEFAULT_DATASET_ROOT,
    DiscoveryMode, ManifestConfig,
};

/// Write manifest.json listing every annotation file with its game and folder.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding <game>_tier<N>/ folders or self-describing JSON files
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATASET_ROOT)]
    root: PathBuf,

    /// Manifest file to create/overwrite
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_MANIFEST_NAME)]
    out: PathBuf,

    /// Prefix for json_path entries (how the viewer reaches the dataset)
    #[arg(long, default_value = DEFAULT_DATASET_ROOT)]
    path_prefix: String,

    #[arg(long, value_enum, default_value_t = DiscoveryMode::Auto)]
    mode: DiscoveryMode,

    #[arg(long, value_name = "PATH", default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    // ----- parse CLI --------------------------------------------------------
    let cli = Cli::parse();

    // ----- initialise logging ----------------------------------------------
    logging::init(&cli.log_dir, "make_manifest")?;
    info!("Started - root: {:?}, out: {:?}, mode: {:?}", cli.root, cli.out, cli.mode);

    // ----- build + write -----------------------------------------------------
    let manifest_name = cli
        .out
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_MANIFEST_NAME)
        .to_string();
    let cfg = ManifestConfig {
        path_prefix: cli.path_prefix,
        manifest_name,
        mode: cli.mode,
    };

    let manifest = manifest::build(&cli.root, &cfg)?;
    manifest.write_atomic(&cli.out)?;

    println!(
        "Created {} with {} JSON entries.",
        cli.out.display(),
        manifest.files.len()
    );
    Ok(())
}
