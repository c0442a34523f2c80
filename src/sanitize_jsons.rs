/*
cargo run --bin sanitize_jsons

cargo run --bin sanitize_jsons -- \
    --root annotation_data \
    --image-root gamestates/images \
    --json-root gamestates/json \
    --dry-run
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use ludobench_tools::{
    logging,
    sanitize::{collect_json_files, DEFAULT_DATASET_ROOT, DEFAULT_IMAGE_ROOT, DEFAULT_JSON_ROOT},
    SanitizeConfig, Sanitizer,
};

/// Localise state URLs and blank rationales in every annotation file, in place.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Top-level annotation folder (walked recursively)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATASET_ROOT)]
    root: PathBuf,

    /// Prefix for rewritten game_state_url values
    #[arg(long, default_value = DEFAULT_IMAGE_ROOT)]
    image_root: String,

    /// Prefix for rewritten json_game_state_url values
    #[arg(long, default_value = DEFAULT_JSON_ROOT)]
    json_root: String,

    /// Report what would change without touching any file
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_name = "PATH", default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    // ----- parse CLI --------------------------------------------------------
    let cli = Cli::parse();

    // ----- initialise logging ----------------------------------------------
    let log_path = logging::init(&cli.log_dir, "sanitize_jsons")?;
    info!("Started - root: {:?}, dry_run: {}", cli.root, cli.dry_run);

    let sanitizer = Sanitizer::new(SanitizeConfig {
        image_root: cli.image_root,
        json_root: cli.json_root,
        dry_run: cli.dry_run,
    })?;

    // ----- main loop over *.json files ---------------------------------------
    let files = collect_json_files(&cli.root)?;

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} {pos}/{len} {wide_bar:.cyan/blue} {elapsed_precise}",
    )?);
    let summary = sanitizer.sanitize_files(&files, |_| bar.inc(1))?;
    bar.finish();

    // ----- summary -----------------------------------------------------------
    let verb = if cli.dry_run { "would sanitize" } else { "sanitized" };
    println!(
        "{verb} {} file(s), {} already clean, {} skipped (details in {})",
        summary.sanitized,
        summary.unchanged,
        summary.skipped.len(),
        log_path.display()
    );
    for path in &summary.skipped {
        println!("  skipped: {}", path.display());
    }
    info!("Finished - {} file(s) visited", summary.total());
    Ok(())
}
