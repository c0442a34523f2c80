/*
cargo run --bin quiz
cargo run --bin quiz -- --folder res_arcana_tier1
cargo run --bin quiz -- --folder res_arcana_tier1 --name q_004.json --answer "2"

cargo run --bin quiz -- \
    --manifest docs/manifest.json \
    --dataset-root docs \
    --folder pax_ren_tier2 --name q_011.json --answer "three" --reveal

cargo run --bin quiz -- --folder kingdomino_tier1 --name q_002.json \
    --edit '{"Game": "Kingdomino", "ID": 2, "Answer": "4 or four"}'
*/

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use ludobench_tools::{
    logging,
    manifest::DEFAULT_MANIFEST_NAME,
    viewer::{self, Question, Selection},
    AnswerKey, Manifest,
};

/// Browse the manifest and check an answer for one question.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MANIFEST_NAME)]
    manifest: PathBuf,

    /// Directory the manifest's json_path values are relative to
    #[arg(long, value_name = "PATH", default_value = ".")]
    dataset_root: PathBuf,

    /// Folder to open (lists folders when omitted)
    #[arg(long)]
    folder: Option<String>,

    /// Annotation file inside the folder (lists files when omitted)
    #[arg(long)]
    name: Option<String>,

    /// Answer to check
    #[arg(long)]
    answer: Option<String>,

    /// Also print the rationale
    #[arg(long)]
    reveal: bool,

    /// Replacement JSON for the selected file (refused unless it parses)
    #[arg(long, value_name = "JSON")]
    edit: Option<String>,

    #[arg(long, value_name = "PATH", default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    // ----- parse CLI --------------------------------------------------------
    let cli = Cli::parse();

    // ----- initialise logging ----------------------------------------------
    logging::init(&cli.log_dir, "quiz")?;

    // ----- pick folder / file ----------------------------------------------
    let manifest = Manifest::load(&cli.manifest)?;
    let entry = match viewer::select(&manifest, cli.folder.as_deref(), cli.name.as_deref())? {
        Selection::Folders(folders) => {
            for f in folders {
                println!("{f}");
            }
            return Ok(());
        }
        Selection::Files(files) => {
            if files.is_empty() {
                println!("No *.json files found in {}", cli.folder.as_deref().unwrap_or(""));
            }
            for f in files {
                println!("{f}");
            }
            return Ok(());
        }
        Selection::Question(entry) => entry,
    };

    let mut question = Question::open(&cli.dataset_root, entry)?;
    info!("opened {}", question.path.display());

    // ----- optional edit -----------------------------------------------------
    if let Some(edited) = cli.edit.as_deref() {
        question.save_edit(edited)?;
        println!("Saved {}", question.path.display());
    }

    // ----- show question -----------------------------------------------------
    let ann = &question.annotation;
    println!("{}", question.title());
    println!("Question: {}", ann.question().unwrap_or("No question provided."));

    let images = question.image_paths(&cli.dataset_root);
    if images.is_empty() {
        println!("No `game_state_url` found in this JSON.");
    }
    for img in images {
        println!("Game state: {}", img.display());
    }
    for state in question.state_paths(&cli.dataset_root) {
        println!("State file: {}", state.display());
    }

    // ----- check answer ------------------------------------------------------
    let Some(user) = cli.answer.as_deref() else {
        return Ok(());
    };

    let verdict = question.check(&AnswerKey::new()?, user);
    info!("{}: answer {user:?} correct={}", entry.json_path, verdict.correct);

    if verdict.correct {
        println!("Correct!");
    } else {
        println!("Not quite. Try again.");
    }
    let expected = if verdict.expected.is_empty() { "-" } else { verdict.expected.as_str() };
    println!("Expected: {expected}");
    if cli.reveal {
        let rationale = ann
            .rationale
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("-");
        println!("Rationale: {rationale}");
    }
    Ok(())
}
