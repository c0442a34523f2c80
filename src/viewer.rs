//! Browsing, answer checking and editing of single annotation files through
//! the manifest.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;

use crate::annotation::{Annotation, StateUrl};
use crate::answer::AnswerKey;
use crate::manifest::{Manifest, ManifestEntry};

/// Where a `--folder` / `--name` pair lands in the manifest.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    Folders(Vec<&'a str>),
    Files(Vec<&'a str>),
    Question(&'a ManifestEntry),
}

pub fn select<'a>(
    manifest: &'a Manifest,
    folder: Option<&'a str>,
    name: Option<&str>,
) -> Result<Selection<'a>> {
    let Some(folder) = folder else {
        return Ok(Selection::Folders(manifest.folders()));
    };
    let Some(name) = name else {
        return Ok(Selection::Files(
            manifest.files_in(folder).map(|e| e.name.as_str()).collect(),
        ));
    };
    manifest
        .find(folder, name)
        .map(Selection::Question)
        .with_context(|| format!("{folder}/{name} is not in the manifest"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// Raw `Answer` text, trimmed
    pub expected: String,
}

/// One opened annotation file.
#[derive(Debug, Clone)]
pub struct Question {
    pub path: PathBuf,
    pub annotation: Annotation,
}

impl Question {
    pub fn open(dataset_root: &Path, entry: &ManifestEntry) -> Result<Self> {
        let path = dataset_root.join(&entry.json_path);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let annotation = Annotation::from_json(&raw)
            .with_context(|| format!("Failed to parse {}", entry.name))?;
        Ok(Self { path, annotation })
    }

    /// `Res Arcana (ID 12, tier 1)`
    pub fn title(&self) -> String {
        let ann = &self.annotation;
        let game = ann.game_name().unwrap_or("?");
        match ann.tier() {
            Some(t) => format!("{game} (ID {}, tier {t})", ann.id()),
            None => format!("{game} (ID {})", ann.id()),
        }
    }

    pub fn image_paths(&self, dataset_root: &Path) -> Vec<PathBuf> {
        resolve(&self.annotation.game_state_url, dataset_root)
    }

    /// Companion machine-readable state files.
    pub fn state_paths(&self, dataset_root: &Path) -> Vec<PathBuf> {
        resolve(&self.annotation.json_game_state_url, dataset_root)
    }

    pub fn check(&self, key: &AnswerKey, user: &str) -> Verdict {
        let raw = self.annotation.answer();
        Verdict {
            correct: key.check(user, &raw),
            expected: raw.trim().to_string(),
        }
    }

    /// Replace the file with `edited`, written in the sanitizer's layout.
    /// Text that is not a JSON object is refused and the file is left as is.
    pub fn save_edit(&mut self, edited: &str) -> Result<()> {
        let parsed = Annotation::from_json(edited).context("Invalid JSON")?;
        let pretty = serde_json::to_string_pretty(&parsed)?;
        fs::write(&self.path, pretty)
            .with_context(|| format!("writing {}", self.path.display()))?;
        info!("saved edit to {}", self.path.display());
        self.annotation = parsed;
        Ok(())
    }
}

fn resolve(url: &StateUrl, dataset_root: &Path) -> Vec<PathBuf> {
    url.strings()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| dataset_root.join(s))
        .collect()
}
