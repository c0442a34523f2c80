//! Index of every annotation file in the dataset.
//!
//! The manifest is rebuilt from scratch on each run and written as
//! `{"files": [...]}`, sorted by folder then file name.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationHeader;
use crate::paths::{folder_label, game_from_folder};

pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub folder: String,
    pub game: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<u32>,
    pub json_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub files: Vec<ManifestEntry>,
}

/// Which layout to discover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DiscoveryMode {
    /// `<game>_tier<N>/` subfolders and self-describing top-level files
    #[default]
    Auto,
    /// Only `<game>_tier<N>/` subfolders
    Folders,
    /// Only top-level files carrying their own `Game` and `tier`
    Flat,
}

#[derive(Debug, Clone)]
pub struct ManifestConfig {
    /// Prefix joined in front of `json_path` so the viewer can fetch the file
    pub path_prefix: String,
    /// File name never indexed, usually the manifest itself
    pub manifest_name: String,
    pub mode: DiscoveryMode,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path_prefix: crate::sanitize::DEFAULT_DATASET_ROOT.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            mode: DiscoveryMode::Auto,
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Sorted distinct folder labels.
    pub fn folders(&self) -> Vec<&str> {
        self.files
            .iter()
            .map(|e| e.folder.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn files_in<'a>(&'a self, folder: &'a str) -> impl Iterator<Item = &'a ManifestEntry> + 'a {
        self.files.iter().filter(move |e| e.folder == folder)
    }

    pub fn find(&self, folder: &str, name: &str) -> Option<&ManifestEntry> {
        self.files
            .iter()
            .find(|e| e.folder == folder && e.name == name)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace `path` with this manifest via a sibling temp file and rename.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let text = self.to_pretty_json()?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("moving {} to {}", tmp.display(), path.display()))?;
        Ok(())
    }
}

/// Scan `root` and build the manifest. Only an unreadable root is an error.
pub fn build(root: &Path, cfg: &ManifestConfig) -> Result<Manifest> {
    let Ok(listing) = fs::read_dir(root) else {
        bail!("cannot read dataset root {}", root.display());
    };

    let mut dirs = Vec::new();
    let mut top_files = Vec::new();
    for entry in listing.filter_map(Result::ok) {
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        } else if is_indexable(&path, cfg) {
            top_files.push(path);
        }
    }

    let mut entries = Vec::new();
    if cfg.mode != DiscoveryMode::Flat {
        for dir in &dirs {
            entries.extend(folder_entries(dir, cfg));
        }
    }
    if cfg.mode != DiscoveryMode::Folders {
        for path in &top_files {
            match flat_entry(path, cfg) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("skipped {}: {e:#}", path.display()),
            }
        }
    }

    entries.sort_by(|a, b| (&a.folder, &a.name).cmp(&(&b.folder, &b.name)));
    info!("indexed {} annotation files under {}", entries.len(), root.display());
    Ok(Manifest { files: entries })
}

// Entries for one `<game>_tier<N>` directory; unreadable directories yield none.
fn folder_entries(dir: &Path, cfg: &ManifestConfig) -> Vec<ManifestEntry> {
    let Some(folder) = file_name(dir) else {
        return Vec::new();
    };
    let listing = match fs::read_dir(dir) {
        Ok(l) => l,
        Err(e) => {
            warn!("cannot read {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let game = game_from_folder(&folder);
    listing
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_indexable(p, cfg))
        .filter_map(|p| file_name(&p))
        .map(|name| ManifestEntry {
            json_path: format!("{}/{folder}/{name}", cfg.path_prefix),
            name,
            folder: folder.clone(),
            game: game.clone(),
            tier: None,
        })
        .collect()
}

fn flat_entry(path: &Path, cfg: &ManifestConfig) -> Result<ManifestEntry> {
    let name = file_name(path).context("file name is not valid UTF-8")?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let header: AnnotationHeader = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;
    let Some(game) = header.game else {
        bail!("no Game field");
    };

    Ok(ManifestEntry {
        folder: folder_label(&game, header.tier),
        json_path: format!("{}/{name}", cfg.path_prefix),
        name,
        game,
        tier: header.tier,
    })
}

fn is_indexable(path: &Path, cfg: &ManifestConfig) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
        && path.file_name().and_then(|s| s.to_str()) != Some(cfg.manifest_name.as_str())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|s| s.to_str()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(folder: &str, name: &str) -> ManifestEntry {
        ManifestEntry {
            name: name.into(),
            folder: folder.into(),
            game: game_from_folder(folder),
            tier: None,
            json_path: format!("annotation_data/{folder}/{name}"),
        }
    }

    #[test]
    fn folders_are_distinct_and_sorted() {
        let m = Manifest {
            files: vec![
                entry("res_arcana_tier2", "b.json"),
                entry("kingdomino_tier1", "a.json"),
                entry("res_arcana_tier2", "c.json"),
            ],
        };
        assert_eq!(m.folders(), vec!["kingdomino_tier1", "res_arcana_tier2"]);
        let names: Vec<_> = m.files_in("res_arcana_tier2").map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b.json", "c.json"]);
        assert!(m.find("kingdomino_tier1", "a.json").is_some());
        assert!(m.find("kingdomino_tier1", "b.json").is_none());
    }

    #[test]
    fn entry_field_order_on_disk() {
        let m = Manifest { files: vec![entry("pax_ren_tier2", "q1.json")] };
        let text = m.to_pretty_json().unwrap();
        let want = r#"{
  "files": [
    {
      "name": "q1.json",
      "folder": "pax_ren_tier2",
      "game": "Pax Ren",
      "json_path": "annotation_data/pax_ren_tier2/q1.json"
    }
  ]
}"#;
        assert_eq!(text, want);
    }

    #[test]
    fn manifest_file_is_not_indexable() {
        let cfg = ManifestConfig::default();
        assert!(!is_indexable(Path::new("data/manifest.json"), &cfg));
        assert!(!is_indexable(Path::new("data/notes.txt"), &cfg));
        assert!(is_indexable(Path::new("data/q_01.json"), &cfg));
    }
}
