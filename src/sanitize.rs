//! Path localisation and rationale redaction for annotation files.
//!
//! Every `*.json` under the dataset root is rewritten in place: state URLs
//! become `<root>/<game_folder>/<file>` and `Rationale` is emptied. Once a file
//! is in that form, running again leaves it byte-for-byte as it is.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use serde_json::Value;
use walkdir::WalkDir;

use crate::annotation::{Annotation, StateUrl};
use crate::paths::{game_folder, UrlRewriter};

pub const DEFAULT_DATASET_ROOT: &str = "annotation_data";
pub const DEFAULT_IMAGE_ROOT: &str = "gamestates/images";
pub const DEFAULT_JSON_ROOT: &str = "gamestates/json";

#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Prefix for rewritten `game_state_url` values
    pub image_root: String,
    /// Prefix for rewritten `json_game_state_url` values
    pub json_root: String,
    pub dry_run: bool,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            image_root: DEFAULT_IMAGE_ROOT.to_string(),
            json_root: DEFAULT_JSON_ROOT.to_string(),
            dry_run: false,
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Sanitized,
    Unchanged,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SanitizeSummary {
    pub sanitized: usize,
    pub unchanged: usize,
    pub skipped: Vec<PathBuf>,
}

impl SanitizeSummary {
    pub fn total(&self) -> usize {
        self.sanitized + self.unchanged + self.skipped.len()
    }
}

pub struct Sanitizer {
    cfg: SanitizeConfig,
    urls: UrlRewriter,
}

impl Sanitizer {
    pub fn new(cfg: SanitizeConfig) -> Result<Self> {
        Ok(Self {
            cfg,
            urls: UrlRewriter::new()?,
        })
    }

    /// Rewrite one parsed annotation. `source` is only used in log lines.
    pub fn sanitize(&self, mut ann: Annotation, source: &str) -> Annotation {
        match ann.game_name().map(game_folder) {
            Some(folder) => {
                ann.game_state_url =
                    self.localise(ann.game_state_url, &self.cfg.image_root, &folder, source);
                ann.json_game_state_url =
                    self.localise(ann.json_game_state_url, &self.cfg.json_root, &folder, source);
            }
            None => {
                if !ann.game_state_url.is_absent() || !ann.json_game_state_url.is_absent() {
                    warn!("{source}: no usable Game field, state URLs left as they are");
                }
            }
        }

        if ann.rationale.is_some() {
            ann.rationale = Some(Value::String(String::new()));
        }
        ann
    }

    fn localise(&self, url: StateUrl, prefix: &str, folder: &str, source: &str) -> StateUrl {
        url.map_strings(&mut |s: &str| {
            let local = self.urls.to_local(s, prefix, folder);
            if local.is_none() {
                warn!("{source}: unrecognised URL {s:?} left unmodified");
            }
            local
        })
    }

    /// Read, rewrite and (unless dry-run) write back one file.
    pub fn sanitize_file(&self, path: &Path) -> Result<FileOutcome> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let ann = Annotation::from_json(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;

        let clean = self.sanitize(ann, &path.display().to_string());
        let pretty = serde_json::to_string_pretty(&clean)?;

        if pretty == raw {
            return Ok(FileOutcome::Unchanged);
        }
        if !self.cfg.dry_run {
            fs::write(path, pretty).with_context(|| format!("writing {}", path.display()))?;
        }
        Ok(FileOutcome::Sanitized)
    }

    /// Sanitize every `*.json` under `root`, one bad file never stopping the rest.
    pub fn sanitize_tree(&self, root: &Path) -> Result<SanitizeSummary> {
        let files = collect_json_files(root)?;
        self.sanitize_files(&files, |_| {})
    }

    /// Same as [`Sanitizer::sanitize_tree`] over an explicit file list;
    /// `tick` is called once per file (progress bars hook in here).
    pub fn sanitize_files<F>(&self, files: &[PathBuf], mut tick: F) -> Result<SanitizeSummary>
    where
        F: FnMut(&Path),
    {
        let mut summary = SanitizeSummary::default();
        for path in files {
            match self.sanitize_file(path) {
                Ok(FileOutcome::Sanitized) => {
                    info!("sanitized {}", path.display());
                    summary.sanitized += 1;
                }
                Ok(FileOutcome::Unchanged) => summary.unchanged += 1,
                Err(e) => {
                    warn!("skipped {}: {e:#}", path.display());
                    summary.skipped.push(path.clone());
                }
            }
            tick(path);
        }
        Ok(summary)
    }
}

/// All `*.json` files below `root`, sorted. Fails only if `root` itself
/// cannot be read.
pub fn collect_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("dataset root {} is not a readable directory", root.display());
    }
    fs::read_dir(root).with_context(|| format!("reading {}", root.display()))?;

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("walk error: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new(SanitizeConfig::default()).unwrap()
    }

    fn run(v: Value) -> Value {
        let ann: Annotation = serde_json::from_value(v).unwrap();
        serde_json::to_value(sanitizer().sanitize(ann, "test")).unwrap()
    }

    #[test]
    fn single_url_is_localised() {
        let out = run(json!({
            "Game": "Res Arcana",
            "game_state_url": "https://github.com/org/repo/raw/main/ra_7.png?raw=true",
        }));
        assert_eq!(out["game_state_url"], json!("gamestates/images/res_arcana/ra_7.png"));
    }

    #[test]
    fn url_lists_keep_length_and_order() {
        let out = run(json!({
            "Game": "Pax Renaissance",
            "game_state_url": ["https://h/a/one.png", "", "https://h/b/two.png?x=1"],
            "json_game_state_url": ["https://h/s/one.json"],
        }));
        assert_eq!(
            out["game_state_url"],
            json!([
                "gamestates/images/pax_renaissance/one.png",
                "",
                "gamestates/images/pax_renaissance/two.png"
            ])
        );
        assert_eq!(
            out["json_game_state_url"],
            json!(["gamestates/json/pax_renaissance/one.json"])
        );
    }

    #[test]
    fn rationale_is_blanked_but_kept() {
        let out = run(json!({"Game": "Kingdomino", "Rationale": "Because the castle..."}));
        assert_eq!(out["Rationale"], json!(""));

        let out = run(json!({"Game": "Kingdomino"}));
        assert!(out.get("Rationale").is_none());
    }

    #[test]
    fn odd_values_pass_through() {
        let out = run(json!({
            "Game": "Kingdomino",
            "game_state_url": "kd_1.png",
            "json_game_state_url": null,
            "Answer": "4 or four",
        }));
        assert_eq!(out["game_state_url"], json!("kd_1.png"));
        assert_eq!(out["json_game_state_url"], Value::Null);
        assert_eq!(out["Answer"], json!("4 or four"));
    }

    #[test]
    fn missing_game_leaves_urls_and_redacts() {
        let out = run(json!({
            "game_state_url": "https://h/a/one.png",
            "Rationale": "secret",
        }));
        assert_eq!(out["game_state_url"], json!("https://h/a/one.png"));
        assert_eq!(out["Rationale"], json!(""));
    }

    #[test]
    fn non_string_game_still_redacts_and_keeps_key() {
        let out = run(json!({
            "Game": 7,
            "game_state_url": "https://h/a/one.png",
            "Rationale": "secret gold explanation",
        }));
        assert_eq!(out["Game"], json!(7));
        assert_eq!(out["game_state_url"], json!("https://h/a/one.png"));
        assert_eq!(out["Rationale"], json!(""));

        let out = run(json!({"Game": null, "Rationale": "secret", "ID": 1}));
        assert_eq!(out, json!({"Game": null, "Rationale": "", "ID": 1}));
    }

    #[test]
    fn custom_roots() {
        let s = Sanitizer::new(SanitizeConfig {
            image_root: "images".into(),
            json_root: "states".into(),
            dry_run: false,
        })
        .unwrap();
        let ann: Annotation = serde_json::from_value(json!({
            "Game": "Kingdomino",
            "game_state_url": "https://h/x.png",
            "json_game_state_url": "https://h/x.json",
        }))
        .unwrap();
        let out = s.sanitize(ann, "test");
        assert_eq!(out.game_state_url, StateUrl::Single("images/kingdomino/x.png".into()));
        assert_eq!(out.json_game_state_url, StateUrl::Single("states/kingdomino/x.json".into()));
    }
}
