// Naming rules shared by the manifest builder, the sanitizer and the quiz.

use anyhow::Result;
use regex::Regex;

// Everything after the final '/', minus any query string.
const URL_BASENAME: &str = r"^.*/([^/?]+)(?:\?.*)?$";

/// Turns remote or already-local URLs into `<prefix>/<game_folder>/<file>` paths.
#[derive(Debug, Clone)]
pub struct UrlRewriter {
    re: Regex,
}

impl UrlRewriter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(URL_BASENAME)?,
        })
    }

    /// Final path segment of `url` with the query string dropped.
    /// `None` when the string has no `/`-separated segment to take.
    pub fn basename<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.re
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Local path for `url`, or `None` when the URL shape is not recognised.
    pub fn to_local(&self, url: &str, prefix: &str, game_folder: &str) -> Option<String> {
        self.basename(url)
            .map(|file| format!("{prefix}/{game_folder}/{file}"))
    }
}

/// "Res Arcana" -> "res_arcana"
pub fn game_folder(game: &str) -> String {
    game.to_lowercase().replace(' ', "_")
}

/// Display name encoded in a `<game>_tier<N>` folder name.
///
/// `res_arcana_tier1` -> `Res Arcana`. Folders without a `_tier` suffix are
/// read whole.
pub fn game_from_folder(folder: &str) -> String {
    let stem = folder.split("_tier").next().unwrap_or(folder);
    title_case(&stem.replace('_', " "))
}

/// Group label for a self-describing annotation: `<game_folder>_tier<N>`.
pub fn folder_label(game: &str, tier: Option<u32>) -> String {
    match tier {
        Some(t) => format!("{}_tier{t}", game_folder(game)),
        None => game_folder(game),
    }
}

// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_host_dirs_and_query() {
        let rw = UrlRewriter::new().unwrap();
        assert_eq!(
            rw.basename("https://host/path/to/file.png?token=abc"),
            Some("file.png")
        );
        assert_eq!(rw.basename("already/local/file.png"), Some("file.png"));
    }

    #[test]
    fn basename_rejects_unrecognised_shapes() {
        let rw = UrlRewriter::new().unwrap();
        assert_eq!(rw.basename(""), None);
        assert_eq!(rw.basename("file.png"), None);
        assert_eq!(rw.basename("https://host/dir/"), None);
    }

    #[test]
    fn to_local_builds_prefixed_path() {
        let rw = UrlRewriter::new().unwrap();
        let got = rw.to_local(
            "https://raw.githubusercontent.com/org/repo/main/kd_12.jpg?raw=true",
            "gamestates/images",
            "kingdomino",
        );
        assert_eq!(got.as_deref(), Some("gamestates/images/kingdomino/kd_12.jpg"));
    }

    #[test]
    fn to_local_is_stable_on_local_paths() {
        let rw = UrlRewriter::new().unwrap();
        let local = "gamestates/images/res_arcana/ra_3.png";
        assert_eq!(
            rw.to_local(local, "gamestates/images", "res_arcana").as_deref(),
            Some(local)
        );
    }

    #[test]
    fn game_name_from_folder_convention() {
        assert_eq!(game_from_folder("res_arcana_tier1"), "Res Arcana");
        assert_eq!(game_from_folder("pax_ren_tier2"), "Pax Ren");
        assert_eq!(game_from_folder("kingdomino"), "Kingdomino");
    }

    #[test]
    fn title_case_matches_word_runs() {
        assert_eq!(title_case("pax renaissance 2e"), "Pax Renaissance 2E");
        assert_eq!(title_case("KINGDOMINO"), "Kingdomino");
    }

    #[test]
    fn labels_for_self_describing_files() {
        assert_eq!(game_folder("Res Arcana"), "res_arcana");
        assert_eq!(folder_label("Res Arcana", Some(3)), "res_arcana_tier3");
        assert_eq!(folder_label("Kingdomino", None), "kingdomino");
    }
}
