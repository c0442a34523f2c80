// One benchmark question per JSON file.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A `game_state_url` / `json_game_state_url` value.
///
/// Annotators wrote either a single URL or a list of them; anything else
/// (numbers, null, objects) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateUrl {
    #[default]
    #[serde(skip)]
    Absent,
    Single(String),
    Multiple(Vec<StateUrl>),
    Opaque(Value),
}

impl StateUrl {
    pub fn is_absent(&self) -> bool {
        matches!(self, StateUrl::Absent)
    }

    /// Apply `f` to every non-empty string, keeping the shape.
    /// `f` returning `None` leaves that string as it was.
    pub fn map_strings<F>(self, f: &mut F) -> StateUrl
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self {
            StateUrl::Single(s) if !s.trim().is_empty() => match f(&s) {
                Some(new) => StateUrl::Single(new),
                None => StateUrl::Single(s),
            },
            StateUrl::Multiple(items) => {
                StateUrl::Multiple(items.into_iter().map(|u| u.map_strings(f)).collect())
            }
            other => other,
        }
    }

    /// Every string in the value, in order.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            StateUrl::Single(s) => vec![s.as_str()],
            StateUrl::Multiple(items) => items.iter().flat_map(|u| u.strings()).collect(),
            StateUrl::Absent | StateUrl::Opaque(_) => Vec::new(),
        }
    }
}

/// An annotation file with the fields the tools act on pulled out; every
/// other key lives in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    // kept raw so a null or numeric Game survives a rewrite untouched
    #[serde(
        rename = "Game",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub game: Option<Value>,

    #[serde(default, skip_serializing_if = "StateUrl::is_absent")]
    pub game_state_url: StateUrl,

    #[serde(default, skip_serializing_if = "StateUrl::is_absent")]
    pub json_game_state_url: StateUrl,

    // Some(Null) when the key is present with a null value
    #[serde(
        rename = "Rationale",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub rationale: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// `Game` when it is a non-empty string.
    pub fn game_name(&self) -> Option<&str> {
        self.game
            .as_ref()
            .and_then(Value::as_str)
            .filter(|g| !g.trim().is_empty())
    }

    pub fn id(&self) -> String {
        self.extra.get("ID").map(display_value).unwrap_or_else(|| "?".into())
    }

    pub fn question(&self) -> Option<&str> {
        self.extra.get("Question").and_then(Value::as_str)
    }

    /// The raw `Answer` field as text; numbers are stringified.
    pub fn answer(&self) -> String {
        self.extra.get("Answer").map(display_value).unwrap_or_default()
    }

    pub fn tier(&self) -> Option<u32> {
        self.extra.get("tier").and_then(lenient_tier)
    }
}

/// Just the fields the manifest needs from a self-describing file.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationHeader {
    #[serde(rename = "Game")]
    pub game: Option<String>,

    #[serde(default, deserialize_with = "tier_field")]
    pub tier: Option<u32>,
}

fn present<'de, D>(de: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(de).map(Some)
}

fn tier_field<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_tier(&Value::deserialize(de)?))
}

// 2 or "2"; anything else counts as no tier
fn lenient_tier(v: &Value) -> Option<u32> {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        .and_then(|n| u32::try_from(n).ok())
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
