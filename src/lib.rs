//! Curation tools for the LudoBench annotation dataset: manifest building,
//! double-blind sanitization, answer checking and single-file editing.

pub mod annotation;
pub mod answer;
pub mod logging;
pub mod manifest;
pub mod paths;
pub mod sanitize;
pub mod viewer;

pub use annotation::{Annotation, StateUrl};
pub use answer::AnswerKey;
pub use manifest::{DiscoveryMode, Manifest, ManifestConfig, ManifestEntry};
pub use sanitize::{SanitizeConfig, SanitizeSummary, Sanitizer};
pub use viewer::{Question, Selection, Verdict};
