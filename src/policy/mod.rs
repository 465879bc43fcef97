//! Repository policy (`.doorkeeper.toml`) which decides which workers run for an event.
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

mod loader;
mod matcher;

pub use loader::{fetch_policy, load_policy, PolicyLoadError};
pub use matcher::ValidationError;

pub const POLICY_FILE_PATH: &str = ".doorkeeper.toml";

/// Highest policy format version understood by this build.
pub const SUPPORTED_POLICY_VERSION: u32 = 1;

static DEFAULT_POLICY: LazyLock<Arc<Policy>> = LazyLock::new(|| Arc::new(Policy::default()));

/// Policy used whenever the repository policy cannot be fetched or parsed.
pub fn default_policy() -> Arc<Policy> {
    Arc::clone(&DEFAULT_POLICY)
}

/// Configuration of a repository loaded from a `.doorkeeper.toml`
/// file located in the root of the repository file tree.
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub validation: ValidationPolicy,
    #[serde(default)]
    pub release_note: ReleaseNotePolicy,
}

impl Policy {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            version: default_version(),
            validation: ValidationPolicy {
                title: TextRule {
                    required: true,
                    ..TextRule::default()
                },
                ..ValidationPolicy::default()
            },
            release_note: ReleaseNotePolicy::default(),
        }
    }
}

fn default_version() -> u32 {
    SUPPORTED_POLICY_VERSION
}

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ValidationPolicy {
    #[serde(default)]
    pub disable: bool,
    /// Base branches of pull requests which are validated.
    #[serde(default = "match_all_branches")]
    pub branches: Vec<String>,
    #[serde(default)]
    pub title: TextRule,
    #[serde(default)]
    pub description: TextRule,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            disable: false,
            branches: match_all_branches(),
            title: TextRule::default(),
            description: TextRule::default(),
        }
    }
}

fn match_all_branches() -> Vec<String> {
    vec!["*".to_string()]
}

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ReleaseNotePolicy {
    #[serde(default)]
    pub disable: bool,
    /// Base branches of pull requests which receive a release note preview.
    #[serde(default)]
    pub branches: Vec<String>,
    /// Tags which get a published release when pushed.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
    /// Send a chat notification once a release is published.
    #[serde(default = "default_notify")]
    pub notify: bool,
}

impl Default for ReleaseNotePolicy {
    fn default() -> Self {
        Self {
            disable: false,
            branches: vec![],
            tags: vec![],
            draft: false,
            notify: default_notify(),
        }
    }
}

fn default_notify() -> bool {
    true
}

/// Constraints applied to a pull request title or description.
#[derive(serde::Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct TextRule {
    /// The text must contain something other than whitespace.
    #[serde(default)]
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// The text must start with one of these prefixes.
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_regex")]
    pub pattern: Option<Regex>,
}

fn deserialize_regex<'de, D>(deserializer: D) -> Result<Option<Regex>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(pattern) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Regex::new(&pattern)
        .map(Some)
        .map_err(|error| D::Error::custom(format!("invalid pattern `{pattern}`: {error}")))
}
