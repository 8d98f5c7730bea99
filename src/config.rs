//! Config file discovery and parsing.
//!
//! A config file holds a list of environments (profiles). Each profile has a
//! tag, an optional output path and an ordered mapping of variables:
//!
//! ```json
//! {
//!   "defaultEnvironment": "dev",
//!   "environments": [
//!     { "name": "dev", "output": ".env.dev", "variables": { "API KEY": "abc 123", "count": 2 } }
//!   ]
//! }
//! ```
//!
//! JSON, YAML and TOML are accepted; see [`ConfigLoader`] for the lookup
//! rules.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use serde::Deserialize;
use tracing::debug;

use crate::error::{
    GenvError,
    GenvResult,
};
use crate::value::ConfigMapping;

/// Base name shared by every recognized config file.
pub const CONFIG_BASENAME: &str = "env.config";

/// Source format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Extensions tried during discovery, in priority order.
    pub const SEARCH_ORDER: &'static [(&'static str, ConfigFormat)] = &[
        ("json", ConfigFormat::Json),
        ("yaml", ConfigFormat::Yaml),
        ("yml", ConfigFormat::Yaml),
        ("toml", ConfigFormat::Toml),
    ];

    /// Detects the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        Self::SEARCH_ORDER
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, f)| *f)
    }

    /// Parses `content` in this format.
    ///
    /// # Errors
    ///
    /// Returns the parser's message if the content is not valid for the
    /// format or does not match the config schema.
    pub fn parse(self, content: &str) -> Result<UserConfig, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// One named environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvironmentProfile {
    /// Unique name of the environment.
    #[serde(rename = "name", alias = "tag")]
    pub tag: String,
    /// Where the rendered file goes. Blank means "ask".
    #[serde(default)]
    pub output: Option<String>,
    /// Variables to render, in source order.
    #[serde(default, alias = "config")]
    pub variables: ConfigMapping,
}

impl EnvironmentProfile {
    /// Creates a profile.
    pub fn new(tag: impl Into<String>, output: Option<&str>, variables: ConfigMapping) -> Self {
        Self {
            tag: tag.into(),
            output: output.map(str::to_string),
            variables,
        }
    }

    /// The configured output path, if present and not blank.
    pub fn output_path(&self) -> Option<&str> {
        self.output.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// The environments loaded for one run, in file order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProfileSet {
    profiles: Vec<EnvironmentProfile>,
}

impl ProfileSet {
    /// Wraps a list of profiles. No validation happens here; see
    /// [`EnvironmentSelector`](crate::selector::EnvironmentSelector).
    pub fn new(profiles: Vec<EnvironmentProfile>) -> Self {
        Self { profiles }
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if no profiles are defined.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Iterates profiles in file order.
    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentProfile> {
        self.profiles.iter()
    }

    /// All tags in file order.
    pub fn tags(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.tag.as_str()).collect()
    }

    /// Tags that appear more than once, each listed once in first-seen order.
    pub fn duplicate_tags(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for tag in self.tags() {
            *counts.entry(tag).or_default() += 1;
        }
        let mut dups: Vec<String> = Vec::new();
        for tag in self.tags() {
            if counts[tag] > 1 && !dups.iter().any(|d| d == tag) {
                dups.push(tag.to_string());
            }
        }
        dups
    }

    /// Looks up a profile by tag.
    pub fn find(&self, tag: &str) -> Option<&EnvironmentProfile> {
        self.profiles.iter().find(|p| p.tag == tag)
    }

    /// Position of a tag, if present.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.profiles.iter().position(|p| p.tag == tag)
    }
}

impl FromIterator<EnvironmentProfile> for ProfileSet {
    fn from_iter<I: IntoIterator<Item = EnvironmentProfile>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parsed contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Every environment the file defines.
    #[serde(default, alias = "configs")]
    pub environments: ProfileSet,
    /// Tag preselected in the interactive choice.
    #[serde(default, alias = "default_environment")]
    pub default_environment: Option<String>,
}

/// A config file together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Absolute path of the file that was read.
    pub path: PathBuf,
    /// Its parsed contents.
    pub config: UserConfig,
}

impl LoadedConfig {
    /// Directory that relative output paths resolve against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Finds and parses the config file.
///
/// # Lookup
///
/// - With an explicit path to a file, that file is loaded regardless of its
///   name; its extension picks the format (unknown extensions are read as
///   JSON).
/// - With an explicit directory, or none (the working directory), the
///   directory is searched for `env.config.json`, `env.config.yaml`,
///   `env.config.yml` and `env.config.toml`, in that order.
///
/// # Examples
///
/// ```rust,no_run
/// use genv::ConfigLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let loaded = ConfigLoader::new(std::env::current_dir()?).load()?;
/// println!("{} environments", loaded.config.environments.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    working_dir: PathBuf,
    explicit: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader that searches `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            explicit: None,
        }
    }

    /// Uses an explicit file or directory instead of the working directory.
    /// Relative paths resolve against the working directory.
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// Returns the config file that [`load`](Self::load) would read.
    pub fn find_config_file(&self) -> Option<PathBuf> {
        let target = match &self.explicit {
            Some(p) => self.working_dir.join(p),
            None => self.working_dir.clone(),
        };
        if target.is_file() {
            return Some(target);
        }
        if !target.is_dir() {
            return None;
        }
        ConfigFormat::SEARCH_ORDER
            .iter()
            .map(|(ext, _)| target.join(format!("{}.{}", CONFIG_BASENAME, ext)))
            .find(|candidate| candidate.is_file())
    }

    /// Locates and parses the config file.
    ///
    /// # Errors
    ///
    /// Returns [`GenvError::ConfigNotFound`] when no file matches and
    /// [`GenvError::ConfigParseFailed`] when it cannot be read or parsed.
    pub fn load(&self) -> GenvResult<LoadedConfig> {
        let path = self
            .find_config_file()
            .ok_or_else(|| GenvError::ConfigNotFound {
                searched: self
                    .explicit
                    .as_ref()
                    .map(|p| self.working_dir.join(p))
                    .unwrap_or_else(|| self.working_dir.clone())
                    .display()
                    .to_string(),
            })?;
        let path = std::path::absolute(&path).unwrap_or(path);
        let format = ConfigFormat::from_path(&path).unwrap_or(ConfigFormat::Json);
        debug!(path = %path.display(), ?format, "loading config file");

        let content =
            std::fs::read_to_string(&path).map_err(|e| GenvError::ConfigParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let config = format
            .parse(&content)
            .map_err(|reason| GenvError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            })?;
        debug!(environments = config.environments.len(), "config parsed");
        Ok(LoadedConfig { path, config })
    }
}
