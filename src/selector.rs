//! Environment selection.
//!
//! [`EnvironmentSelector::resolve`] walks a fixed sequence:
//!
//! 1. reject duplicate tags, then an empty set;
//! 2. pick a tag: the forced tag if one was given, the only profile if
//!    there is just one, otherwise ask the operator;
//! 3. look the profile up by tag;
//! 4. settle the output path, asking for one if the profile has none;
//! 5. reject a profile with no variables.
//!
//! Only the forced-tag path turns off confirmation before writing, and it
//! never prompts.

use tracing::{
    debug,
    info,
};

use crate::config::{
    EnvironmentProfile,
    ProfileSet,
};
use crate::error::{
    GenvError,
    GenvResult,
};
use crate::prompt::{
    Answer,
    ProfileChoice,
    Prompter,
};

/// How the environment was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Supplied out of band (CI tag); no prompts, no confirmation.
    Forced,
    /// The set holds a single profile.
    OnlyProfile,
    /// The operator chose it from a list.
    Chosen,
}

/// A profile ready to be rendered and written.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    /// The selected profile.
    pub profile: &'a EnvironmentProfile,
    /// Output path as configured or typed, not yet made absolute.
    pub output_path: String,
    /// Whether the writer must ask before writing.
    pub confirm: bool,
    /// How the profile was picked.
    pub mode: SelectionMode,
}

/// Resolves exactly one profile out of a [`ProfileSet`].
///
/// # Examples
///
/// ```rust,no_run
/// use genv::{ConfigLoader, EnvironmentSelector, InquirePrompter};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let loaded = ConfigLoader::new(".").load()?;
/// let ci_tag = std::env::var("GENV_CI_TAG").ok();
/// let answer = EnvironmentSelector::new(&loaded.config.environments)
///     .with_forced_tag(ci_tag.as_deref())
///     .resolve(&mut InquirePrompter::new())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentSelector<'a> {
    profiles: &'a ProfileSet,
    forced_tag: Option<&'a str>,
    default_tag: Option<&'a str>,
}

impl<'a> EnvironmentSelector<'a> {
    /// Creates a selector over `profiles`.
    pub fn new(profiles: &'a ProfileSet) -> Self {
        Self {
            profiles,
            forced_tag: None,
            default_tag: None,
        }
    }

    /// Preselects a tag and disables every prompt. Blank tags are ignored.
    pub fn with_forced_tag(mut self, tag: Option<&'a str>) -> Self {
        self.forced_tag = tag.filter(|t| !t.trim().is_empty());
        self
    }

    /// Places the choice cursor on this tag when the operator is asked.
    pub fn with_default_tag(mut self, tag: Option<&'a str>) -> Self {
        self.default_tag = tag;
        self
    }

    /// Runs the selection.
    ///
    /// Returns [`Answer::Cancelled`] if the operator aborts the environment
    /// choice.
    ///
    /// # Errors
    ///
    /// - [`GenvError::DuplicateTag`] if any tag appears twice
    /// - [`GenvError::NoProfilesDefined`] if the set is empty
    /// - [`GenvError::ProfileNotFound`] if the forced tag names no profile
    /// - [`GenvError::EmptyOutputPath`] if no output path is configured and
    ///   the prompt is aborted or left blank; forced runs fail without asking
    /// - [`GenvError::EmptyProfileConfig`] if the profile has no variables
    /// - [`GenvError::PromptFailed`] if a prompt cannot be shown
    pub fn resolve(&self, prompter: &mut dyn Prompter) -> GenvResult<Answer<Resolution<'a>>> {
        let duplicates = self.profiles.duplicate_tags();
        if !duplicates.is_empty() {
            return Err(GenvError::DuplicateTag { tags: duplicates });
        }
        if self.profiles.is_empty() {
            return Err(GenvError::NoProfilesDefined);
        }

        let (tag, mode) = match self.pick_tag(prompter)? {
            Answer::Value(picked) => picked,
            Answer::Cancelled => return Ok(Answer::Cancelled),
        };
        debug!(tag = %tag, ?mode, "environment tag resolved");

        let profile = self
            .profiles
            .find(&tag)
            .ok_or_else(|| GenvError::ProfileNotFound { tag: tag.clone() })?;

        let output_path = self.output_path(profile, mode, prompter)?;

        if profile.variables.is_empty() {
            return Err(GenvError::EmptyProfileConfig { tag });
        }

        info!(tag = %tag, output = %output_path, "environment selected");
        Ok(Answer::Value(Resolution {
            profile,
            output_path,
            confirm: mode != SelectionMode::Forced,
            mode,
        }))
    }

    fn pick_tag(&self, prompter: &mut dyn Prompter) -> GenvResult<Answer<(String, SelectionMode)>> {
        if let Some(forced) = self.forced_tag {
            return Ok(Answer::Value((forced.to_string(), SelectionMode::Forced)));
        }

        let tags = self.profiles.tags();
        if let [only] = tags.as_slice() {
            return Ok(Answer::Value((only.to_string(), SelectionMode::OnlyProfile)));
        }

        let choices: Vec<ProfileChoice> = self
            .profiles
            .iter()
            .map(|p| ProfileChoice {
                tag: p.tag.clone(),
                output: p.output_path().map(str::to_string),
            })
            .collect();
        let start = self
            .default_tag
            .and_then(|t| self.profiles.position(t))
            .unwrap_or(0);

        let answer = prompter.select_one("Select an environment to write:", &choices, start)?;
        Ok(match answer {
            Answer::Value(index) => match tags.get(index) {
                Some(tag) => Answer::Value((tag.to_string(), SelectionMode::Chosen)),
                None => {
                    return Err(GenvError::ProfileNotFound {
                        tag: format!("#{}", index),
                    });
                }
            },
            Answer::Cancelled => Answer::Cancelled,
        })
    }

    fn output_path(
        &self,
        profile: &EnvironmentProfile,
        mode: SelectionMode,
        prompter: &mut dyn Prompter,
    ) -> GenvResult<String> {
        if let Some(path) = profile.output_path() {
            return Ok(path.to_string());
        }
        let empty = || GenvError::EmptyOutputPath {
            tag: profile.tag.clone(),
        };
        if mode == SelectionMode::Forced {
            return Err(empty());
        }

        let message = format!("Output path for '{}':", profile.tag);
        let placeholder = format!(".env.{}", profile.tag);
        // Aborting this prompt fails the run, unlike the other prompts.
        match prompter.text_input(&message, &placeholder)? {
            Answer::Value(path) if !path.trim().is_empty() => Ok(path.trim().to_string()),
            _ => Err(empty()),
        }
    }
}
