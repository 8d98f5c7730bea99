//! Error types for genv operations.

use thiserror::Error;

/// A specialized `Result` type for genv operations.
pub type GenvResult<T> = Result<T, GenvError>;

/// Errors that abort a genv run.
///
/// Operator cancellation is not an error; it travels as
/// [`Answer::Cancelled`](crate::prompt::Answer::Cancelled) and
/// [`Outcome::Cancelled`](crate::generate::Outcome::Cancelled).
#[derive(Debug, Error)]
pub enum GenvError {
    /// No config file was found in the searched directory.
    #[error("no env.config file found in {searched}")]
    ConfigNotFound {
        /// The directory (or explicit path) that was searched.
        searched: String,
    },

    /// A config file exists but could not be read or parsed.
    #[error("config parse failed for {path}: {reason}")]
    ConfigParseFailed {
        /// The path to the file that couldn't be parsed.
        path: String,
        /// The reason for the failure.
        reason: String,
    },

    /// The config file defines no environments.
    #[error("no environments defined in config file")]
    NoProfilesDefined,

    /// Two or more environments share a tag.
    #[error("duplicate environment names: {}", tags.join(", "))]
    DuplicateTag {
        /// Every tag that appears more than once, in first-seen order.
        tags: Vec<String>,
    },

    /// The requested tag does not name any environment.
    #[error("no environment found for tag '{tag}'")]
    ProfileNotFound {
        /// The tag that was looked up.
        tag: String,
    },

    /// The environment has no output path and none was supplied.
    #[error("no output path for environment '{tag}'")]
    EmptyOutputPath {
        /// The environment's tag.
        tag: String,
    },

    /// The environment has no variables to write.
    #[error("no config for environment '{tag}'")]
    EmptyProfileConfig {
        /// The environment's tag.
        tag: String,
    },

    /// The interactive prompt could not be shown (e.g. no TTY).
    #[error("prompt failed: {0}")]
    PromptFailed(String),

    /// Creating directories or writing the output file failed.
    #[error("filesystem error for {path}: {reason}")]
    FilesystemError {
        /// The path being created or written.
        path: String,
        /// The underlying system message.
        reason: String,
    },
}
