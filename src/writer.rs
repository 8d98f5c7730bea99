//! Writing the rendered environment to disk.

use std::path::{
    Path,
    PathBuf,
};

use tracing::{
    debug,
    info,
};

use crate::error::{
    GenvError,
    GenvResult,
};
use crate::format::RenderedEnv;
use crate::prompt::{
    Answer,
    Prompter,
};
use crate::selector::Resolution;

/// Makes an output path absolute.
///
/// A leading `~/` expands to the home directory. Relative paths resolve
/// against `base_dir` when given, otherwise against the working directory.
/// `.` components are dropped; `..` is kept as written.
///
/// # Errors
///
/// Returns [`GenvError::FilesystemError`] if the working directory is needed
/// but cannot be determined.
///
/// # Examples
///
/// ```rust
/// use std::path::{Path, PathBuf};
///
/// use genv::resolve_output_path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let path = resolve_output_path("./.env.dev", Some(Path::new("/srv/app")))?;
/// assert_eq!(path, PathBuf::from("/srv/app/.env.dev"));
/// # Ok(())
/// # }
/// ```
pub fn resolve_output_path(path: &str, base_dir: Option<&Path>) -> GenvResult<PathBuf> {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        return Ok(expanded.components().collect());
    }
    let base = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|e| GenvError::FilesystemError {
            path: ".".to_string(),
            reason: e.to_string(),
        })?,
    };
    let base = std::path::absolute(&base).unwrap_or(base);
    Ok(base.join(expanded).components().collect())
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Confirms and writes a resolved environment.
///
/// The write is a plain create-then-overwrite: missing parent directories
/// are created, then the whole file is replaced. Nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct EnvFileWriter {
    base_dir: Option<PathBuf>,
}

impl EnvFileWriter {
    /// Creates a writer that resolves relative paths against the working
    /// directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative output paths against `dir` instead.
    pub fn with_base_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.base_dir = dir;
        self
    }

    /// Writes `rendered` to the resolution's output path.
    ///
    /// Unless the resolution came from a forced tag, the operator is asked
    /// first; "no" or an aborted prompt returns [`Answer::Cancelled`] and
    /// leaves the disk untouched. On success the absolute path written is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`GenvError::FilesystemError`] if a directory cannot be
    /// created or the file cannot be written, and
    /// [`GenvError::PromptFailed`] if the confirmation cannot be shown.
    pub fn write(
        &self,
        resolution: &Resolution<'_>,
        rendered: &RenderedEnv,
        prompter: &mut dyn Prompter,
    ) -> GenvResult<Answer<PathBuf>> {
        let path = resolve_output_path(&resolution.output_path, self.base_dir.as_deref())?;

        if resolution.confirm {
            let message = confirm_message(&resolution.profile.tag, &path);
            match prompter.confirm(&message)? {
                Answer::Value(true) => {}
                Answer::Value(false) | Answer::Cancelled => {
                    info!(path = %path.display(), "write declined");
                    return Ok(Answer::Cancelled);
                }
            }
        }

        write_file(&path, &rendered.file_contents())?;
        info!(
            path = %path.display(),
            lines = rendered.line_count(),
            "environment file written"
        );
        Ok(Answer::Value(path))
    }
}

fn confirm_message(tag: &str, path: &Path) -> String {
    match existing_file_note(path) {
        Some(note) => format!("Write environment '{}' to {} ({})?", tag, path.display(), note),
        None => format!("Write environment '{}' to {}?", tag, path.display()),
    }
}

fn existing_file_note(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let parsed = dotenvy::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<Vec<(String, String)>, _>>());
    Some(match parsed {
        Ok(vars) => format!("replaces existing file with {} variables", vars.len()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "existing file is not valid dotenv");
            "replaces existing file".to_string()
        }
    })
}

fn write_file(path: &Path, contents: &str) -> GenvResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GenvError::FilesystemError {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    std::fs::write(path, contents).map_err(|e| GenvError::FilesystemError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
