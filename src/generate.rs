//! The end-to-end pipeline: load, select, render, confirm, write.

use std::path::PathBuf;

use tracing::warn;

use crate::config::ConfigLoader;
use crate::error::GenvResult;
use crate::format::render;
use crate::prompt::{
    Answer,
    Prompter,
};
use crate::selector::{
    EnvironmentSelector,
    SelectionMode,
};
use crate::writer::EnvFileWriter;

/// Inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Directory used for config discovery.
    pub working_dir: PathBuf,
    /// Explicit config file or directory.
    pub config: Option<PathBuf>,
    /// Tag that skips every prompt (e.g. from `GENV_CI_TAG`).
    pub forced_tag: Option<String>,
}

/// How a run ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was written.
    Written {
        /// Tag of the environment written.
        tag: String,
        /// Absolute path of the written file.
        path: PathBuf,
        /// How the environment was picked.
        mode: SelectionMode,
    },
    /// The operator aborted or declined; nothing was written.
    Cancelled,
}

/// Runs the whole pipeline once.
///
/// Relative output paths resolve against the directory of the loaded config
/// file.
///
/// # Errors
///
/// Returns any [`GenvError`](crate::GenvError) raised while loading the
/// config, selecting the environment or writing the file.
///
/// # Examples
///
/// ```rust,no_run
/// use genv::{generate, GenerateOptions, InquirePrompter, Outcome};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = GenerateOptions {
///     working_dir: std::env::current_dir()?,
///     ..Default::default()
/// };
/// if let Outcome::Written { path, .. } = generate(&options, &mut InquirePrompter::new())? {
///     println!("wrote {}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub fn generate(options: &GenerateOptions, prompter: &mut dyn Prompter) -> GenvResult<Outcome> {
    let loaded = ConfigLoader::new(&options.working_dir)
        .with_path(options.config.clone())
        .load()?;

    let resolution = match EnvironmentSelector::new(&loaded.config.environments)
        .with_forced_tag(options.forced_tag.as_deref())
        .with_default_tag(loaded.config.default_environment.as_deref())
        .resolve(prompter)?
    {
        Answer::Value(resolution) => resolution,
        Answer::Cancelled => return Ok(Outcome::Cancelled),
    };

    let rendered = render(&resolution.profile.variables);
    for collision in rendered.collisions() {
        warn!(
            key = %collision.key,
            replaced = %collision.replaced,
            winner = %collision.winner,
            "keys normalize to the same name; last value wins"
        );
    }
    for skipped in rendered.skipped_keys() {
        warn!(key = %skipped, "key has no usable characters; skipped");
    }

    let written = EnvFileWriter::new()
        .with_base_dir(Some(loaded.base_dir().to_path_buf()))
        .write(&resolution, &rendered, prompter)?;

    Ok(match written {
        Answer::Value(path) => Outcome::Written {
            tag: resolution.profile.tag.clone(),
            path,
            mode: resolution.mode,
        },
        Answer::Cancelled => Outcome::Cancelled,
    })
}
