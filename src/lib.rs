#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::missing_safety_doc)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod format;
pub mod generate;
pub mod prompt;
pub mod selector;
pub mod value;
pub mod writer;

pub use crate::config::{
    ConfigFormat,
    ConfigLoader,
    EnvironmentProfile,
    LoadedConfig,
    ProfileSet,
    UserConfig,
};
pub use crate::error::{
    GenvError,
    GenvResult,
};
pub use crate::format::{
    KeyCollision,
    RenderedEnv,
    escape_value,
    normalize_key,
    render,
    unescape_value,
};
pub use crate::generate::{
    GenerateOptions,
    Outcome,
    generate,
};
pub use crate::prompt::{
    Answer,
    InquirePrompter,
    ProfileChoice,
    Prompter,
};
pub use crate::selector::{
    EnvironmentSelector,
    Resolution,
    SelectionMode,
};
pub use crate::value::{
    ConfigMapping,
    ConfigValue,
};
pub use crate::writer::{
    EnvFileWriter,
    resolve_output_path,
};
