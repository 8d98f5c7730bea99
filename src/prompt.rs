//! Interactive prompts.
//!
//! The selector and writer never talk to the terminal directly; they go
//! through a [`Prompter`]. Cancellation is an ordinary answer
//! ([`Answer::Cancelled`]), not an error.

use std::fmt;

use inquire::{
    Confirm,
    InquireError,
    Select,
    Text,
};

use crate::error::{
    GenvError,
    GenvResult,
};

/// The result of a prompt the operator may abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    /// The operator answered.
    Value(T),
    /// The operator aborted (Esc, Ctrl-C).
    Cancelled,
}

impl<T> Answer<T> {
    /// Maps the answered value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Answer<U> {
        match self {
            Self::Value(v) => Answer::Value(f(v)),
            Self::Cancelled => Answer::Cancelled,
        }
    }

    /// Returns `true` for [`Answer::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// One entry of the environment choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChoice {
    /// The environment tag.
    pub tag: String,
    /// Its configured output path, if any.
    pub output: Option<String>,
}

impl fmt::Display for ProfileChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.output {
            Some(output) => write!(f, "{}  (Output: {})", self.tag, output),
            None => write!(f, "{}", self.tag),
        }
    }
}

/// Operator-facing prompts used while resolving and writing an environment.
pub trait Prompter {
    /// Asks the operator to pick one entry; answers with its index.
    ///
    /// # Errors
    ///
    /// Returns [`GenvError::PromptFailed`] if the prompt cannot be shown.
    fn select_one(
        &mut self,
        message: &str,
        choices: &[ProfileChoice],
        starting_cursor: usize,
    ) -> GenvResult<Answer<usize>>;

    /// Asks a yes/no question. The default answer is "no".
    ///
    /// # Errors
    ///
    /// Returns [`GenvError::PromptFailed`] if the prompt cannot be shown.
    fn confirm(&mut self, message: &str) -> GenvResult<Answer<bool>>;

    /// Asks for a line of text.
    ///
    /// # Errors
    ///
    /// Returns [`GenvError::PromptFailed`] if the prompt cannot be shown.
    fn text_input(&mut self, message: &str, placeholder: &str) -> GenvResult<Answer<String>>;
}

/// [`Prompter`] backed by `inquire` on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl InquirePrompter {
    /// Creates a terminal prompter.
    pub fn new() -> Self {
        Self
    }
}

fn from_inquire<T>(result: Result<T, InquireError>) -> GenvResult<Answer<T>> {
    match result {
        Ok(v) => Ok(Answer::Value(v)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(Answer::Cancelled)
        }
        Err(e) => Err(GenvError::PromptFailed(e.to_string())),
    }
}

impl Prompter for InquirePrompter {
    fn select_one(
        &mut self,
        message: &str,
        choices: &[ProfileChoice],
        starting_cursor: usize,
    ) -> GenvResult<Answer<usize>> {
        let result = Select::new(message, choices.to_vec())
            .with_starting_cursor(starting_cursor.min(choices.len().saturating_sub(1)))
            .raw_prompt()
            .map(|option| option.index);
        from_inquire(result)
    }

    fn confirm(&mut self, message: &str) -> GenvResult<Answer<bool>> {
        from_inquire(Confirm::new(message).with_default(false).prompt())
    }

    fn text_input(&mut self, message: &str, placeholder: &str) -> GenvResult<Answer<String>> {
        from_inquire(Text::new(message).with_placeholder(placeholder).prompt())
    }
}
