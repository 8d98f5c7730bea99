//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;

use genv::{
    Answer,
    ConfigMapping,
    EnvironmentProfile,
    GenvResult,
    ProfileChoice,
    Prompter,
};

/// A prompt the code under test asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Select {
        message: String,
        choices: Vec<String>,
        start: usize,
    },
    Confirm(String),
    Text {
        message: String,
        placeholder: String,
    },
}

/// A canned reply, consumed in order.
#[derive(Debug, Clone)]
pub enum Reply {
    Select(Answer<usize>),
    Confirm(Answer<bool>),
    Text(Answer<String>),
}

/// Replays scripted answers and records every prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    replies: VecDeque<Reply>,
    pub calls: Vec<Call>,
}

impl ScriptedPrompter {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: replies.into(),
            calls: Vec::new(),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn confirming(yes: bool) -> Self {
        Self::new(vec![Reply::Confirm(Answer::Value(yes))])
    }

    pub fn confirms(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Confirm(_)))
            .count()
    }

    pub fn selects(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Select { .. }))
            .count()
    }
}

impl Prompter for ScriptedPrompter {
    fn select_one(
        &mut self,
        message: &str,
        choices: &[ProfileChoice],
        starting_cursor: usize,
    ) -> GenvResult<Answer<usize>> {
        self.calls.push(Call::Select {
            message: message.to_string(),
            choices: choices.iter().map(|c| c.tag.clone()).collect(),
            start: starting_cursor,
        });
        match self.replies.pop_front() {
            Some(Reply::Select(answer)) => Ok(answer),
            other => panic!("select prompt got reply {:?}", other),
        }
    }

    fn confirm(&mut self, message: &str) -> GenvResult<Answer<bool>> {
        self.calls.push(Call::Confirm(message.to_string()));
        match self.replies.pop_front() {
            Some(Reply::Confirm(answer)) => Ok(answer),
            other => panic!("confirm prompt got reply {:?}", other),
        }
    }

    fn text_input(&mut self, message: &str, placeholder: &str) -> GenvResult<Answer<String>> {
        self.calls.push(Call::Text {
            message: message.to_string(),
            placeholder: placeholder.to_string(),
        });
        match self.replies.pop_front() {
            Some(Reply::Text(answer)) => Ok(answer),
            other => panic!("text prompt got reply {:?}", other),
        }
    }
}

pub fn vars(pairs: &[(&str, &str)]) -> ConfigMapping {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn profile(tag: &str, output: Option<&str>) -> EnvironmentProfile {
    EnvironmentProfile::new(tag, output, vars(&[("KEY", "value")]))
}

pub fn write_config(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}
