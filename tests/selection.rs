//! Tests for environment selection.

mod common;

use common::{
    Call,
    Reply,
    ScriptedPrompter,
    profile,
};
use genv::{
    Answer,
    ConfigMapping,
    EnvironmentProfile,
    EnvironmentSelector,
    GenvError,
    ProfileSet,
    SelectionMode,
};

#[test]
fn duplicate_tags_fail_before_any_prompt() {
    let set = ProfileSet::new(vec![profile("prod", Some(".env")), profile("prod", Some(".env.2"))]);
    let mut prompter = ScriptedPrompter::silent();
    let err = EnvironmentSelector::new(&set)
        .resolve(&mut prompter)
        .unwrap_err();
    match err {
        GenvError::DuplicateTag { tags } => assert_eq!(tags, vec!["prod"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(prompter.calls.is_empty());
}

#[test]
fn duplicate_tags_win_over_forced_tag() {
    let set = ProfileSet::new(vec![
        profile("dev", Some(".env")),
        profile("prod", Some(".env")),
        profile("dev", Some(".env")),
    ]);
    let err = EnvironmentSelector::new(&set)
        .with_forced_tag(Some("prod"))
        .resolve(&mut ScriptedPrompter::silent())
        .unwrap_err();
    assert_eq!(err.to_string(), "duplicate environment names: dev");
}

#[test]
fn empty_set_fails() {
    let set = ProfileSet::default();
    let err = EnvironmentSelector::new(&set)
        .resolve(&mut ScriptedPrompter::silent())
        .unwrap_err();
    assert!(matches!(err, GenvError::NoProfilesDefined));
}

#[test]
fn single_profile_skips_choice_but_keeps_confirmation() {
    let set = ProfileSet::new(vec![profile("dev", Some(".env.dev"))]);
    let mut prompter = ScriptedPrompter::silent();
    let answer = EnvironmentSelector::new(&set).resolve(&mut prompter).unwrap();
    let Answer::Value(resolution) = answer else {
        panic!("expected a resolution");
    };
    assert_eq!(resolution.profile.tag, "dev");
    assert_eq!(resolution.output_path, ".env.dev");
    assert_eq!(resolution.mode, SelectionMode::OnlyProfile);
    assert!(resolution.confirm);
    assert!(prompter.calls.is_empty());
}

#[test]
fn forced_tag_resolves_with_zero_prompts() {
    let set = ProfileSet::new(vec![
        profile("dev", Some(".env.dev")),
        profile("prod", Some(".env.prod")),
    ]);
    let mut prompter = ScriptedPrompter::silent();
    let answer = EnvironmentSelector::new(&set)
        .with_forced_tag(Some("prod"))
        .resolve(&mut prompter)
        .unwrap();
    let Answer::Value(resolution) = answer else {
        panic!("expected a resolution");
    };
    assert_eq!(resolution.profile.tag, "prod");
    assert!(!resolution.confirm);
    assert_eq!(resolution.mode, SelectionMode::Forced);
    assert!(prompter.calls.is_empty());
}

#[test]
fn multiple_profiles_prompt_with_default_cursor() {
    let set = ProfileSet::new(vec![
        profile("dev", Some(".env.dev")),
        profile("staging", Some(".env.staging")),
        profile("prod", Some(".env.prod")),
    ]);
    let mut prompter = ScriptedPrompter::new(vec![Reply::Select(Answer::Value(1))]);
    let answer = EnvironmentSelector::new(&set)
        .with_default_tag(Some("prod"))
        .resolve(&mut prompter)
        .unwrap();
    let Answer::Value(resolution) = answer else {
        panic!("expected a resolution");
    };
    assert_eq!(resolution.profile.tag, "staging");
    assert_eq!(resolution.mode, SelectionMode::Chosen);
    assert!(resolution.confirm);
    assert_eq!(
        prompter.calls,
        vec![Call::Select {
            message: "Select an environment to write:".to_string(),
            choices: vec!["dev".into(), "staging".into(), "prod".into()],
            start: 2,
        }]
    );
}

#[test]
fn unknown_default_tag_starts_at_top() {
    let set = ProfileSet::new(vec![profile("a", Some(".a")), profile("b", Some(".b"))]);
    let mut prompter = ScriptedPrompter::new(vec![Reply::Select(Answer::Value(0))]);
    EnvironmentSelector::new(&set)
        .with_default_tag(Some("missing"))
        .resolve(&mut prompter)
        .unwrap();
    assert!(matches!(prompter.calls[0], Call::Select { start: 0, .. }));
}

#[test]
fn cancelled_choice_is_not_an_error() {
    let set = ProfileSet::new(vec![profile("a", Some(".a")), profile("b", Some(".b"))]);
    let mut prompter = ScriptedPrompter::new(vec![Reply::Select(Answer::Cancelled)]);
    let answer = EnvironmentSelector::new(&set).resolve(&mut prompter).unwrap();
    assert!(answer.is_cancelled());
}

#[test]
fn missing_output_path_is_asked_for() {
    let set = ProfileSet::new(vec![profile("dev", None)]);
    let mut prompter = ScriptedPrompter::new(vec![Reply::Text(Answer::Value(
        "  out/.env.dev ".to_string(),
    ))]);
    let answer = EnvironmentSelector::new(&set).resolve(&mut prompter).unwrap();
    let Answer::Value(resolution) = answer else {
        panic!("expected a resolution");
    };
    assert_eq!(resolution.output_path, "out/.env.dev");
    assert_eq!(
        prompter.calls,
        vec![Call::Text {
            message: "Output path for 'dev':".to_string(),
            placeholder: ".env.dev".to_string(),
        }]
    );
}

#[test]
fn blank_output_answer_fails() {
    let set = ProfileSet::new(vec![profile("dev", Some(""))]);
    let mut prompter = ScriptedPrompter::new(vec![Reply::Text(Answer::Value("   ".to_string()))]);
    let err = EnvironmentSelector::new(&set)
        .resolve(&mut prompter)
        .unwrap_err();
    assert!(matches!(err, GenvError::EmptyOutputPath { tag } if tag == "dev"));
}

#[test]
fn cancelled_output_prompt_fails() {
    let set = ProfileSet::new(vec![profile("dev", None)]);
    let mut prompter = ScriptedPrompter::new(vec![Reply::Text(Answer::Cancelled)]);
    let err = EnvironmentSelector::new(&set)
        .resolve(&mut prompter)
        .unwrap_err();
    assert!(matches!(err, GenvError::EmptyOutputPath { tag } if tag == "dev"));
    assert_eq!(prompter.calls.len(), 1);
}

#[test]
fn profile_without_variables_fails() {
    let set = ProfileSet::new(vec![EnvironmentProfile::new(
        "dev",
        Some(".env"),
        ConfigMapping::new(),
    )]);
    let err = EnvironmentSelector::new(&set)
        .resolve(&mut ScriptedPrompter::silent())
        .unwrap_err();
    assert_eq!(err.to_string(), "no config for environment 'dev'");
}
