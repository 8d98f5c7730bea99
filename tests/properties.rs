//! Property-based tests for the dotenv formatter.
//!
//! Test coverage:
//! - normalize_key: output alphabet, no edge or doubled underscores
//! - escape_value / unescape_value: escaping is reversible for any string
//! - render: pure and deterministic, empty keys never emitted
//! - rendered output parses back with a real dotenv parser

use genv::{
    ConfigMapping,
    ConfigValue,
    escape_value,
    normalize_key,
    render,
    unescape_value,
};
use proptest::prelude::*;

/// Strategy for arbitrary scalar config values.
fn scalar_strategy() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Null),
        any::<bool>().prop_map(ConfigValue::Bool),
        any::<i64>().prop_map(ConfigValue::from),
        any::<f64>().prop_map(ConfigValue::Float),
        ".*".prop_map(ConfigValue::String),
    ]
}

/// Strategy for mappings whose keys include punctuation-only names.
fn mapping_strategy() -> impl Strategy<Value = ConfigMapping> {
    let key = prop_oneof!["[a-zA-Z][a-zA-Z0-9 _.-]{0,12}", "[!?#. ]{1,4}"];
    prop::collection::vec((key, scalar_strategy()), 0..12)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn normalized_keys_are_identifiers(raw in ".*") {
        let key = normalize_key(&raw);
        prop_assert!(key.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'));
        prop_assert!(!key.starts_with('_'));
        prop_assert!(!key.ends_with('_'));
        prop_assert!(!key.contains("__"));
    }

    #[test]
    fn normalize_is_idempotent(raw in ".*") {
        let once = normalize_key(&raw);
        prop_assert_eq!(normalize_key(&once), once);
    }

    #[test]
    fn escaping_is_reversible(s in ".*") {
        prop_assert_eq!(unescape_value(&escape_value(&s)), s);
    }

    #[test]
    fn escaped_values_stay_on_one_line(s in ".*") {
        let escaped = escape_value(&s);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
    }

    #[test]
    fn render_is_deterministic(mapping in mapping_strategy()) {
        let first = render(&mapping);
        let second = render(&mapping);
        prop_assert_eq!(first.body(), second.body());
        for line in first.body().lines() {
            prop_assert!(!line.starts_with('='));
        }
    }

    #[test]
    fn render_emits_one_line_per_distinct_key(mapping in mapping_strategy()) {
        let rendered = render(&mapping);
        let mut distinct: Vec<String> = mapping
            .iter()
            .map(|(k, _)| normalize_key(k))
            .filter(|k| !k.is_empty())
            .collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(rendered.line_count(), distinct.len());
    }
}

#[test]
fn documented_examples_render_as_expected() {
    assert_eq!(normalize_key("  my-key!! "), "MY_KEY");
    assert_eq!(normalize_key("???"), "");
    assert_eq!(ConfigValue::Null.to_env_string(), "");
    assert_eq!(ConfigValue::Bool(true).to_env_string(), "true");
    assert_eq!(ConfigValue::Float(3.5).to_env_string(), "3.5");
    let nested: ConfigMapping = [("a", 1)].into_iter().collect();
    assert_eq!(ConfigValue::Mapping(nested).to_env_string(), r#"{"a":1}"#);
}

#[test]
fn rendered_output_parses_as_dotenv() {
    let mut mapping = ConfigMapping::new();
    mapping.insert("greeting", "hello world");
    mapping.insert("channel", "#general");
    mapping.insert("owner", "it's mine");
    mapping.insert("quoted", "say \"hi\"");
    mapping.insert("empty", "");
    mapping.insert("port", 8080);
    mapping.insert("enabled", true);

    let contents = render(&mapping).file_contents();
    let parsed: Vec<(String, String)> = dotenvy::from_read_iter(contents.as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        parsed,
        vec![
            ("GREETING".to_string(), "hello world".to_string()),
            ("CHANNEL".to_string(), "#general".to_string()),
            ("OWNER".to_string(), "it's mine".to_string()),
            ("QUOTED".to_string(), "say \"hi\"".to_string()),
            ("EMPTY".to_string(), String::new()),
            ("PORT".to_string(), "8080".to_string()),
            ("ENABLED".to_string(), "true".to_string()),
        ]
    );
}
