//! Property-based tests for the platform file encoding

use proptest::prelude::*;
use tfci::environment::{encode_entry, DelimiterToken, OutputSet, OutputValue};

use crate::test_utils::parse_output_file;

fn token() -> DelimiterToken {
    DelimiterToken::for_run("GHDELIM", "42", "7", 1234)
}

/// Payload lines biased towards text that looks like protocol syntax.
fn hostile_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GHDELIM_42_7_1234".to_string()),
        Just("GHDELIM_42_7_1234_1".to_string()),
        Just("status=Hijacked".to_string()),
        Just("key<<EOF".to_string()),
        "[a-z0-9=< ]{0,12}",
    ]
}

fn payload() -> impl Strategy<Value = String> {
    prop::collection::vec(hostile_line(), 0..6).prop_map(|lines| lines.join("\n"))
}

fn encode_set(outputs: &OutputSet) -> String {
    let token = token();
    outputs
        .iter()
        .map(|(key, value)| encode_entry(key, value, &token))
        .collect()
}

proptest! {
    #[test]
    fn single_line_payloads_use_inline_form(value in "[^\r\n]{0,40}") {
        let encoded = encode_entry("key", &OutputValue::new(value.clone()), &token());
        prop_assert_eq!(encoded, format!("key={}\n", value));
    }

    #[test]
    fn payloads_survive_with_their_neighbours(first in payload(), second in payload()) {
        let outputs = OutputSet::new()
            .with("before", "1")
            .with("first", first.as_str())
            .with("second", second.as_str())
            .with("after", "2");

        let entries = parse_output_file(&encode_set(&outputs));
        prop_assert_eq!(
            entries,
            vec![
                ("before".to_string(), "1".to_string()),
                ("first".to_string(), first),
                ("second".to_string(), second),
                ("after".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn last_write_wins(keys in prop::collection::vec("[a-c]", 1..12)) {
        let mut outputs = OutputSet::new();
        for (i, key) in keys.iter().enumerate() {
            outputs.insert(key.as_str(), i.to_string());
        }

        for (key, value) in outputs.iter() {
            let last = keys.iter().rposition(|k| k == key).unwrap();
            prop_assert_eq!(value.as_str(), last.to_string());
        }
        let mut distinct = keys.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(outputs.len(), distinct.len());
    }
}
