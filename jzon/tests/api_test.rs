// SPDX-License-Identifier: Apache-2.0

// Behaviour of the public entry points on the documented scenarios.

use jzon::{ErrKind, ParserConfig, Value};

#[test]
fn test_round_trip_scenario() {
    let root = jzon::parse(r#"{a: 1, b: [2, 3], c: "x"}"#).unwrap();
    assert!(root.is_table());
    assert_eq!(root.size(), 3);

    let a = jzon::get(&root, "a").unwrap();
    assert_eq!(a.as_int(), Some(1));

    let b = jzon::get(&root, "b").unwrap();
    assert!(b.is_array());
    assert_eq!(b.size(), 2);
    assert_eq!(b.index(0).and_then(Value::as_int), Some(2));
    assert_eq!(b.index(1).and_then(Value::as_int), Some(3));

    let c = jzon::get(&root, "c").unwrap();
    assert_eq!(c.as_str(), Some("x"));

    jzon::free(root);
}

#[test]
fn test_multiline_scenario() {
    let root = jzon::parse("key: \"\"\"line one\n  line two\"\"\"").unwrap();
    assert_eq!(
        jzon::get(&root, "key").and_then(Value::as_str),
        Some("line one\nline two")
    );
}

#[test]
fn test_comment_scenario() {
    let with_comment = jzon::parse("# comment\na: 1").unwrap();
    let without = jzon::parse("a: 1").unwrap();
    assert_eq!(with_comment, without);
}

#[test]
fn test_malformed_scenario() {
    let result = jzon::parse("{a: }");
    assert!(result.is_err());
}

#[test]
fn test_separator_optional_scenario() {
    let spaced = jzon::parse("{a:1 b:2}").unwrap();
    let commas = jzon::parse("{a:1, b:2}").unwrap();
    assert_eq!(spaced.size(), 2);
    assert_eq!(spaced, commas);
}

#[test]
fn test_empty_inputs() {
    for input in ["", "{}"] {
        let root = jzon::parse(input).unwrap();
        let table = root.as_table().expect("root is a table");
        assert_eq!(root.size(), 0);
        assert_eq!(table.capacity(), 0, "no storage for {input:?}");
    }
}

#[test]
fn test_key_index_is_hash_sorted() {
    let input = "zebra: 1 apple: 2 mango: 3 kiwi: 4 banana: 5 cherry: 6 date: 7 fig: 8 \
                 grape: 9 lemon: 10 nested: { z: 1 y: 2 x: 3 w: 4 }";
    let root = jzon::parse(input).unwrap();

    fn check(value: &Value) {
        if let Some(table) = value.as_table() {
            let pairs = table.pairs();
            assert!(pairs
                .windows(2)
                .all(|w| w[0].key_hash() <= w[1].key_hash()));
            for pair in pairs {
                assert_eq!(pair.key_hash(), jzon::key_hash(pair.key().as_bytes()));
                check(pair.value());
            }
        }
    }
    check(&root);
    assert_eq!(root.size(), 11);
}

#[test]
fn test_get_returns_matching_key() {
    let root = jzon::parse("one: 1 two: 2 three: 3 \"with space\": 4").unwrap();
    for (key, expected) in [("one", 1), ("two", 2), ("three", 3), ("with space", 4)] {
        let value = jzon::get(&root, key).unwrap();
        assert_eq!(value.as_int(), Some(expected), "key {key}");
    }
    assert!(jzon::get(&root, "four").is_none());
    assert!(jzon::get(&root, b"one".as_slice()).is_some());
}

#[test]
fn test_get_on_non_table() {
    let root = jzon::parse("list: [1 2] text: \"t\" n: 5").unwrap();
    for key in ["list", "text", "n"] {
        let value = jzon::get(&root, key).unwrap();
        assert!(jzon::get(value, "anything").is_none());
    }
}

#[test]
fn test_duplicate_keys_keep_every_member() {
    let root = jzon::parse("k: 1 k: 2").unwrap();
    assert_eq!(root.size(), 2);
    assert_eq!(jzon::get(&root, "k").and_then(Value::as_int), Some(2));
}

#[test]
fn test_error_reports_position() {
    let err = jzon::parse("a: 1\nb: [1, 2,\nc: 3").unwrap_err();
    assert_eq!(err.kind(), ErrKind::UnexpectedCharacter(b'c'));
    assert_eq!(err.position(), 15);
    assert_eq!(err.to_string(), "unexpected character 'c' at byte 15");
}

#[test]
fn test_config_depth() {
    let input = "a: { b: { c: [1] } }";
    let shallow = ParserConfig::new().with_max_depth(2);
    let err = jzon::parse_with_config_in(input, jzon::Heap, shallow).unwrap_err();
    assert_eq!(err.kind(), ErrKind::MaxDepthReached);

    let enough = ParserConfig::default().with_max_depth(3);
    assert!(jzon::parse_with_config_in(input, jzon::Heap, enough).is_ok());
    assert_eq!(ParserConfig::default().max_depth, jzon::DEFAULT_MAX_DEPTH);
}

#[test]
fn test_iteration_orders() {
    let root = jzon::parse("arr: [3 1 2] tbl: {only: true}").unwrap();
    let arr: Vec<i32> = root
        .get("arr")
        .and_then(Value::as_array)
        .unwrap()
        .iter()
        .filter_map(Value::as_int)
        .collect();
    assert_eq!(arr, vec![3, 1, 2]);

    let tbl = root.get("tbl").and_then(Value::as_table).unwrap();
    let keys: Vec<String> = tbl.iter().map(|pair| pair.key().to_string()).collect();
    assert_eq!(keys, vec!["only".to_string()]);
}

#[test]
fn test_debug_output() {
    let root = jzon::parse("a: [1, 2.5, \"s\", null, true]").unwrap();
    assert_eq!(format!("{root:?}"), r#"{"a": [1, 2.5, "s", null, true]}"#);
}
