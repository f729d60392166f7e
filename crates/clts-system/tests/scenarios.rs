//! Golden scenarios: parse results of the reference system.
//!
//! Each case in `tests/data/scenarios.json` names an input and the expected
//! sound type; `generated`, `alias`, `canonical` and `name` are checked when
//! present.
//!
//! Run: cargo test -p clts-system --test scenarios

use std::path::PathBuf;

use serde_json::Value;

use clts_system::{TranscriptionSystem, bipa};

fn load_golden(filename: &str) -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(filename);
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read golden file {}: {}", path.display(), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| panic!("failed to parse golden file {}: {}", path.display(), e))
}

fn system() -> TranscriptionSystem {
    bipa::bipa().unwrap_or_else(|e| panic!("reference system does not load: {e}"))
}

#[test]
fn golden_scenarios() {
    let golden = load_golden("scenarios.json");
    let ts = system();
    assert_eq!(golden["system"].as_str(), Some(ts.id()));

    let cases = golden["cases"].as_array().expect("cases array");
    assert!(!cases.is_empty());

    let mut failures = Vec::new();
    for case in cases {
        let input = case["input"].as_str().expect("input");
        let sound = ts.resolve(input);

        let mut check = |field: &str, expected: &Value, actual: Value| {
            if !expected.is_null() && *expected != actual {
                failures.push(format!("{input:?}: {field} expected {expected}, got {actual}"));
            }
        };
        check("type", &case["type"], Value::from(sound.sound_type().as_str()));
        check("generated", &case["generated"], Value::from(sound.is_generated()));
        check("alias", &case["alias"], Value::from(sound.is_alias()));
        check("canonical", &case["canonical"], Value::from(ts.canonical(&sound)));
        check(
            "name",
            &case["name"],
            sound.name().map(Value::from).unwrap_or(Value::Null),
        );
    }

    assert!(failures.is_empty(), "{} mismatches:\n{}", failures.len(), failures.join("\n"));
}

#[test]
fn golden_inputs_are_idempotent() {
    let golden = load_golden("scenarios.json");
    let ts = system();
    for case in golden["cases"].as_array().expect("cases array") {
        let input = case["input"].as_str().expect("input");
        let first = ts.resolve(input);
        let second = ts.resolve(&ts.canonical(&first));
        assert_eq!(first.featureset(), second.featureset(), "{input:?}");
        assert_eq!(ts.canonical(&first), ts.canonical(&second), "{input:?}");
    }
}

#[test]
fn golden_names_parse_back() {
    let golden = load_golden("scenarios.json");
    let ts = system();
    for case in golden["cases"].as_array().expect("cases array") {
        if case["type"] == "marker" {
            continue;
        }
        let Some(name) = case["name"].as_str() else {
            continue;
        };
        let input = case["input"].as_str().expect("input");
        let sound = ts
            .from_name(name)
            .unwrap_or_else(|e| panic!("{name:?}: {e}"));
        assert_eq!(sound.name().as_deref(), Some(name));
        assert_eq!(sound.featureset(), ts.resolve(input).featureset(), "{name:?}");
    }
}
