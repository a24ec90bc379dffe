//! Integration test: reference fixture, end to end
//!
//! The same output built three ways: a builder closure over the chain
//! context, token mappings in YAML, and spec constructors.

use objmap_mapping::{Error, Mapper, MappingDsl, MappingSpec, transform};
use serde_json::{Value, json};

fn input() -> Value {
    json!({
        "a": "5.2",
        "b": {
            "c": 3,
            "d": [2, 1, 3]
        }
    })
}

fn expected_output() -> Value {
    json!({
        "A": ["5"],
        "B": [3, 2, 1],
        "C": true,
        "D": 3,
        "E": {
            "answer": 5.2
        }
    })
}

#[test]
fn test_reference_fixture_with_builder() -> anyhow::Result<()> {
    let source = input();
    let output = Mapper::new().define_mapping(&source, |f| {
        let a = f.get("a").to_int(10).to_str().to_array().literal();

        let c = f.get("b.c").value();
        let d = f.get("b.d").value();
        let b = f.set(json!([c, d])).flatten(false).unique().literal();

        let c_flag = f.get("b.d").sum().to_bool().literal();
        let d_child = f.get("b.d").flatten(true).child(2).literal();

        let answer = f.get("a").to_float().value();
        let e = f.set(json!({ "answer": answer })).stringify().to_object().literal();

        MappingSpec::fields([("A", a), ("B", b), ("C", c_flag), ("D", d_child), ("E", e)])
    })?;

    assert_eq!(output, expected_output());
    Ok(())
}

#[test]
fn test_reference_fixture_keys_from_yaml_tokens() -> anyhow::Result<()> {
    let yaml = r"
A:
  - get:a
  - toInt:10
  - toStr
  - toArray
C:
  - get:b.d
  - sum
  - toBool
D:
  - get:b.d
  - flatten:true
  - child:2
";
    let spec = MappingDsl::parse(yaml)?;
    let output = transform(&input(), &spec, [])?;

    let expected = expected_output();
    assert_eq!(output, json!({"A": expected["A"], "C": expected["C"], "D": expected["D"]}));
    Ok(())
}

#[test]
fn test_scenario_int_string_array_pipeline() {
    let source = input();
    let output = Mapper::new()
        .define_mapping(&source, |f| {
            MappingSpec::fields([("A", f.get("a").to_int(10).to_str().to_array().literal())])
        })
        .unwrap();
    assert_eq!(output, json!({"A": ["5"]}));
}

#[test]
fn test_scenario_sum_to_bool() {
    let source = input();
    let mapper = Mapper::new();
    let mut f = mapper.context(&source);
    assert_eq!(f.get("b.d").sum().to_bool().value(), json!(true));
    assert!(f.error().is_none());
}

#[test]
fn test_scenario_unknown_filter_has_no_partial_result() {
    let spec = MappingSpec::fields([
        ("ok", MappingSpec::filter("get:a")),
        ("broken", MappingSpec::filter("bogus:1")),
    ]);
    let result = transform(&input(), &spec, []);
    match result {
        Err(Error::UnknownFilter { name }) => assert_eq!(name, "bogus"),
        other => panic!("expected UnknownFilter, got {other:?}"),
    }
}

#[test]
fn test_scenario_flatten_deep_and_shallow() {
    let source = json!({"nested": [[3], [[4], 5], [[[[[6]]]]]]});
    let mapper = Mapper::new();
    let mut f = mapper.context(&source);

    assert_eq!(f.get("nested").flatten(true).value(), json!([3, 4, 5, 6]));
    assert_eq!(
        f.get("nested").flatten(false).value(),
        json!([3, [4], 5, [[[[6]]]]])
    );
}

#[test]
fn test_empty_sequence_regardless_of_source() {
    for source in [input(), json!(null), json!("text")] {
        let output = transform(&source, &MappingSpec::sequence([]), []).unwrap();
        assert_eq!(output, json!([]));
    }
}
