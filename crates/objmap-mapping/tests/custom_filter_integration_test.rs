//! Integration test: custom filter registration
//!
//! Tests registry merging, overrides and custom filters used from tokens and chains.

use objmap_mapping::{
    Arity, Error, Filter, FilterError, FilterKind, FilterRegistry, Mapper, MappingSpec, filters,
    transform,
};
use serde_json::{Value, json};

fn upper() -> Filter {
    Filter::new("upper", Arity::none(), |input, _, _| match input {
        Value::String(s) => Ok(Value::String(s.to_uppercase())),
        other => Err(FilterError::invalid_input(format!("cannot uppercase {other}"))),
    })
}

fn pick() -> Filter {
    Filter::path("pick", Arity::exactly(1), |input, _, args| {
        let key = args[0].as_str().unwrap_or_default();
        Ok(input.get(key).cloned().unwrap_or(Value::Null))
    })
}

#[test]
fn test_registry_union_and_precedence() {
    let defaults = filters::default_filters();
    let default_count = defaults.len();
    let custom_to_str = Filter::new("toStr", Arity::none(), |_, _, _| Ok(json!("custom")));

    let registry = FilterRegistry::build(defaults, [upper(), custom_to_str]).unwrap();

    assert_eq!(registry.len(), default_count + 1);
    assert!(registry.contains("upper"));
    assert_eq!(
        registry.invoke("toStr", &json!(1), &Value::Null, &[]).unwrap(),
        json!("custom")
    );
}

#[test]
fn test_custom_filter_in_token_mapping() {
    let source = json!({"user": {"name": "ada"}});
    let spec = MappingSpec::fields([(
        "name",
        MappingSpec::sequence([MappingSpec::filter("get:user.name"), MappingSpec::filter("upper")]),
    )]);
    let output = transform(&source, &spec, [upper()]).unwrap();
    assert_eq!(output, json!({"name": "ADA"}));
}

#[test]
fn test_custom_filter_failure_in_token_mapping() {
    let source = json!({"n": 4});
    let spec = MappingSpec::sequence([MappingSpec::filter("get:n"), MappingSpec::filter("upper")]);
    let err = transform(&source, &spec, [upper()]).unwrap_err();
    match err {
        Error::Filter { filter, source } => {
            assert_eq!(filter, "upper");
            assert_eq!(source, FilterError::InvalidInput("cannot uppercase 4".to_string()));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_custom_path_filter_tracks_path_in_chain() {
    let mapper = Mapper::with_filters([pick()]).unwrap();
    assert_eq!(mapper.registry().get("pick").unwrap().kind(), FilterKind::Path);

    let source = json!({"user": {"name": "ada"}});
    let mut f = mapper.context(&source);
    let name = f.get("user").call("pick", &["name".into()]).value();
    assert_eq!(name, json!("ada"));
    assert_eq!(f.current_path(), "name");
}

#[test]
fn test_override_default_used_by_typed_method() {
    let loud_sum = Filter::new("sum", Arity::none(), |_, _, _| Ok(json!(1000)));
    let mapper = Mapper::with_filters([loud_sum]).unwrap();
    let source = json!({"xs": [1, 2]});
    let mut f = mapper.context(&source);
    assert_eq!(f.get("xs").sum().value(), json!(1000));
}

#[test]
fn test_invalid_custom_filters_fail_at_build_time() {
    for name in ["", "a:b", "has space"] {
        let filter = Filter::new(name, Arity::none(), |_, _, _| Ok(Value::Null));
        let err = transform(&json!({}), &MappingSpec::sequence([]), [filter]).unwrap_err();
        assert!(matches!(err, Error::InvalidFilter { .. }), "accepted {name:?}");
    }

    let inverted = Filter::new("inverted", Arity { min: 3, max: Some(1) }, |_, _, _| {
        Ok(Value::Null)
    });
    assert!(matches!(
        Mapper::with_filters([inverted]),
        Err(Error::InvalidFilter { .. })
    ));
}

#[test]
fn test_variadic_filter_receives_token_arguments() {
    let pack = Filter::new("pack", Arity::at_least(1), |_, _, args| {
        Ok(Value::Array(
            args.iter()
                .filter_map(|arg| arg.as_value().cloned())
                .collect(),
        ))
    });
    let output = transform(&json!(null), &MappingSpec::filter("pack:x:y:z"), [pack]).unwrap();
    assert_eq!(output, json!(["x", "y", "z"]));
}

#[test]
fn test_merged_registry_is_independent() {
    let base = FilterRegistry::with_defaults();
    let merged = base.merged([upper()]).unwrap();
    assert!(!base.contains("upper"));
    assert!(merged.contains("upper"));
}
