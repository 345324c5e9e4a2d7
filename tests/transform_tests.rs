use jsonpath_transform::{
    AbsentPolicy, QueryError, QueryEvaluator, Spec, SpecNode, TransformError, Transformer,
    Trigger, Value, output::to_json, spec::BRACKET_TRIGGER, transform,
};
use serde_json::{Value as JsonValue, json};

fn run(doc: JsonValue, spec: JsonValue) -> Value {
    transform(&doc, &spec).unwrap()
}

/// Transform with the bracket trigger, where `$` and `$[..]` leaves are queries.
fn run_bracket(doc: JsonValue, spec: JsonValue) -> Value {
    let trigger = Trigger::new(BRACKET_TRIGGER).unwrap();
    Transformer::new()
        .transform(&doc, &Spec::with_trigger(&spec, &trigger))
        .unwrap()
}

fn expected(v: JsonValue) -> Value {
    Value::from(v)
}

fn crazy_doc() -> JsonValue {
    json!({
        "some": {
            "crazy": [
                { "example": "A" },
                { "example": "B" }
            ]
        }
    })
}

// ========================================================================
// Single values
// ========================================================================

#[test]
fn test_literal_root_passes_through() {
    assert_eq!(run(json!({ "a": 1 }), json!("hello")), expected(json!("hello")));
    assert_eq!(run(json!([1, 2]), json!("hello")), expected(json!("hello")));
}

#[test]
fn test_query_root_returns_scalar() {
    let result = run(json!({ "a": { "b": 3 } }), json!("$.a.b"));
    assert_eq!(result, expected(json!(3)));
}

#[test]
fn test_unmatched_query_root_is_absent() {
    assert_eq!(run(json!({}), json!("$.nope")), Value::Absent);
}

#[test]
fn test_absent_query_keeps_key() {
    let result = run(json!({ "a": 1 }), json!({ "x": "$.missing" }));
    assert_eq!(result.get("x"), Some(&Value::Absent));
    assert_eq!(to_json(&result, AbsentPolicy::Null), r#"{"x":null}"#);
}

#[test]
fn test_dollar_without_dot_is_literal() {
    let result = run(
        json!({ "a": 1 }),
        json!({ "currency": "$", "label": "$[USD]", "price": "costs $5" }),
    );
    assert_eq!(
        result,
        expected(json!({ "currency": "$", "label": "$[USD]", "price": "costs $5" }))
    );
}

#[test]
fn test_dollar_key_is_literal() {
    let result = run(json!({ "a": 1 }), json!({ "$": "$.a", "$[0]": "x" }));
    assert_eq!(result, expected(json!({ "$": 1, "$[0]": "x" })));
}

#[test]
fn test_bracket_trigger_is_opt_in() {
    let result = run_bracket(json!({ "a": 1 }), json!({ "all": "$", "a": "$['a']" }));
    assert_eq!(result, expected(json!({ "all": { "a": 1 }, "a": 1 })));
}

#[test]
fn test_null_match_is_not_absent() {
    let result = run(json!({ "a": null }), json!({ "x": "$.a" }));
    assert_eq!(result.get("x"), Some(&Value::Null));
}

#[test]
fn test_first_match_wins() {
    let result = run(json!({ "xs": [5, 6, 7] }), json!({ "x": "$.xs[*]" }));
    assert_eq!(result, expected(json!({ "x": 5 })));
}

#[test]
fn test_literals_and_queries_mix() {
    let doc = json!({ "name": "Alice", "age": 30 });
    let result = run(
        doc,
        json!({ "kind": "person", "name": "$.name", "years": "$.age" }),
    );
    assert_eq!(
        result,
        expected(json!({ "kind": "person", "name": "Alice", "years": 30 }))
    );
}

// ========================================================================
// Object mappings
// ========================================================================

#[test]
fn test_nested_objects() {
    let doc = json!({ "user": { "first": "Ada", "last": "Lovelace" } });
    let result = run(
        doc,
        json!({ "person": { "name": { "given": "$.user.first", "family": "$.user.last" } } }),
    );
    assert_eq!(
        result,
        expected(json!({ "person": { "name": { "given": "Ada", "family": "Lovelace" } } }))
    );
}

#[test]
fn test_declaration_order_is_kept() {
    let result = run(json!({}), json!({ "z": "1", "a": "2", "m": "3" }));
    assert_eq!(to_json(&result, AbsentPolicy::Null), r#"{"z":"1","a":"2","m":"3"}"#);
}

#[test]
fn test_unrecognized_nodes_are_skipped() {
    let result = run(json!({ "x": 1 }), json!({ "a": 5, "b": "$.x", "c": null, "d": [] }));
    assert_eq!(result.get("a"), None);
    assert_eq!(result.get("c"), None);
    assert_eq!(result.get("d"), None);
    assert_eq!(result, expected(json!({ "b": 1 })));
}

#[test]
fn test_empty_object_spec() {
    assert_eq!(run(json!({ "a": 1 }), json!({})), expected(json!({})));
}

// ========================================================================
// Array mappings
// ========================================================================

#[test]
fn test_array_mapping_per_item() {
    let result = run(
        crazy_doc(),
        json!({ "foo": ["$.some.crazy", { "bar": "$.example" }] }),
    );
    assert_eq!(result, expected(json!({ "foo": [{ "bar": "A" }, { "bar": "B" }] })));
}

#[test]
fn test_array_mapping_merge() {
    let result = run(
        crazy_doc(),
        json!({ "foo": ["$.some.crazy", { "bar": "$.example" }, { "merge": true }] }),
    );
    assert_eq!(result, expected(json!({ "foo": { "bar": "B" } })));
}

#[test]
fn test_merge_keeps_fields_from_every_item() {
    let doc = json!({ "parts": [{ "a": 1 }, { "b": 2 }, { "a": 3 }] });
    let result = run(
        doc,
        json!({ "all": ["$.parts", { "a": "$.a", "b": "$.b" }, { "merge": true }] }),
    );
    // Absent fields of later items overwrite earlier values too.
    assert_eq!(result.get("all").and_then(|v| v.get("a")), Some(&expected(json!(3))));
    assert_eq!(result.get("all").and_then(|v| v.get("b")), Some(&Value::Absent));
}

#[test]
fn test_merge_false_keeps_array() {
    let result = run(
        crazy_doc(),
        json!({ "foo": ["$.some.crazy", { "bar": "$.example" }, { "merge": false }] }),
    );
    assert_eq!(result, expected(json!({ "foo": [{ "bar": "A" }, { "bar": "B" }] })));
}

#[test]
fn test_merge_of_scalars_is_empty_object() {
    let result = run_bracket(
        json!({ "xs": [1, 2] }),
        json!({ "m": ["$.xs", "$", { "merge": true }] }),
    );
    assert_eq!(result, expected(json!({ "m": {} })));
}

#[test]
fn test_nested_selection_is_flattened() {
    let doc = json!({ "matrix": [[1, 2], [3]] });
    let result = run_bracket(doc, json!({ "cells": ["$.matrix[*]", { "v": "$" }] }));
    assert_eq!(
        result,
        expected(json!({ "cells": [{ "v": 1 }, { "v": 2 }, { "v": 3 }] }))
    );
}

#[test]
fn test_singleton_matches_are_iterated() {
    let doc = json!({ "items": [{ "id": 1 }, { "id": 2 }] });
    let result = run(doc, json!({ "ids": ["$.items[*]", { "id": "$.id" }] }));
    assert_eq!(result, expected(json!({ "ids": [{ "id": 1 }, { "id": 2 }] })));
}

#[test]
fn test_scalar_sub_spec_per_item() {
    let doc = json!({ "items": [{ "id": 1 }, {}] });
    let result = run(doc, json!({ "ids": ["$.items", "$.id"] }));
    let ids = result.get("ids").unwrap();
    assert_eq!(ids, &Value::from(vec![expected(json!(1)), Value::Absent]));
    assert_eq!(ids.index(0), Some(&expected(json!(1))));
    assert_eq!(ids.index(1), Some(&Value::Absent));
    assert_eq!(ids.index(2), None);
}

#[test]
fn test_literal_sub_spec_per_item() {
    let result = run(json!({ "xs": [1, 2] }), json!({ "tags": ["$.xs", "seen"] }));
    assert_eq!(result, expected(json!({ "tags": ["seen", "seen"] })));
}

#[test]
fn test_empty_matches_pass_through() {
    let result = run(json!({}), json!({ "xs": ["$.missing", { "a": "$.a" }] }));
    assert_eq!(result, expected(json!({ "xs": [] })));
}

#[test]
fn test_missing_sub_spec_passes_raw_matches() {
    let doc = json!({ "items": [{ "id": 1 }, { "id": 2 }] });
    let result = run(doc.clone(), json!({ "ids": ["$.items[*].id"] }));
    assert_eq!(result, expected(json!({ "ids": [1, 2] })));

    let result = run(doc, json!({ "raw": ["$.items", null] }));
    assert_eq!(result, expected(json!({ "raw": [[{ "id": 1 }, { "id": 2 }]] })));
}

#[test]
fn test_unrecognized_sub_spec_leaves_dense_empty_array() {
    let result = run(json!({ "xs": [1, 2] }), json!({ "ys": ["$.xs", 5] }));
    assert_eq!(result, expected(json!({ "ys": [] })));
}

#[test]
fn test_nested_array_mappings() {
    let doc = json!({
        "orders": [
            { "id": "o1", "lines": [{ "sku": "a" }, { "sku": "b" }] },
            { "id": "o2", "lines": [{ "sku": "c" }] }
        ]
    });
    let spec = json!({
        "orders": ["$.orders", {
            "order": "$.id",
            "skus": ["$.lines", "$.sku"]
        }]
    });
    assert_eq!(
        run(doc, spec),
        expected(json!({
            "orders": [
                { "order": "o1", "skus": ["a", "b"] },
                { "order": "o2", "skus": ["c"] }
            ]
        }))
    );
}

// ========================================================================
// Dynamic keys
// ========================================================================

#[test]
fn test_dynamic_key() {
    let result = run(json!({ "id": "k1", "val": 42 }), json!({ "$.id": "$.val" }));
    assert_eq!(result, expected(json!({ "k1": 42 })));
}

#[test]
fn test_dynamic_key_from_number() {
    let result = run(json!({ "n": 7 }), json!({ "$.n": "seven" }));
    assert_eq!(result, expected(json!({ "7": "seven" })));
}

#[test]
fn test_unmatched_dynamic_key_is_skipped() {
    let result = run(json!({ "a": 1 }), json!({ "$.nope": "x", "a": "$.a" }));
    assert_eq!(result, expected(json!({ "a": 1 })));
}

#[test]
fn test_dynamic_key_inside_array_items() {
    let doc = json!({ "pairs": [{ "k": "x", "v": 1 }, { "k": "y", "v": 2 }] });
    let result = run(doc, json!({ "byKey": ["$.pairs", { "$.k": "$.v" }, { "merge": true }] }));
    assert_eq!(result, expected(json!({ "byKey": { "x": 1, "y": 2 } })));
}

// ========================================================================
// Root handling
// ========================================================================

#[test]
fn test_root_array_wrapping() {
    let result = run(json!([{ "a": 1 }, { "a": 2 }]), json!(["$[*].a"]));
    assert_eq!(result, expected(json!([1, 2])));
}

#[test]
fn test_root_array_queries_address_the_document() {
    // $.a names a field of the root, and the root is an array.
    let result = run(json!([{ "a": 1 }, { "a": 2 }]), json!(["$.a"]));
    assert_eq!(result, expected(json!([])));
}

#[test]
fn test_root_array_with_sub_spec() {
    let result = run(json!([{ "a": 1 }, { "a": 2 }]), json!(["$[*]", { "v": "$.a" }]));
    assert_eq!(result, expected(json!([{ "v": 1 }, { "v": 2 }])));
}

#[test]
fn test_root_array_spec_over_object_document() {
    let result = run(json!({ "items": [1, 2] }), json!(["$.items[*]"]));
    assert_eq!(result, expected(json!([1, 2])));
}

#[test]
fn test_root_array_without_matches() {
    let result = run(json!([]), json!(["$[*]", { "v": "$.a" }]));
    assert_eq!(result, expected(json!([])));
}

#[test]
fn test_object_spec_over_array_document() {
    let result = run_bracket(json!([1, 2]), json!({ "first": "$[0]", "count": ["$[*]"] }));
    assert_eq!(result, expected(json!({ "first": 1, "count": [1, 2] })));
}

#[test]
fn test_unrecognized_root_yields_empty_object() {
    assert_eq!(run(json!({ "a": 1 }), json!(5)), expected(json!({})));
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_malformed_query_propagates() {
    let result = transform(&json!({ "a": 1 }), &json!({ "x": "$.a[" }));
    match result {
        Err(TransformError::Query(e)) => assert_eq!(e.expression, "$.a["),
        other => panic!("expected query error, got {:?}", other),
    }
}

#[test]
fn test_malformed_array_expression_propagates() {
    let result = transform(&json!({}), &json!({ "xs": ["$.a[", { "v": "$" }] }));
    assert!(matches!(result, Err(TransformError::Query(_))));
}

#[test]
fn test_malformed_dynamic_key_propagates() {
    let result = transform(&json!({}), &json!({ "$.a[": "x" }));
    assert!(matches!(result, Err(TransformError::Query(_))));
}

// ========================================================================
// Purity and configuration
// ========================================================================

#[test]
fn test_repeated_transforms_are_equal() {
    let doc = crazy_doc();
    let spec = json!({ "foo": ["$.some.crazy", { "bar": "$.example" }] });
    let first = transform(&doc, &spec).unwrap();
    let second = transform(&doc, &spec).unwrap();
    assert_eq!(first, second);
    assert_eq!(doc, crazy_doc());
}

#[test]
fn test_transformer_is_shareable() {
    fn assert_sync<T: Send + Sync>() {}
    assert_sync::<Transformer>();
}

#[test]
fn test_custom_trigger_keeps_dollar_text_literal() {
    let trigger = Trigger::new(r"^\$").unwrap();
    let spec = Spec::with_trigger(&json!({ "note": "price in $.USD", "a": "$.a" }), &trigger);
    let result = Transformer::new().transform(&json!({ "a": 1 }), &spec).unwrap();
    assert_eq!(result, expected(json!({ "note": "price in $.USD", "a": 1 })));
}

#[test]
fn test_custom_nodes() {
    let spec = Spec::from_node(SpecNode::object([
        ("name", SpecNode::query("$.name")),
        (
            "fields",
            SpecNode::custom(|doc| {
                let count = doc.as_object().map_or(0, |o| o.len());
                Ok(Value::from(json!(count)))
            }),
        ),
    ]));
    let result = Transformer::new()
        .transform(&json!({ "name": "n", "x": 1 }), &spec)
        .unwrap();
    assert_eq!(result, expected(json!({ "name": "n", "fields": 2 })));
}

#[test]
fn test_builders_for_literals_and_raw_arrays() {
    let spec = Spec::from_node(SpecNode::object([
        ("kind", SpecNode::literal("order")),
        ("ids", SpecNode::array("$.items[*].id", None)),
        ("first", SpecNode::array("$.items", Some(SpecNode::query("$.id")))),
    ]));
    let doc = json!({ "items": [{ "id": 1 }, { "id": 2 }] });
    let result = Transformer::new().transform(&doc, &spec).unwrap();
    assert_eq!(result.get("kind").and_then(Value::as_str), Some("order"));
    assert_eq!(
        result,
        expected(json!({ "kind": "order", "ids": [1, 2], "first": [1, 2] }))
    );
}

#[test]
fn test_builder_array_root_is_sequence() {
    let spec = Spec::from_node(SpecNode::array("$[*].a", None));
    assert!(spec.is_sequence_root());
    let result = Transformer::new()
        .transform(&json!([{ "a": 1 }, { "a": 2 }]), &spec)
        .unwrap();
    assert_eq!(result, expected(json!([1, 2])));
}

#[test]
fn test_custom_node_errors_propagate() {
    let spec = Spec::from_node(SpecNode::object([(
        "boom",
        SpecNode::custom(|_| Err(TransformError::Custom("boom".to_string()))),
    )]));
    let result = Transformer::new().transform(&json!({}), &spec);
    assert!(matches!(result, Err(TransformError::Custom(msg)) if msg == "boom"));
}

#[test]
fn test_builders_match_json_specs() {
    let built = Spec::from_node(SpecNode::object([(
        "foo",
        SpecNode::merged(
            "$.some.crazy",
            SpecNode::object([("bar", SpecNode::query("$.example"))]),
        ),
    )]));
    let result = Transformer::new().transform(&crazy_doc(), &built).unwrap();
    assert_eq!(result, expected(json!({ "foo": { "bar": "B" } })));
}

struct WholeDocument;

impl QueryEvaluator for WholeDocument {
    fn evaluate<'a>(
        &self,
        document: &'a JsonValue,
        _expression: &str,
    ) -> Result<Vec<&'a JsonValue>, QueryError> {
        Ok(vec![document])
    }
}

#[test]
fn test_custom_evaluator() {
    let transformer = Transformer::with_evaluator(WholeDocument);
    let spec = Spec::from_json(&json!({ "x": "$.anything", "lit": "text" }));
    let result = transformer.transform(&json!("doc"), &spec).unwrap();
    assert_eq!(result, expected(json!({ "x": "doc", "lit": "text" })));
}
