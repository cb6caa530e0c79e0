use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::value::{AstNode, Value};

fn sample_node() -> AstNode {
    AstNode::with_tokens(
        "Pair",
        Value::Record(vec![
            ("key".to_string(), Value::Text("a".to_string())),
            ("value".to_string(), Value::Text("1".to_string())),
        ]),
        vec![Span::new(0, 1), Span::new(1, 2), Span::new(2, 3)],
    )
}

#[test]
fn record_field_lookup() {
    let node = sample_node();
    assert_eq!(node.value.get("key").and_then(Value::as_text), Some("a"));
    assert_eq!(node.value.get("missing"), None);
    assert_eq!(Value::Null.get("key"), None);
}

#[test]
fn accessors_reject_other_shapes() {
    assert!(Value::Null.is_null());
    assert_eq!(Value::Text("x".into()).as_list(), None);
    assert_eq!(Value::List(vec![]).as_text(), None);
    assert_eq!(Value::Null.as_node(), None);

    let node = Value::Node(Box::new(sample_node()));
    assert_eq!(node.as_node().map(|n| n.kind.as_str()), Some("Pair"));
}

#[test]
fn node_serializes_with_type_properties_tokens() {
    let json = serde_json::to_value(sample_node()).unwrap();
    assert_eq!(json["type"], "Pair");
    assert_eq!(json["properties"]["key"], "a");
    assert_eq!(json["tokens"][0], serde_json::json!([0, 1]));
}

#[test]
fn null_and_scalars_serialize_plainly() {
    assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
    assert_eq!(
        serde_json::to_value(Value::Text("hi".into())).unwrap(),
        serde_json::json!("hi")
    );
    assert_eq!(
        serde_json::to_value(Value::Tuple(vec![Value::Null, Value::Text("x".into())])).unwrap(),
        serde_json::json!([null, "x"])
    );
}

#[test]
fn token_values_serialize_kind_and_span() {
    let token = Value::Token(Token::new(TokenKind::new(2), Span::new(4, 6)));
    let json = serde_json::to_value(token).unwrap();
    assert_eq!(json, serde_json::json!({"kind": 2, "span": [4, 6]}));
}

#[test]
fn nodes_compare_structurally() {
    assert_eq!(sample_node(), sample_node());
    let mut other = sample_node();
    other.kind = "Entry".to_string();
    assert_ne!(sample_node(), other);
}
