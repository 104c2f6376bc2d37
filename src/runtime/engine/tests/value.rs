use super::test_engine;
use crate::runtime::engine::*;
use std::string::String as StdString;

#[test]
fn to_text() {
    let engine = test_engine();
    let cases = [
        ("undefined", "undefined"),
        ("null", "null"),
        ("true", "true"),
        ("123", "123"),
        ("1.5", "1.5"),
        ("'abc'", "abc"),
        ("({})", "[object Object]"),
        ("[1, 2]", "1,2"),
        ("({ toString() { return 'custom'; } })", "custom"),
    ];
    for (source, expected) in cases {
        let value: JsValue = engine.eval(source).unwrap();
        assert_eq!(value.to_text(&engine).unwrap(), expected, "{}", source);
    }
}

#[test]
fn symbols_do_not_coerce_to_string() {
    let engine = test_engine();
    let symbol: JsValue = engine.eval("Symbol('tag')").unwrap();
    match symbol.coerce_string(&engine) {
        Err(JsError::Value(err)) => {
            let name: StdString = err.as_object().unwrap().get("name").unwrap();
            assert_eq!(name, "TypeError");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn throwing_to_string_propagates() {
    let engine = test_engine();
    let value: JsValue = engine
        .eval("({ toString() { throw new Error('boom'); } })")
        .unwrap();
    assert!(matches!(value.to_text(&engine), Err(JsError::Value(_))));
}

#[test]
fn from_v8_value_variants() {
    let engine = test_engine();
    let kinds: Vec<&str> = [
        "undefined",
        "null",
        "true",
        "1",
        "new Date(0)",
        "'s'",
        "Symbol()",
        "(() => 0)",
        "({})",
        "[1, 2]",
    ]
    .iter()
    .map(|source| engine.eval::<_, JsValue>(*source).unwrap().type_name())
    .collect();
    assert_eq!(
        kinds,
        vec![
            "undefined",
            "null",
            "boolean",
            "number",
            "date",
            "string",
            "symbol",
            "function",
            "object",
            "object"
        ]
    );
}

#[test]
fn strict_number_conversion() {
    let engine = test_engine();
    assert_eq!(engine.eval::<_, f64>("6 * 7").unwrap(), 42.0);
    match engine.eval::<_, f64>("'42'") {
        Err(JsError::FromJsConversionError { from, to }) => {
            assert_eq!((from, to), ("string", "f64"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn missing_arguments_are_undefined() {
    let values = JsValues::from_vec(vec![JsValue::Number(1.0)]);
    assert_eq!(values.get(0).type_name(), "number");
    assert!(values.get(1).is_undefined());
    assert_eq!(values.len(), 1);
}
