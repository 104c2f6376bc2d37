use super::{test_engine, test_platform};
use crate::runtime::engine::*;
use std::string::String as StdString;

#[test]
fn eval_origin() {
    let engine = test_engine();
    let result: StdString = engine
        .eval(Script {
            source: "try { MISSING_VAR } catch (e) { e.stack }".to_owned(),
            origin: Some(ScriptOrigin {
                name: "eval_origin".to_owned(),
                line_offset: 123,
                column_offset: 456,
            }),
        })
        .unwrap();
    let result = result.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(
        "ReferenceError: MISSING_VAR is not defined at eval_origin:124:463",
        result
    );
}

#[test]
fn compiled_script_runs_repeatedly() {
    let engine = test_engine();
    let _: () = engine.eval("var counter = 0;").unwrap();
    let script = engine.compile("++counter").unwrap();
    assert_eq!(script.run::<f64>().unwrap(), 1.0);
    assert_eq!(script.run::<f64>().unwrap(), 2.0);
}

#[test]
fn syntax_error() {
    let engine = test_engine();
    match engine.compile("print(") {
        Err(err @ JsError::Value(_)) => {
            assert!(err.message(&engine).starts_with("SyntaxError"));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn uncaught_exception() {
    let engine = test_engine();
    match engine.eval::<_, JsValue>("throw new RangeError('nope')") {
        Err(err @ JsError::Value(_)) => {
            let message = err.message(&engine);
            assert!(message.starts_with("RangeError: nope"), "{}", message);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn completion_value_of_call_expression() {
    let engine = test_engine();
    let value: JsValue = engine.eval("(function() {})()").unwrap();
    assert!(value.is_undefined());
    assert_eq!(value.to_text(&engine).unwrap(), "undefined");
}

#[test]
fn template_globals_exist_before_first_script() {
    fn answer(_: Invocation) -> JsResult<JsValue> {
        Ok(JsValue::Number(42.0))
    }

    let platform = test_platform();
    let engine = JsEngine::with_options(
        &platform,
        EngineOptions {
            globals: GlobalTemplate::new().function("answer", answer),
            ..Default::default()
        },
    );
    let kind: StdString = engine.eval("typeof answer").unwrap();
    assert_eq!(kind, "function");
    let value: f64 = engine.eval("answer()").unwrap();
    assert_eq!(value, 42.0);
}

#[test]
fn template_natives_receive_args() {
    fn describe(inv: Invocation) -> JsResult<JsValue> {
        let kinds: Vec<_> = inv.args.iter().map(|v| v.type_name()).collect();
        Ok(JsValue::String(inv.engine.create_string(&kinds.join(","))))
    }

    let platform = test_platform();
    let engine = JsEngine::with_options(
        &platform,
        EngineOptions {
            globals: GlobalTemplate::new().function("describe", describe),
            ..Default::default()
        },
    );
    let text: StdString = engine.eval("describe(1, 'a', () => 0, null)").unwrap();
    assert_eq!(text, "number,string,function,null");
    let text: StdString = engine.eval("describe()").unwrap();
    assert_eq!(text, "");
}

#[test]
fn template_native_errors_are_thrown() {
    fn fail(_: Invocation) -> JsResult<JsValue> {
        Err(JsError::ExternalError(anyhow::anyhow!("sink closed")))
    }

    fn wants_number(inv: Invocation) -> JsResult<JsValue> {
        let n: f64 = inv.args.get(0).into(&inv.engine)?;
        Ok(JsValue::Number(n * 2.0))
    }

    let platform = test_platform();
    let engine = JsEngine::with_options(
        &platform,
        EngineOptions {
            globals: GlobalTemplate::new()
                .function("fail", fail)
                .function("twice", wants_number),
            ..Default::default()
        },
    );
    let text: StdString = engine
        .eval("try { fail(); 'none' } catch (e) { e.name + ': ' + e.message }")
        .unwrap();
    assert_eq!(text, "Error: sink closed");

    let text: StdString = engine
        .eval("try { twice('x'); 'none' } catch (e) { e.name }")
        .unwrap();
    assert_eq!(text, "TypeError");
    assert_eq!(engine.eval::<_, f64>("twice(21)").unwrap(), 42.0);
}

#[test]
fn separate_engines_are_isolated() {
    let engine_1 = test_engine();
    let engine_2 = test_engine();
    let _: () = engine_1.eval("var shared = 1;").unwrap();
    let kind: StdString = engine_2.eval("typeof shared").unwrap();
    assert_eq!(kind, "undefined");
}
