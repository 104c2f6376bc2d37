use super::*;
use std::string::String as StdString;

impl ToJsValue for JsValue {
    fn to_value(self, _engine: &JsEngine) -> JsResult<JsValue> {
        Ok(self)
    }
}

impl FromJsValue for JsValue {
    fn from_value(value: JsValue, _engine: &JsEngine) -> JsResult<Self> {
        Ok(value)
    }
}

impl FromJsValue for () {
    fn from_value(_value: JsValue, _engine: &JsEngine) -> JsResult<Self> {
        Ok(())
    }
}

// `null` and `undefined` read as `None`.
impl<T: FromJsValue> FromJsValue for Option<T> {
    fn from_value(value: JsValue, engine: &JsEngine) -> JsResult<Self> {
        match value {
            JsValue::Null | JsValue::Undefined => Ok(None),
            value => T::from_value(value, engine).map(Some),
        }
    }
}

impl ToJsValue for f64 {
    fn to_value(self, _engine: &JsEngine) -> JsResult<JsValue> {
        Ok(JsValue::Number(self))
    }
}

// Only numbers convert. Coercing other values is left to script code.
impl FromJsValue for f64 {
    fn from_value(value: JsValue, _engine: &JsEngine) -> JsResult<Self> {
        match value {
            JsValue::Number(n) => Ok(n),
            other => Err(JsError::from_js_conversion(other.type_name(), "f64")),
        }
    }
}

impl<'a> ToJsValue for &'a str {
    fn to_value(self, engine: &JsEngine) -> JsResult<JsValue> {
        Ok(JsValue::String(engine.create_string(self)))
    }
}

impl FromJsValue for StdString {
    fn from_value(value: JsValue, engine: &JsEngine) -> JsResult<Self> {
        value.to_text(engine)
    }
}

impl ToJsValues for () {
    fn to_values(self, _engine: &JsEngine) -> JsResult<JsValues> {
        Ok(JsValues::default())
    }
}

impl<A: ToJsValue> ToJsValues for (A,) {
    fn to_values(self, engine: &JsEngine) -> JsResult<JsValues> {
        Ok(JsValues::from_vec(vec![self.0.to_value(engine)?]))
    }
}
