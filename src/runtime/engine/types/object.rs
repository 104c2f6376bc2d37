use crate::runtime::engine::*;
use std::fmt;

/// Reference to a JavaScript object that is neither a function nor a date.
#[derive(Clone)]
pub struct JsObject {
    pub engine: JsEngine,
    pub handle: v8::Global<v8::Object>,
}

impl JsObject {
    /// Reads a named property, running getters. A missing property reads as `undefined`.
    pub fn get<V: FromJsValue>(&self, key: &str) -> JsResult<V> {
        let value = self.engine.try_catch(|scope| {
            let object = v8::Local::new(scope, &self.handle);
            let key = create_key(scope, key);
            let result = object.get(scope, key);
            self.engine.exception(scope)?;
            let result = result.ok_or(JsError::Terminated)?;
            Ok(JsValue::from_v8_value(&self.engine, scope, result))
        })?;
        value.into(&self.engine)
    }
}

fn create_key<'s>(scope: &mut v8::HandleScope<'s>, key: &str) -> v8::Local<'s, v8::Value> {
    v8::String::new(scope, key)
        .expect("property name exceeds maximum length")
        .into()
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<object>")
    }
}
