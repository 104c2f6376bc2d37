use crate::runtime::engine::*;
use std::fmt;

/// Reference to a callable JavaScript value.
#[derive(Clone)]
pub struct JsFunction {
    pub engine: JsEngine,
    pub handle: v8::Global<v8::Function>,
}

impl JsFunction {
    /// Calls the function with an explicit receiver. Exceptions thrown by the function come back
    /// as `JsError::Value`.
    pub fn call_method<T, A, R>(&self, this: T, args: A) -> JsResult<R>
    where
        T: ToJsValue,
        A: ToJsValues,
        R: FromJsValue,
    {
        let this = this.to_value(&self.engine)?;
        let args = args.to_values(&self.engine)?;
        let value = self.engine.try_catch(|scope| {
            let function = v8::Local::new(scope, &self.handle);
            let this = this.to_v8_value(scope);
            let args: Vec<_> = args.iter().map(|arg| arg.to_v8_value(scope)).collect();
            let result = function.call(scope, this, &args);
            self.engine.exception(scope)?;
            let result = result.ok_or(JsError::Terminated)?;
            Ok(JsValue::from_v8_value(&self.engine, scope, result))
        })?;
        value.into(&self.engine)
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<function>")
    }
}

/// A call from script into a native installed by a `GlobalTemplate`.
pub struct Invocation {
    pub engine: JsEngine,
    /// The receiver the script called the native with.
    pub this: JsValue,
    pub args: JsValues,
}
