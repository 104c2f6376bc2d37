use crate::runtime::engine::*;
use std::fmt;
use std::string::String as StdString;

/// An immutable JavaScript string managed by V8.
#[derive(Clone)]
pub struct JsString {
    pub engine: JsEngine,
    pub handle: v8::Global<v8::String>,
}

impl JsString {
    /// Copies the string into Rust, replacing unpaired surrogates.
    pub fn to_rust_string(&self) -> StdString {
        self.engine.scope(|scope| {
            let string = v8::Local::new(scope, &self.handle);
            string.to_rust_string_lossy(scope)
        })
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.to_rust_string())
    }
}
