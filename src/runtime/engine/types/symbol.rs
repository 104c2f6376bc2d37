use crate::runtime::engine::*;
use std::fmt;

/// Reference to a JavaScript symbol. Symbols have no implicit string conversion.
#[derive(Clone)]
pub struct JsSymbol {
    pub engine: JsEngine,
    pub handle: v8::Global<v8::Symbol>,
}

impl fmt::Debug for JsSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<symbol>")
    }
}
