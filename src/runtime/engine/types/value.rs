use crate::runtime::engine::*;
use std::fmt;
use std::string::String as StdString;

/// A JavaScript value as seen from Rust.
///
/// Primitives other than strings and symbols are copied out of V8. Everything else is a handle
/// that keeps its engine alive.
#[derive(Clone)]
pub enum JsValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    /// Milliseconds since the Unix epoch.
    Date(f64),
    String(JsString),
    Symbol(JsSymbol),
    Function(JsFunction),
    /// Any other object, arrays included.
    Object(JsObject),
}

impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    /// The callable handle, if this value can be called.
    pub fn as_function(&self) -> Option<&JsFunction> {
        match self {
            JsValue::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsObject> {
        match self {
            JsValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// A wrapper around `FromJsValue::from_value`.
    pub fn into<T: FromJsValue>(self, engine: &JsEngine) -> JsResult<T> {
        T::from_value(self, engine)
    }

    /// Applies the ECMAScript `ToString` conversion. Fails for symbols and for objects whose
    /// `toString` or `valueOf` throws.
    pub fn coerce_string(&self, engine: &JsEngine) -> JsResult<JsString> {
        if let JsValue::String(string) = self {
            return Ok(string.clone());
        }

        engine.try_catch(|scope| {
            let string = self.to_v8_value(scope).to_string(scope);
            engine.exception(scope)?;
            let string = string.ok_or(JsError::Terminated)?;
            Ok(JsString {
                engine: engine.clone(),
                handle: v8::Global::new(scope, string),
            })
        })
    }

    /// `coerce_string`, copied into Rust.
    pub fn to_text(&self, engine: &JsEngine) -> JsResult<StdString> {
        Ok(self.coerce_string(engine)?.to_rust_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            JsValue::Undefined => "undefined",
            JsValue::Null => "null",
            JsValue::Boolean(_) => "boolean",
            JsValue::Number(_) => "number",
            JsValue::Date(_) => "date",
            JsValue::String(_) => "string",
            JsValue::Symbol(_) => "symbol",
            JsValue::Function(_) => "function",
            JsValue::Object(_) => "object",
        }
    }

    pub fn from_v8_value(
        engine: &JsEngine,
        scope: &mut v8::HandleScope,
        value: v8::Local<v8::Value>,
    ) -> JsValue {
        if value.is_undefined() {
            return JsValue::Undefined;
        }
        if value.is_null() {
            return JsValue::Null;
        }
        if value.is_boolean() {
            return JsValue::Boolean(value.boolean_value(scope));
        }
        if value.is_number() {
            return JsValue::Number(value.number_value(scope).unwrap_or(f64::NAN));
        }
        if let Ok(date) = v8::Local::<v8::Date>::try_from(value) {
            return JsValue::Date(date.value_of());
        }

        let engine = engine.clone();
        if let Ok(handle) = v8::Local::<v8::String>::try_from(value) {
            let handle = v8::Global::new(scope, handle);
            JsValue::String(JsString { engine, handle })
        } else if let Ok(handle) = v8::Local::<v8::Symbol>::try_from(value) {
            let handle = v8::Global::new(scope, handle);
            JsValue::Symbol(JsSymbol { engine, handle })
        } else if let Ok(handle) = v8::Local::<v8::Function>::try_from(value) {
            let handle = v8::Global::new(scope, handle);
            JsValue::Function(JsFunction { engine, handle })
        } else if let Ok(handle) = v8::Local::<v8::Object>::try_from(value) {
            let handle = v8::Global::new(scope, handle);
            JsValue::Object(JsObject { engine, handle })
        } else {
            JsValue::Undefined
        }
    }

    pub fn to_v8_value<'s>(&self, scope: &mut v8::HandleScope<'s>) -> v8::Local<'s, v8::Value> {
        match self {
            JsValue::Undefined => v8::undefined(scope).into(),
            JsValue::Null => v8::null(scope).into(),
            JsValue::Boolean(b) => v8::Boolean::new(scope, *b).into(),
            JsValue::Number(n) => v8::Number::new(scope, *n).into(),
            JsValue::Date(ms) => match v8::Date::new(scope, *ms) {
                Some(date) => date.into(),
                None => v8::undefined(scope).into(),
            },
            JsValue::String(s) => v8::Local::new(scope, &s.handle).into(),
            JsValue::Symbol(s) => v8::Local::new(scope, &s.handle).into(),
            JsValue::Function(f) => v8::Local::new(scope, &f.handle).into(),
            JsValue::Object(o) => v8::Local::new(scope, &o.handle).into(),
        }
    }
}

impl fmt::Debug for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "undefined"),
            JsValue::Null => write!(f, "null"),
            JsValue::Boolean(b) => write!(f, "{:?}", b),
            JsValue::Number(n) => write!(f, "{}", n),
            JsValue::Date(ms) => write!(f, "date:{}", ms),
            JsValue::String(s) => write!(f, "{:?}", s),
            JsValue::Symbol(s) => write!(f, "{:?}", s),
            JsValue::Function(func) => write!(f, "{:?}", func),
            JsValue::Object(o) => write!(f, "{:?}", o),
        }
    }
}

/// Trait for types convertible to `JsValue`.
pub trait ToJsValue {
    fn to_value(self, engine: &JsEngine) -> JsResult<JsValue>;
}

/// Trait for types convertible from `JsValue`.
pub trait FromJsValue: Sized {
    fn from_value(value: JsValue, engine: &JsEngine) -> JsResult<Self>;
}

/// Trait for argument lists passed from Rust into a JavaScript call.
pub trait ToJsValues {
    fn to_values(self, engine: &JsEngine) -> JsResult<JsValues>;
}

/// The arguments of a native call. Reading past the end yields `undefined`, so a missing argument
/// and an explicit `undefined` look the same.
#[derive(Clone, Debug, Default)]
pub struct JsValues(Vec<JsValue>);

impl JsValues {
    pub fn from_vec(values: Vec<JsValue>) -> Self {
        Self(values)
    }

    pub fn get(&self, index: usize) -> JsValue {
        self.0.get(index).cloned().unwrap_or(JsValue::Undefined)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsValue> {
        self.0.iter()
    }
}
