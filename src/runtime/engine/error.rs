use super::engine::create_string;
use super::*;
use std::error::Error as StdError;
use std::fmt;
use std::string::String as StdString;

pub type JsResult<T> = Result<T, JsError>;

/// An error raised while driving a `JsEngine`.
#[derive(Debug)]
pub enum JsError {
    /// A JavaScript value did not have the type a Rust caller asked for.
    FromJsConversionError {
        from: &'static str,
        to: &'static str,
    },
    /// Execution was terminated before producing a value.
    Terminated,
    /// A host-side failure inside a native, such as a failed write.
    ExternalError(anyhow::Error),
    /// A value thrown by script code.
    Value(JsValue),
}

impl JsError {
    /// The value thrown back into script when a native fails. Conversion failures become
    /// `TypeError`s and host failures plain `Error`s.
    pub fn to_value(self, engine: &JsEngine) -> JsValue {
        if let JsError::Value(value) = self {
            return value;
        }

        let message = self.to_string();
        let is_type_error = matches!(self, JsError::FromJsConversionError { .. });
        engine.scope(|scope| {
            let message = create_string(scope, &message);
            let exception = if is_type_error {
                v8::Exception::type_error(scope, message)
            } else {
                v8::Exception::error(scope, message)
            };
            JsValue::from_v8_value(engine, scope, exception)
        })
    }

    /// Renders the error for humans, preferring the stack trace of a thrown `Error`.
    pub fn message(&self, engine: &JsEngine) -> StdString {
        let JsError::Value(value) = self else {
            return self.to_string();
        };

        let stack = value
            .as_object()
            .and_then(|object| object.get::<Option<StdString>>("stack").ok().flatten());
        match stack {
            Some(stack) => stack,
            None => value.to_text(engine).unwrap_or_else(|_| self.to_string()),
        }
    }

    pub(crate) fn from_js_conversion(from: &'static str, to: &'static str) -> JsError {
        JsError::FromJsConversionError { from, to }
    }
}

impl StdError for JsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            JsError::ExternalError(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for JsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JsError::FromJsConversionError { from, to } => {
                write!(f, "error converting JavaScript {} to {}", from, to)
            }
            JsError::Terminated => write!(f, "execution terminated"),
            JsError::ExternalError(err) => err.fmt(f),
            JsError::Value(v) => write!(f, "uncaught JavaScript {}", v.type_name()),
        }
    }
}
