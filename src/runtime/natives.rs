use super::engine::{GlobalTemplate, Invocation, JsEngine, JsError, JsResult, JsValue, NativeFn};
use log::trace;

/// Number passed to the callback given as the second argument of `print`.
pub const CALLBACK_ARGUMENT: f64 = 520.0;

/// Written by `print` in place of a value that has no string form.
pub const CONVERSION_FAILED: &str = "<string conversion failed>";

/// A host function that is installed into the global scope of every shell context.
pub struct NativeFunction {
    /// The name of the function, as it will appear in JavaScript.
    pub name: &'static str,

    /// The function pointer.
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        Self { name, func }
    }
}

inventory::collect!(NativeFunction);

#[macro_export]
macro_rules! register_native {
    ($name:expr, $func:ident) => {
        inventory::submit! {
            $crate::runtime::natives::NativeFunction::new(
                $name,
                $func
            )
        }
    };
}

/// The global template of the shell: every registered native, ordered by name.
pub fn shell_globals() -> GlobalTemplate {
    let mut natives: Vec<&NativeFunction> = inventory::iter::<NativeFunction>.into_iter().collect();
    natives.sort_by_key(|native| native.name);

    natives
        .into_iter()
        .fold(GlobalTemplate::new(), |template, native| {
            template.function(native.name, native.func)
        })
}

/// The string form of `value`, or `CONVERSION_FAILED` when it has none.
pub fn text_or_placeholder(value: &JsValue, engine: &JsEngine) -> String {
    match value.to_text(engine) {
        Ok(text) => text,
        Err(e) => {
            trace!("print: {} has no string form: {}", value.type_name(), e);
            CONVERSION_FAILED.to_owned()
        }
    }
}

/// `print(value, callback)`: writes `value` without a newline, then calls `callback` with
/// `CALLBACK_ARGUMENT` if it is a function.
fn print(inv: Invocation) -> JsResult<JsValue> {
    let text = text_or_placeholder(&inv.args.get(0), &inv.engine);
    inv.engine
        .output()
        .write_text(&text)
        .map_err(|e| JsError::ExternalError(e.into()))?;

    if let Some(callback) = inv.args.get(1).as_function() {
        let _: JsValue = callback.call_method(JsValue::Null, (CALLBACK_ARGUMENT,))?;
    }

    Ok(JsValue::Undefined)
}

register_native!("print", print);
