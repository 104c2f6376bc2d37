// isolate/scope handling derived from MiniV8: mini_v8.rs
use super::*;
use crate::runtime::output::Output;
use crate::runtime::platform::Platform;
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::string::String as StdString;

/// Options used when creating a `JsEngine`.
#[derive(Clone, Debug, Default)]
pub struct EngineOptions {
    /// Native functions installed into the global scope before the context is created.
    pub globals: GlobalTemplate,

    /// Where natives such as `print` write their text.
    pub output: Output,
}

/// A single V8 isolate together with its one global context.
///
/// Handles are cheap to clone and not thread-safe. The isolate is released when the last handle,
/// including the ones held by values created from it, is dropped.
#[derive(Clone)]
pub struct JsEngine {
    stack: ScopeStack,
}

impl JsEngine {
    pub fn with_options(_platform: &Platform, options: EngineOptions) -> Self {
        let mut isolate = v8::Isolate::new(Default::default());
        isolate.set_slot(options.output);

        let engine = Self {
            stack: ScopeStack::new(isolate),
        };
        engine.init_context(&options.globals);
        engine
    }

    /// Returns the text sink this engine's natives write to.
    pub fn output(&self) -> Output {
        self.stack
            .top(|frame| frame.slot::<Output>().cloned())
            .unwrap_or_else(Output::stdout)
    }

    /// Compiles a script in the global context without running it.
    pub fn compile<S: Into<Script>>(&self, script: S) -> JsResult<CompiledScript> {
        let script = script.into();
        self.try_catch(|scope| {
            let source = create_string(scope, &script.source);
            let origin = script.origin.as_ref().map(|origin| origin.to_v8(scope));
            let compiled = v8::Script::compile(scope, source, origin.as_ref());
            self.exception(scope)?;
            let compiled = compiled.ok_or(JsError::Terminated)?;
            Ok(CompiledScript {
                engine: self.clone(),
                handle: v8::Global::new(scope, compiled),
            })
        })
    }

    /// Compiles and runs a script, converting its completion value.
    pub fn eval<S, R>(&self, script: S) -> JsResult<R>
    where
        S: Into<Script>,
        R: FromJsValue,
    {
        self.compile(script)?.run()
    }

    /// Creates a string managed by V8.
    pub fn create_string(&self, value: &str) -> JsString {
        self.scope(|scope| {
            let string = create_string(scope, value);
            JsString {
                engine: self.clone(),
                handle: v8::Global::new(scope, string),
            }
        })
    }

    // Opens a handle scope in the global context. Only callbacks may nest scopes.
    pub fn scope<F, T>(&self, func: F) -> T
    where
        F: FnOnce(&mut v8::ContextScope<v8::HandleScope>) -> T,
    {
        self.stack.top(|frame| frame.scope(func))
    }

    // Opens a try-catch scope in the global context. Only callbacks may nest scopes.
    pub fn try_catch<F, T>(&self, func: F) -> T
    where
        F: FnOnce(&mut v8::TryCatch<v8::HandleScope>) -> T,
    {
        self.scope(|scope| func(&mut v8::TryCatch::new(scope)))
    }

    /// Turns a caught exception or a termination into an error.
    pub fn exception(&self, scope: &mut v8::TryCatch<v8::HandleScope>) -> JsResult<()> {
        if scope.has_terminated() {
            return Err(JsError::Terminated);
        }

        match scope.exception() {
            Some(exception) => Err(JsError::Value(JsValue::from_v8_value(
                self, scope, exception,
            ))),
            None => Ok(()),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakEngine {
        WeakEngine(Rc::downgrade(&self.stack.0))
    }

    // Runs once, before any scope is entered.
    fn init_context(&self, globals: &GlobalTemplate) {
        self.stack.top(|frame| {
            let isolate = match frame {
                Frame::Isolate(isolate) => isolate,
                Frame::Callback(_) => unreachable!("context initialized from inside a callback"),
            };

            let scope = &mut v8::HandleScope::new(isolate);
            let (template, callbacks) = globals.build(self, scope);
            let context = v8::Context::new_from_template(scope, template);
            let context = v8::Global::new(scope, context);
            scope.set_slot(GlobalContext(context));
            scope.set_slot(callbacks);
        });

        debug!(
            "created context with native globals {:?}",
            globals.names().collect::<Vec<_>>()
        );
    }
}

/// Held by native callbacks so that the isolate does not keep itself alive.
#[derive(Clone)]
pub(crate) struct WeakEngine(Weak<RefCell<Vec<Rc<RefCell<Frame>>>>>);

impl WeakEngine {
    pub(crate) fn upgrade(&self) -> Option<JsEngine> {
        self.0.upgrade().map(|stack| JsEngine {
            stack: ScopeStack(stack),
        })
    }
}

/// A compiled script bound to the global context of the engine that compiled it.
#[derive(Clone)]
pub struct CompiledScript {
    engine: JsEngine,
    handle: v8::Global<v8::Script>,
}

impl CompiledScript {
    /// Runs the script and converts its completion value. A script can be run any number of
    /// times.
    pub fn run<R: FromJsValue>(&self) -> JsResult<R> {
        let value = self.engine.try_catch(|scope| {
            let script = v8::Local::new(scope, &self.handle);
            let result = script.run(scope);
            self.engine.exception(scope)?;
            let result = result.ok_or(JsError::Terminated)?;
            Ok(JsValue::from_v8_value(&self.engine, scope, result))
        })?;
        value.into(&self.engine)
    }
}

// The bottom frame owns the isolate. Every native call pushes the handle scope V8 hands it and
// pops it on return, so nested engine calls run inside the innermost scope.
#[derive(Clone)]
struct ScopeStack(Rc<RefCell<Vec<Rc<RefCell<Frame>>>>>);

impl ScopeStack {
    fn new(isolate: v8::OwnedIsolate) -> Self {
        Self(Rc::new(RefCell::new(vec![Rc::new(RefCell::new(
            Frame::Isolate(isolate),
        ))])))
    }

    fn push(&self, scope: *mut v8::HandleScope<'static>) {
        self.0
            .borrow_mut()
            .push(Rc::new(RefCell::new(Frame::Callback(scope))));
    }

    fn pop(&self) {
        self.0.borrow_mut().pop();
    }

    fn top<F, T>(&self, func: F) -> T
    where
        F: FnOnce(&mut Frame) -> T,
    {
        let top = self.0.borrow().last().cloned();
        let top = top.expect("engine scope stack is empty");
        let mut frame = top.borrow_mut();
        func(&mut frame)
    }
}

enum Frame {
    Isolate(v8::OwnedIsolate),
    Callback(*mut v8::HandleScope<'static>),
}

impl Frame {
    fn scope<F, T>(&mut self, func: F) -> T
    where
        F: FnOnce(&mut v8::ContextScope<v8::HandleScope>) -> T,
    {
        match self {
            Frame::Isolate(isolate) => {
                let context = isolate
                    .get_slot::<GlobalContext>()
                    .expect("isolate has no global context")
                    .0
                    .clone();
                let scope = &mut v8::HandleScope::new(isolate);
                let context = v8::Local::new(scope, context);
                let result = func(&mut v8::ContextScope::new(scope, context));
                result
            }
            Frame::Callback(ptr) => {
                let scope: &mut v8::HandleScope = unsafe { &mut **ptr };
                let context = scope.get_current_context();
                func(&mut v8::ContextScope::new(scope, context))
            }
        }
    }

    fn slot<T: 'static>(&self) -> Option<&T> {
        match self {
            Frame::Isolate(isolate) => isolate.get_slot::<T>(),
            Frame::Callback(ptr) => unsafe { &**ptr }.get_slot::<T>(),
        }
    }
}

struct GlobalContext(v8::Global<v8::Context>);

pub(super) fn create_string<'s>(
    scope: &mut v8::HandleScope<'s, ()>,
    value: &str,
) -> v8::Local<'s, v8::String> {
    v8::String::new(scope, value).expect("string exceeds maximum length")
}

/// The Rust side of a template function, reached through the function's `v8::External` data.
pub(super) struct CallbackInfo {
    pub(super) engine: WeakEngine,
    pub(super) func: NativeFn,
}

/// Owns the `CallbackInfo`s of template functions for as long as the isolate lives.
pub(super) struct TemplateCallbacks {
    pub(super) _callbacks: Vec<Box<CallbackInfo>>,
}

pub(super) fn native_trampoline(
    scope: &mut v8::HandleScope,
    args: v8::FunctionCallbackArguments,
    mut rv: v8::ReturnValue,
) {
    let info = match v8::Local::<v8::External>::try_from(args.data()) {
        Ok(ext) => unsafe { &*(ext.value() as *const CallbackInfo) },
        Err(_) => return,
    };
    let Some(engine) = info.engine.upgrade() else {
        return;
    };

    // The scope only lives on the stack for the duration of this call.
    let ptr: *mut v8::HandleScope<'static> =
        unsafe { std::mem::transmute(scope as *mut v8::HandleScope) };
    engine.stack.push(ptr);

    let this = JsValue::from_v8_value(&engine, scope, args.this().into());
    let values = (0..args.length())
        .map(|i| JsValue::from_v8_value(&engine, scope, args.get(i)))
        .collect();
    let result = (info.func)(Invocation {
        engine: engine.clone(),
        this,
        args: JsValues::from_vec(values),
    });

    match result {
        Ok(value) => rv.set(value.to_v8_value(scope)),
        Err(err) => {
            let exception = err.to_value(&engine).to_v8_value(scope);
            scope.throw_exception(exception);
        }
    }
    engine.stack.pop();
}

/// A JavaScript script.
#[derive(Clone, Debug, Default)]
pub struct Script {
    /// The source of the script.
    pub source: StdString,
    /// The script's origin.
    pub origin: Option<ScriptOrigin>,
}

/// Where a script comes from, as reported in stack traces.
#[derive(Clone, Debug, Default)]
pub struct ScriptOrigin {
    /// The resource name, usually a file name.
    pub name: StdString,
    /// The line at which this script starts.
    pub line_offset: i32,
    /// The column at which this script starts.
    pub column_offset: i32,
}

impl ScriptOrigin {
    fn to_v8<'s>(&self, scope: &mut v8::HandleScope<'s>) -> v8::ScriptOrigin<'s> {
        let name = create_string(scope, &self.name).into();
        let source_map_url = create_string(scope, "").into();
        v8::ScriptOrigin::new(
            scope,
            name,
            self.line_offset,
            self.column_offset,
            false,
            0,
            source_map_url,
            true,
            false,
            false,
        )
    }
}

impl From<StdString> for Script {
    fn from(source: StdString) -> Script {
        Script {
            source,
            origin: None,
        }
    }
}

impl<'a> From<&'a str> for Script {
    fn from(source: &'a str) -> Script {
        Script::from(source.to_owned())
    }
}
