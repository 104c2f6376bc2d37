use super::engine::{create_string, native_trampoline, CallbackInfo, TemplateCallbacks};
use super::*;
use std::borrow::Cow;
use std::ffi::c_void;

/// Signature of a host function that can be installed into the global scope.
pub type NativeFn = fn(Invocation) -> JsResult<JsValue>;

#[derive(Clone, Debug)]
struct Binding {
    name: Cow<'static, str>,
    func: NativeFn,
}

/// Declares the native functions that exist in a context's global scope before the context is
/// created. Consumed by `JsEngine::with_options`.
#[derive(Clone, Debug, Default)]
pub struct GlobalTemplate {
    bindings: Vec<Binding>,
}

impl GlobalTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to a native function. Binding a name twice replaces the earlier function.
    pub fn function(mut self, name: impl Into<Cow<'static, str>>, func: NativeFn) -> Self {
        let name = name.into();
        match self.bindings.iter_mut().find(|b| b.name == name) {
            Some(binding) => binding.func = func,
            None => self.bindings.push(Binding { name, func }),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    // Every function template points at a boxed `CallbackInfo` through its `v8::External` data.
    // The boxes are returned so the caller can keep them alive alongside the isolate.
    pub(super) fn build<'s>(
        &self,
        engine: &JsEngine,
        scope: &mut v8::HandleScope<'s, ()>,
    ) -> (v8::Local<'s, v8::ObjectTemplate>, TemplateCallbacks) {
        let template = v8::ObjectTemplate::new(scope);
        let mut callbacks = Vec::with_capacity(self.bindings.len());

        for binding in &self.bindings {
            let info = Box::new(CallbackInfo {
                engine: engine.downgrade(),
                func: binding.func,
            });
            let ext = v8::External::new(scope, &*info as *const CallbackInfo as *mut c_void);
            let function = v8::FunctionTemplate::builder(native_trampoline)
                .data(ext.into())
                .build(scope);
            let name = create_string(scope, &binding.name);
            function.set_class_name(name);
            template.set(name.into(), function.into());
            callbacks.push(info);
        }

        (
            template,
            TemplateCallbacks {
                _callbacks: callbacks,
            },
        )
    }
}
