use crate::runtime::engine::{EngineOptions, JsEngine};
use crate::runtime::platform::{Platform, PlatformOptions};

mod engine;
mod value;

pub(crate) fn test_platform() -> Platform {
    Platform::init(&PlatformOptions::default()).unwrap()
}

pub(crate) fn test_engine() -> JsEngine {
    JsEngine::with_options(&test_platform(), EngineOptions::default())
}
