pub mod logging;
pub mod runtime;
pub mod shell;

pub use logging::setup_logging;
pub use runtime::engine::{JsEngine, JsError, JsResult, JsValue};
pub use runtime::output::Output;
pub use runtime::platform::{Platform, PlatformOptions};
pub use shell::ShellConfig;
