use crate::runtime::engine::{EngineOptions, JsEngine, JsError, JsValue, Script, ScriptOrigin};
use crate::runtime::natives::{shell_globals, text_or_placeholder};
use crate::runtime::output::Output;
use crate::runtime::platform::{Platform, PlatformOptions};
use anyhow::{anyhow, Context, Result};
use log::{debug, LevelFilter};
use std::ffi::OsString;
use std::path::PathBuf;

/// The script run by the shell.
pub const SHELL_SOURCE: &str = "print(1, (param)=> {print(param)});";

/// Resource name reported for `SHELL_SOURCE` in stack traces.
pub const SHELL_ORIGIN: &str = "shell.js";

#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Path the executable was started from (argv[0]). Locates the ICU data file.
    pub exec_path: Option<PathBuf>,
    pub source: String,
    pub origin: String,
    pub log_level: LevelFilter,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            exec_path: None,
            source: SHELL_SOURCE.to_owned(),
            origin: SHELL_ORIGIN.to_owned(),
            log_level: LevelFilter::Warn,
        }
    }
}

impl ShellConfig {
    /// Builds the configuration from the process arguments. Only argv[0] is used.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        Self {
            exec_path: args.next().map(PathBuf::from),
            ..Default::default()
        }
    }

    pub fn platform_options(&self) -> PlatformOptions {
        PlatformOptions::for_executable(self.exec_path.as_deref())
    }
}

/// Runs the configured script in a fresh engine and writes its result to `output` on its own
/// line.
pub fn run(config: &ShellConfig, platform: &Platform, output: Output) -> Result<()> {
    let engine = JsEngine::with_options(
        platform,
        EngineOptions {
            globals: shell_globals(),
            output: output.clone(),
        },
    );
    let script = Script {
        source: config.source.clone(),
        origin: Some(ScriptOrigin {
            name: config.origin.clone(),
            ..Default::default()
        }),
    };

    let compiled = engine
        .compile(script)
        .map_err(|e| script_error(&engine, e))
        .with_context(|| format!("failed to compile {}", config.origin))?;
    debug!("compiled {}", config.origin);

    let result: JsValue = compiled
        .run()
        .map_err(|e| script_error(&engine, e))
        .with_context(|| format!("failed to run {}", config.origin))?;
    let text = text_or_placeholder(&result, &engine);

    output
        .finish_line()
        .and_then(|_| output.write_line(&text))
        .and_then(|_| output.flush())
        .context("failed to write the script result")?;
    Ok(())
}

// Script errors hold engine handles, so only their rendering leaves the engine.
fn script_error(engine: &JsEngine, err: JsError) -> anyhow::Error {
    anyhow!(err.message(engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::engine::tests::test_platform;

    fn run_source(source: &str) -> (Result<()>, String) {
        let config = ShellConfig {
            source: source.to_owned(),
            ..Default::default()
        };
        let (output, buffer) = Output::buffer();
        let result = run(&config, &test_platform(), output);
        (result, buffer.contents())
    }

    #[test]
    fn shell_prints_values_then_result() {
        let (result, out) = run_source(SHELL_SOURCE);
        result.unwrap();
        assert_eq!(out, "1520\nundefined\n");
    }

    #[test]
    fn result_without_prints() {
        let (result, out) = run_source("6 * 7");
        result.unwrap();
        assert_eq!(out, "42\n");
    }

    #[test]
    fn uncaught_exception_fails_run() {
        let (result, out) = run_source("print('partial'); throw new Error('boom')");
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Error: boom"));
        assert!(err.to_string().contains(SHELL_ORIGIN));
        assert_eq!(out, "partial");
    }

    #[test]
    fn syntax_error_fails_compile() {
        let (result, out) = run_source("print(");
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.starts_with("failed to compile"));
        assert!(err.contains("SyntaxError"));
        assert_eq!(out, "");
    }

    #[test]
    fn from_args_uses_argv0_only() {
        let config = ShellConfig::from_args(["/usr/local/bin/embed-shell", "--ignored", "x.js"]);
        assert_eq!(
            config.exec_path,
            Some(PathBuf::from("/usr/local/bin/embed-shell"))
        );
        assert_eq!(config.source, SHELL_SOURCE);
        assert_eq!(config.origin, SHELL_ORIGIN);
        assert_eq!(
            config.platform_options().icu_data,
            Some(PathBuf::from("/usr/local/bin/icudtl.dat"))
        );

        let empty = ShellConfig::from_args(Vec::<OsString>::new());
        assert!(empty.exec_path.is_none());
        assert!(empty.platform_options().icu_data.is_none());
    }
}
