use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

/// Name of the ICU locale data file looked up next to the executable.
pub const ICU_DATA_FILE: &str = "icudtl.dat";

static INIT: OnceLock<(PlatformOptions, std::result::Result<(), String>)> = OnceLock::new();
static DISPOSED: AtomicBool = AtomicBool::new(false);

/// Options for `Platform::init`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlatformOptions {
    /// Optional ICU locale data file. A path that does not exist is skipped and the engine's
    /// built-in data is used instead.
    pub icu_data: Option<PathBuf>,
}

impl PlatformOptions {
    /// Looks for `icudtl.dat` in the directory containing `exec_path`.
    pub fn for_executable(exec_path: Option<&Path>) -> Self {
        let icu_data = exec_path.map(|path| match path.parent() {
            Some(dir) => dir.join(ICU_DATA_FILE),
            None => PathBuf::from(ICU_DATA_FILE),
        });
        Self { icu_data }
    }
}

/// Handle to the process-wide V8 state.
///
/// V8 can only be initialized once per process. Every `init` after the first returns another
/// handle to the same state, or the error of the first attempt.
#[derive(Debug)]
pub struct Platform {
    _not_send: PhantomData<*const ()>,
}

impl Platform {
    /// Initializes V8 on first use.
    ///
    /// Only the first call's options take effect. Later calls with different options are logged
    /// and otherwise ignored, since V8 cannot be initialized twice.
    pub fn init(options: &PlatformOptions) -> Result<Self> {
        if DISPOSED.load(Ordering::SeqCst) {
            bail!("the V8 platform has already been shut down");
        }

        let (applied, outcome) = INIT.get_or_init(|| {
            let outcome = init_v8(options).map_err(|e| format!("{:#}", e));
            (options.clone(), outcome)
        });
        if applied != options {
            debug!(
                "V8 already initialized with {:?}, ignoring {:?}",
                applied, options
            );
        }

        outcome
            .clone()
            .map_err(|e| anyhow!(e))
            .context("failed to initialize the V8 platform")?;

        Ok(Self {
            _not_send: PhantomData,
        })
    }

    /// Disposes V8. No `JsEngine` may be alive, and V8 cannot be initialized again afterwards.
    pub fn shutdown(self) {
        if DISPOSED.swap(true, Ordering::SeqCst) {
            return;
        }

        unsafe {
            v8::V8::dispose();
        }
        v8::V8::dispose_platform();
        debug!("V8 platform disposed");
    }
}

fn init_v8(options: &PlatformOptions) -> Result<()> {
    if let Some(path) = &options.icu_data {
        load_icu_data(path)?;
    }

    let platform = v8::new_default_platform(0, false).make_shared();
    v8::V8::initialize_platform(platform);
    v8::V8::initialize();

    info!("initialized V8 {}", v8::V8::get_version());
    Ok(())
}

fn load_icu_data(path: &Path) -> Result<()> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("no ICU data at {}, using built-in data", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read ICU data {}", path.display()))
        }
    };

    // ICU keeps a pointer to the data for the rest of the process.
    let data: &'static [u8] = Box::leak(data.into_boxed_slice());
    v8::icu::set_common_data_72(data)
        .map_err(|code| anyhow!("ICU rejected {} (error {})", path.display(), code))?;

    info!("loaded ICU data from {}", path.display());
    Ok(())
}
