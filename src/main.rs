use anyhow::Result;
use embed_shell::{setup_logging, shell, Output, Platform, ShellConfig};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = ShellConfig::from_args(std::env::args_os());

    if let Err(e) = setup_logging(config.log_level) {
        eprintln!("failed to set up logging: {}", e);
    }
    info!(
        "embed-shell {} (built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP"),
        env!("GIT_DESCRIBE")
    );

    match try_main(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(config: &ShellConfig) -> Result<()> {
    let platform = Platform::init(&config.platform_options())?;
    let result = shell::run(config, &platform, Output::stdout());
    platform.shutdown();
    result
}
