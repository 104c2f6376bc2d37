use log::{error, LevelFilter, SetLoggerError};
use std::thread;

/// Routes `log` records to stderr and logs panics before the default hook runs.
pub fn setup_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let backtrace = std::backtrace::Backtrace::force_capture();

        let thread = thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");
        let msg = match info.payload().downcast_ref::<&'static str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &**s,
                None => "Box<Any>",
            },
        };

        match info.location() {
            Some(location) => error!(
                "thread '{}' panicked at '{}': {}:{}\nbacktrace:\n{}",
                thread,
                msg,
                location.file(),
                location.line(),
                backtrace
            ),
            None => error!(
                "thread '{}' panicked at '{}'\nbacktrace:\n{}",
                thread, msg, backtrace
            ),
        }
        log::logger().flush();

        default_hook(info);
    }));

    Ok(())
}
