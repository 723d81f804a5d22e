#![warn(missing_docs)]
//! Process-local logging for multi-process daemons.
//!
//! Each process calls [`init`] once. In debug mode every line goes to stderr;
//! otherwise lines go to syslog(3) under the chosen facility. Logging calls
//! never change the caller's `errno`.
//!
//! ```no_run
//! use proclog::{log_debug, log_info, log_warn, log_warnx, Facility};
//!
//! proclog::init(false, Facility::Local0);
//! proclog::procinit(Some("control"));
//! proclog::set_verbose(2);
//!
//! log_info!("listening on {}", "/var/run/iked.sock");
//! log_debug!("{} policies loaded", 4);
//! log_warnx!("listener failed");
//! log_warn!("open {}", "/etc/iked.conf");
//! ```
//!
//! With the `pretty` feature, [`procinit_pretty`] and the `pretty_*!` macros
//! add timestamps, a per-process colored pid and the calling function's name
//! to debug-mode lines.

mod config;
pub mod errno;
mod error;
pub mod format;
pub mod hash;
pub mod local;
#[cfg(feature = "pretty")]
pub mod pretty;
mod priority;
pub mod syslog;

use core::fmt::Arguments;
use std::sync::OnceLock;

pub use config::Config;
pub use error::Error;
pub use format::Arg;
pub use local::{Logger, LoggerBuilder};
pub use priority::Priority;
pub use syslog::{Facility, Syslog, SystemLog};

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger. Created with defaults (stderr console, libc
/// syslog) unless [`set_logger`] ran first.
#[inline]
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::default)
}

/// Install the process-wide logger. Only the first call wins.
///
/// # Errors
/// Gives `lg` back if a logger was already installed or used.
pub fn set_logger(lg: Logger) -> Result<(), Logger> {
    LOGGER.set(lg)
}

/// Select debug (stderr) or syslog mode for the rest of the process.
pub fn init(debug: bool, facility: Facility) {
    logger().init(debug, facility);
}

/// [`init`] from a [`Config`].
pub fn init_with(config: &Config) {
    logger().init_with(config);
}

/// Set the process name. `None` is ignored; the last call wins.
pub fn procinit(name: Option<&str>) {
    logger().procinit(name);
}

/// Set the verbosity level
pub fn set_verbose(v: i32) {
    logger().set_verbose(v);
}

/// Current verbosity level
#[must_use]
pub fn verbose() -> i32 {
    logger().verbose()
}

/// Log at an explicit priority.
pub fn logit(pri: Priority, args: Arguments) {
    logger().logit(pri, args);
}

/// Error with the current errno description appended.
pub fn warn(msg: Option<Arguments>) {
    logger().warn(msg);
}

/// Error without errno description.
pub fn warnx(args: Arguments) {
    logger().warnx(args);
}

/// Informational message.
pub fn info(args: Arguments) {
    logger().info(args);
}

/// Debug message (verbosity above 1).
pub fn debug(args: Arguments) {
    logger().debug(args);
}

/// Log with errno description and exit with status 1.
pub fn fatal(msg: Option<Arguments>) -> ! {
    logger().fatal(msg)
}

/// Log and exit with status 1.
pub fn fatalx(msg: Option<Arguments>) -> ! {
    logger().fatalx(msg)
}

/// Register as one of the pretty-mode roles; an unknown role is fatal.
#[cfg(feature = "pretty")]
pub fn procinit_pretty(name: &str) -> pretty::Role {
    logger().procinit_pretty(name)
}

/// Short name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __f() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = __type_name_of(__f);
        let name = name.strip_suffix("::__f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(i) => &name[i + 2..],
            None => name,
        }
    }};
}

/// Log at a priority
#[macro_export]
macro_rules! logit { ($pri:expr, $($t:tt)+) => { $crate::logit($pri, format_args!($($t)+)) } }
/// Error with errno description; `log_warn!()` logs the description alone
#[macro_export]
macro_rules! log_warn {
    () => { $crate::warn(None) };
    ($($t:tt)+) => { $crate::warn(Some(format_args!($($t)+))) };
}
/// Error
#[macro_export]
macro_rules! log_warnx { ($($t:tt)+) => { $crate::warnx(format_args!($($t)+)) } }
/// Informational
#[macro_export]
macro_rules! log_info { ($($t:tt)+) => { $crate::info(format_args!($($t)+)) } }
/// Debug; arguments are not evaluated below verbosity 2
#[macro_export]
macro_rules! log_debug {
    ($($t:tt)+) => {{
        if $crate::logger().debug_enabled() { $crate::debug(format_args!($($t)+)); }
    }};
}
/// Log with errno description and exit(1)
#[macro_export]
macro_rules! fatal {
    () => { $crate::fatal(None) };
    ($($t:tt)+) => { $crate::fatal(Some(format_args!($($t)+))) };
}
/// Log and exit(1)
#[macro_export]
macro_rules! fatalx {
    () => { $crate::fatalx(None) };
    ($($t:tt)+) => { $crate::fatalx(Some(format_args!($($t)+))) };
}

#[cfg(feature = "pretty")]
#[doc(hidden)]
#[macro_export]
macro_rules! __proclog_pretty {
    ($kind:ident, subject = $s:expr; $($t:tt)+) => {
        $crate::logger().pretty(
            $crate::pretty::Kind::$kind,
            $crate::function_name!(),
            Some($s),
            format_args!($($t)+),
        )
    };
    ($kind:ident, $($t:tt)+) => {
        $crate::logger().pretty($crate::pretty::Kind::$kind, $crate::function_name!(), None, format_args!($($t)+))
    };
}
/// Pretty error with errno description
#[cfg(feature = "pretty")]
#[macro_export]
macro_rules! pretty_warn { ($($t:tt)+) => { $crate::__proclog_pretty!(Warn, $($t)+) } }
/// Pretty error
#[cfg(feature = "pretty")]
#[macro_export]
macro_rules! pretty_warnx { ($($t:tt)+) => { $crate::__proclog_pretty!(Warnx, $($t)+) } }
/// Pretty informational line
#[cfg(feature = "pretty")]
#[macro_export]
macro_rules! pretty_info { ($($t:tt)+) => { $crate::__proclog_pretty!(Info, $($t)+) } }
/// Pretty debug line; arguments are not evaluated below verbosity 2
#[cfg(feature = "pretty")]
#[macro_export]
macro_rules! pretty_debug {
    ($($t:tt)+) => {{
        if $crate::logger().debug_enabled() { $crate::__proclog_pretty!(Debug, $($t)+); }
    }};
}
