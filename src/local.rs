use core::fmt::{Arguments, Write as _};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};

use crate::errno::{self, DescribeBuf};
use crate::format::{self, Arg, LineBuf};
use crate::syslog::{Syslog, SystemLog};
use crate::{Config, Facility, Priority};

/// Default byte budget for one rendered line.
pub const DEFAULT_LINE_LIMIT: usize = 8192;
/// Size of the stack buffer used when a line cannot be rendered on the heap,
/// and by the fatal path.
pub const FALLBACK_LINE: usize = 1024;

/// A logging context: process identity, verbosity, mode and sinks.
///
/// Debug mode sends every line to the console sink (stderr unless replaced);
/// otherwise lines go to the system log. Every public method leaves the
/// caller's `errno` as it found it.
pub struct Logger {
    debug: AtomicBool,
    verbose: AtomicI32,
    line_limit: AtomicUsize,
    procname: StdMutex<String>,
    sink: StdMutex<Sink>,
    #[cfg(feature = "pretty")]
    pretty: StdMutex<Option<crate::pretty::Tag>>,
}

struct Sink {
    console: Box<dyn Write + Send>,
    syslog: Box<dyn Syslog>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            debug: AtomicBool::new(false),
            verbose: AtomicI32::new(0),
            line_limit: AtomicUsize::new(DEFAULT_LINE_LIMIT),
            procname: StdMutex::new(String::new()),
            sink: StdMutex::new(Sink {
                console: Box::new(io::stderr()),
                syslog: Box::new(SystemLog::new()),
            }),
            #[cfg(feature = "pretty")]
            pretty: StdMutex::new(None),
        }
    }
}

/// Short name of the running program (`argv[0]` without directories).
fn progname() -> String {
    std::env::args_os()
        .next()
        .map(std::path::PathBuf::from)
        .or_else(|| std::env::current_exe().ok())
        .and_then(|p| p.file_name().map(|s| s.to_string_lossy().into_owned()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}

impl Logger {
    #[inline]
    #[must_use]
    /// Create a new `LoggerBuilder`
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    fn sink(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn name(&self) -> MutexGuard<'_, String> {
        self.procname.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(feature = "pretty")]
    pub(crate) fn pretty_state(&self) -> MutexGuard<'_, Option<crate::pretty::Tag>> {
        self.pretty.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Verbosity gate =====

    /// Pick the sink for the rest of the process and register the program
    /// name. Debug mode starts at verbosity 1; otherwise verbosity is 0 and
    /// the system log is opened under `facility`.
    pub fn init(&self, debug: bool, facility: Facility) {
        let _e = errno::Guard::save();
        self.debug.store(debug, Ordering::Relaxed);
        self.verbose.store(i32::from(debug), Ordering::Relaxed);
        let name = progname();
        self.procinit(Some(&name));
        if !debug {
            self.sink().syslog.open(&name, facility);
        }
    }

    /// [`init`](Self::init) from a [`Config`], then apply its verbosity.
    pub fn init_with(&self, config: &Config) {
        self.init(config.debug, config.facility);
        if let Some(v) = config.verbose {
            self.set_verbose(v);
        }
    }

    /// Set the process name used as the fatal-line prefix. `None` is ignored.
    pub fn procinit(&self, name: Option<&str>) {
        if let Some(name) = name {
            let mut cur = self.name();
            cur.clear();
            cur.push_str(name);
        }
    }

    /// Registered process name.
    #[must_use]
    pub fn procname(&self) -> String {
        self.name().clone()
    }

    #[inline]
    /// Set the verbosity level
    pub fn set_verbose(&self, v: i32) {
        self.verbose.store(v, Ordering::Relaxed);
    }

    #[inline]
    #[must_use]
    /// Current verbosity level
    pub fn verbose(&self) -> i32 {
        self.verbose.load(Ordering::Relaxed)
    }

    #[inline]
    #[must_use]
    /// `true` when lines go to the console instead of the system log
    pub fn debug_mode(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    #[inline]
    #[must_use]
    /// `true` when debug-priority messages are emitted (verbosity above 1)
    pub fn debug_enabled(&self) -> bool {
        self.verbose() > 1
    }

    #[inline]
    /// Set the byte budget for one rendered line
    pub fn set_line_limit(&self, limit: usize) {
        self.line_limit.store(limit, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn line_limit(&self) -> usize {
        self.line_limit.load(Ordering::Relaxed)
    }

    // ===== Router =====

    /// Send one message to the active sink.
    ///
    /// No errno guard here; public callers hold one.
    pub(crate) fn route(&self, pri: Priority, args: Arguments) {
        let limit = self.line_limit();
        if self.debug_mode() {
            let line = format::render(format_args!("{args}\n"), limit);
            let mut sink = self.sink();
            let w = &mut sink.console;
            match line {
                Ok(line) => {
                    let _ = w.write_all(line.as_bytes());
                }
                Err(_) => {
                    // streamed straight to the sink, no intermediate buffer
                    let _ = w.write_fmt(args);
                    let _ = w.write_all(b"\n");
                }
            }
            let _ = w.flush();
        } else {
            match format::render(args, limit) {
                Ok(msg) => self.sink().syslog.send(pri, &msg),
                Err(_) => {
                    let mut buf = LineBuf::<FALLBACK_LINE>::new();
                    let _ = buf.write_fmt(args);
                    self.sink().syslog.send(pri, buf.as_str());
                }
            }
        }
    }

    /// Log at an explicit priority.
    pub fn logit(&self, pri: Priority, args: Arguments) {
        let _e = errno::Guard::save();
        self.route(pri, args);
    }

    /// Log a printf-style format. If `fmt` does not match `args`, or its
    /// output would not fit the line budget, the raw format string is logged
    /// instead.
    pub fn logit_printf(&self, pri: Priority, fmt: &str, args: &[Arg]) {
        let _e = errno::Guard::save();
        match format::printf(fmt, args, self.line_limit()) {
            Ok(msg) => self.route(pri, format_args!("{msg}")),
            Err(_) => self.route(pri, format_args!("{fmt}")),
        }
    }

    /// Error with the description of the current `errno` appended.
    ///
    /// `None` logs the description alone.
    pub fn warn(&self, msg: Option<Arguments>) {
        let e = errno::Guard::save();
        let mut ebuf: DescribeBuf = [0; 128];
        let estr = errno::describe(e.saved(), &mut ebuf);
        let Some(msg) = msg else {
            self.route(Priority::Error, format_args!("{estr}"));
            return;
        };
        let limit = self.line_limit();
        match format::render(format_args!("{msg}: {estr}"), limit) {
            Ok(line) => self.route(Priority::Error, format_args!("{line}")),
            Err(_) => {
                self.route(Priority::Error, msg);
                self.route(Priority::Error, format_args!("{estr}"));
            }
        }
    }

    /// Error without the errno description.
    pub fn warnx(&self, args: Arguments) {
        let _e = errno::Guard::save();
        self.route(Priority::Error, args);
    }

    /// Informational message, emitted at any verbosity.
    pub fn info(&self, args: Arguments) {
        let _e = errno::Guard::save();
        self.route(Priority::Info, args);
    }

    /// Debug message, emitted only above verbosity 1.
    pub fn debug(&self, args: Arguments) {
        if self.debug_enabled() {
            let _e = errno::Guard::save();
            self.route(Priority::Debug, args);
        }
    }

    // ===== Fatal path =====

    /// The line [`fatal`](Self::fatal) would log: the non-empty parts of
    /// process name, message and the description of `code` (when non-zero),
    /// joined by `": "`.
    #[must_use]
    pub fn fatal_line(&self, code: i32, msg: Option<Arguments>) -> LineBuf<FALLBACK_LINE> {
        let _e = errno::Guard::save();
        let mut body = LineBuf::<FALLBACK_LINE>::new();
        if let Some(msg) = msg {
            let _ = body.write_fmt(msg);
        }
        let mut ebuf: DescribeBuf = [0; 128];
        let estr = if code == 0 {
            ""
        } else {
            errno::describe(code, &mut ebuf)
        };

        let name = self.name();
        let mut line = LineBuf::<FALLBACK_LINE>::new();
        let mut sep = "";
        for part in [name.as_str(), body.as_str(), estr] {
            if part.is_empty() {
                continue;
            }
            let _ = write!(line, "{sep}{part}");
            sep = ": ";
        }
        line
    }

    fn die(&self, code: i32, msg: Option<Arguments>) -> ! {
        let line = self.fatal_line(code, msg);
        self.route(Priority::Critical, format_args!("{line}"));
        std::process::exit(1)
    }

    /// Log at critical priority with the current errno description and exit
    /// with status 1.
    pub fn fatal(&self, msg: Option<Arguments>) -> ! {
        let code = errno::get();
        self.die(code, msg)
    }

    /// Log at critical priority and exit with status 1.
    pub fn fatalx(&self, msg: Option<Arguments>) -> ! {
        self.die(0, msg)
    }
}

/// Builder for `Logger`
pub struct LoggerBuilder {
    debug: bool,
    verbose: i32,
    line_limit: usize,
    procname: Option<String>,
    console: Option<Box<dyn Write + Send>>,
    syslog: Option<Box<dyn Syslog>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            debug: false,
            verbose: 0,
            line_limit: DEFAULT_LINE_LIMIT,
            procname: None,
            console: None,
            syslog: None,
        }
    }
}

impl LoggerBuilder {
    #[inline]
    #[must_use]
    /// Start in debug mode without calling `init`
    pub const fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }
    #[inline]
    #[must_use]
    /// Set the verbosity level
    pub const fn verbose(mut self, v: i32) -> Self {
        self.verbose = v;
        self
    }
    #[inline]
    #[must_use]
    /// Set the byte budget for one rendered line
    pub const fn line_limit(mut self, limit: usize) -> Self {
        self.line_limit = limit;
        self
    }
    #[inline]
    #[must_use]
    /// Set the process name
    pub fn procname(mut self, name: impl Into<String>) -> Self {
        self.procname = Some(name.into());
        self
    }
    #[inline]
    #[must_use]
    /// Replace the console sink
    pub fn console(mut self, w: Box<dyn Write + Send>) -> Self {
        self.console = Some(w);
        self
    }
    #[inline]
    #[must_use]
    /// Replace the system log sink
    pub fn syslog(mut self, s: Box<dyn Syslog>) -> Self {
        self.syslog = Some(s);
        self
    }

    /// Build the logger
    #[must_use]
    pub fn build(self) -> Logger {
        let console = self.console.unwrap_or_else(|| Box::new(io::stderr()));
        let syslog = self
            .syslog
            .unwrap_or_else(|| Box::new(SystemLog::new()));
        let lg = Logger {
            sink: StdMutex::new(Sink { console, syslog }),
            ..Logger::default()
        };
        lg.debug.store(self.debug, Ordering::Relaxed);
        lg.set_verbose(self.verbose);
        lg.set_line_limit(self.line_limit);
        lg.procinit(self.procname.as_deref());
        lg
    }

    /// Build the logger and leak it
    #[must_use]
    pub fn build_static(self) -> &'static Logger {
        Box::leak(Box::new(self.build()))
    }
}

// ===== Macros (require a logger argument) ====================================
// `use proclog::local::warnx; warnx!(lg, "...")` avoids clashing with the
// root `proclog::log_warnx!` family.

#[macro_export]
/// Log at a priority
macro_rules! __proclog_local_logit { ($lg:expr, $pri:expr, $($t:tt)+) => { $lg.logit($pri, format_args!($($t)+)) } }
#[macro_export]
/// Error with errno description
macro_rules! __proclog_local_warn {
    ($lg:expr) => { $lg.warn(None) };
    ($lg:expr, $($t:tt)+) => { $lg.warn(Some(format_args!($($t)+))) };
}
#[macro_export]
/// Error without errno description
macro_rules! __proclog_local_warnx { ($lg:expr, $($t:tt)+) => { $lg.warnx(format_args!($($t)+)) } }
#[macro_export]
/// Informational message
macro_rules! __proclog_local_info { ($lg:expr, $($t:tt)+) => { $lg.info(format_args!($($t)+)) } }
#[macro_export]
/// Debug message; arguments are not evaluated when debug output is off
macro_rules! __proclog_local_debug {
    ($lg:expr, $($t:tt)+) => {{
        let __lg = $lg; // evaluate once
        if __lg.debug_enabled() { __lg.debug(format_args!($($t)+)); }
    }};
}
#[macro_export]
/// Log and exit, with errno description
macro_rules! __proclog_local_fatal {
    ($lg:expr) => { $lg.fatal(None) };
    ($lg:expr, $($t:tt)+) => { $lg.fatal(Some(format_args!($($t)+))) };
}
#[macro_export]
/// Log and exit
macro_rules! __proclog_local_fatalx {
    ($lg:expr) => { $lg.fatalx(None) };
    ($lg:expr, $($t:tt)+) => { $lg.fatalx(Some(format_args!($($t)+))) };
}

pub use crate::__proclog_local_debug as debug;
pub use crate::__proclog_local_fatal as fatal;
pub use crate::__proclog_local_fatalx as fatalx;
pub use crate::__proclog_local_info as info;
pub use crate::__proclog_local_logit as logit;
pub use crate::__proclog_local_warn as warn;
pub use crate::__proclog_local_warnx as warnx;
