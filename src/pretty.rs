//! Colored, staggered debug lines for daemons that run several processes on
//! one terminal.
//!
//! A line looks like
//!
//! ```text
//! 15:04:05.000 12345 [WARN] pfkey_process reached
//! 15:04:05.001 12346          config_setcoupled loaded 4 policies
//! ```
//!
//! The pid is drawn in a 256-color shade derived from the process name, and
//! each role waits a fixed delay at registration so the processes' first
//! lines do not land on top of each other.

use core::fmt::{self, Arguments};
use core::str::FromStr;
use std::time::Duration;

use crate::errno::{self, DescribeBuf};
use crate::format::{self, Arg};
use crate::{hash, Error, Logger, Priority};

const RST: &str = "\x1b[0m";

/// Process roles known to the pretty mode.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Role {
    /// The privileged parent.
    Parent,
    /// The control socket process.
    Control,
    /// The certificate authority process.
    Ca,
    /// The IKEv2 protocol process.
    Ikev2,
}

impl Role {
    /// Delay applied once at registration.
    #[must_use]
    pub const fn stagger(self) -> Duration {
        match self {
            Self::Parent => Duration::from_millis(0),
            Self::Control => Duration::from_millis(100),
            Self::Ca => Duration::from_millis(200),
            Self::Ikev2 => Duration::from_millis(300),
        }
    }

    /// Process name for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Control => "control",
            Self::Ca => "ca",
            Self::Ikev2 => "ikev2",
        }
    }
}

impl FromStr for Role {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Self::Parent),
            "control" => Ok(Self::Control),
            "ca" => Ok(Self::Ca),
            "ikev2" => Ok(Self::Ikev2),
            other => Err(Error::UnknownRole(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which wrapper a pretty line stands for.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Kind {
    /// Error with errno description.
    Warn,
    /// Error.
    Warnx,
    /// Informational.
    Info,
    /// Debug, gated on verbosity.
    Debug,
}

impl Kind {
    const fn priority(self) -> Priority {
        match self {
            Self::Warn | Self::Warnx => Priority::Error,
            Self::Info => Priority::Info,
            Self::Debug => Priority::Debug,
        }
    }
}

/// What registration decided for this process.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Tag {
    /// Registered role.
    pub role: Role,
    /// Pid shown on every line.
    pub pid: u32,
    /// 256-color index of the pid field.
    pub color: u8,
}

impl Tag {
    fn new(role: Role) -> Self {
        Self {
            role,
            pid: std::process::id(),
            color: hash::color256(role.as_str()),
        }
    }
}

fn severity_tag(f: &mut fmt::Formatter<'_>, pri: Priority, func: &str) -> fmt::Result {
    match pri {
        Priority::Error | Priority::Warning => write!(f, " \x1b[33m[WARN]{func:>14}"),
        Priority::Info | Priority::Notice => write!(f, " \x1b[34m{func:>20}"),
        Priority::Debug => write!(f, " \x1b[37m{func:>20}"),
        Priority::Critical => write!(f, " \x1b[31m[NOTREACHED]{func:>8}"),
    }
}

#[derive(Copy, Clone)]
struct Stamp {
    hour: u8,
    minute: u8,
    second: u8,
    milli: u16,
}

impl Stamp {
    fn now() -> Self {
        let now = time::OffsetDateTime::now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc());
        Self {
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
            milli: now.millisecond(),
        }
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hour, self.minute, self.second, self.milli
        )
    }
}

struct Line<'a> {
    stamp: Stamp,
    tag: Tag,
    pri: Priority,
    func: &'a str,
    subject: Option<&'a str>,
    body: Arguments<'a>,
    errstr: Option<&'a str>,
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \x1b[38;5;{}m{:5}{RST}",
            self.stamp, self.tag.color, self.tag.pid
        )?;
        severity_tag(f, self.pri, self.func)?;
        f.write_str(" ")?;
        if let Some(s) = self.subject {
            write!(f, "{s}: ")?;
        }
        f.write_fmt(self.body)?;
        if let Some(e) = self.errstr {
            write!(f, ": {e}")?;
        }
        f.write_str(RST)
    }
}

/// Drop a leading `%s` and its argument when that argument is `func`.
///
/// Nothing is consumed unless both hold.
#[must_use]
pub fn strip_func<'f, 'a>(func: &str, fmt: &'f str, args: &'a [Arg<'a>]) -> (&'f str, &'a [Arg<'a>]) {
    if let (Some(rest), Some(Arg::Str(first))) = (fmt.strip_prefix("%s"), args.first()) {
        if *first == func {
            return (rest, &args[1..]);
        }
    }
    (fmt, args)
}

impl Logger {
    /// Register `name` as one of the known roles: set the process name,
    /// derive the pid color, sleep the role's stagger, then log an
    /// `initialized` line.
    ///
    /// # Errors
    /// [`Error::UnknownRole`] for any other name; nothing is logged or
    /// changed in that case.
    pub fn try_procinit_pretty(&self, name: &str) -> Result<Role, Error> {
        let role: Role = name.parse()?;
        self.procinit(Some(name));
        let tag = Tag::new(role);
        *self.pretty_state() = Some(tag);
        std::thread::sleep(role.stagger());
        self.pretty(
            Kind::Info,
            crate::function_name!(),
            None,
            format_args!("initialized {name} {}", tag.color),
        );
        Ok(role)
    }

    /// Like [`try_procinit_pretty`](Self::try_procinit_pretty), but an
    /// unknown name is fatal.
    pub fn procinit_pretty(&self, name: &str) -> Role {
        match self.try_procinit_pretty(name) {
            Ok(role) => role,
            Err(e) => self.fatalx(Some(format_args!("{e}"))),
        }
    }

    /// Registration state, if any.
    #[must_use]
    pub fn pretty_tag(&self) -> Option<Tag> {
        *self.pretty_state()
    }

    /// Log a pretty line for `func`.
    ///
    /// `subject` is printed as `"<subject>: "` before the body unless it is
    /// `func` itself, which the function column already shows. Outside debug
    /// mode the line goes to the system log as `"<func>: <body>"` without
    /// any decoration.
    pub fn pretty(&self, kind: Kind, func: &str, subject: Option<&str>, args: Arguments) {
        let e = errno::Guard::save();
        if kind == Kind::Debug && !self.debug_enabled() {
            return;
        }
        let mut ebuf: DescribeBuf = [0; 128];
        let errstr = if kind == Kind::Warn {
            Some(errno::describe(e.saved(), &mut ebuf))
        } else {
            None
        };
        let subject = subject.filter(|s| *s != func);
        let pri = kind.priority();

        if !self.debug_mode() {
            let sub = subject.unwrap_or_default();
            let sep = if subject.is_some() { ": " } else { "" };
            match errstr {
                Some(estr) => self.route(pri, format_args!("{func}: {sub}{sep}{args}: {estr}")),
                None => self.route(pri, format_args!("{func}: {sub}{sep}{args}")),
            }
            return;
        }

        let tag = self.pretty_tag().unwrap_or_else(|| Tag {
            role: Role::Parent,
            pid: std::process::id(),
            color: hash::color256(&self.procname()),
        });
        let line = Line {
            stamp: Stamp::now(),
            tag,
            pri,
            func,
            subject,
            body: args,
            errstr,
        };
        self.route(pri, format_args!("{line}"));
    }

    /// Pretty line from a printf format. A leading `%s` whose argument is
    /// `func` is dropped along with that argument; the rest of the format is
    /// kept as written.
    pub fn pretty_printf(&self, kind: Kind, func: &str, fmt: &str, args: &[Arg]) {
        let _e = errno::Guard::save();
        if kind == Kind::Debug && !self.debug_enabled() {
            return;
        }
        let (fmt, args) = strip_func(func, fmt, args);
        match format::printf(fmt, args, self.line_limit()) {
            Ok(body) => self.pretty(kind, func, None, format_args!("{body}")),
            Err(_) => self.pretty(kind, func, None, format_args!("{fmt}")),
        }
    }
}
