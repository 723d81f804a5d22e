//! The system log sink.
//!
//! [`Syslog`] is the seam the router sends to when debug mode is off.
//! [`SystemLog`] is the real thing, built on libc `openlog`/`syslog`/`closelog`.

use core::fmt;
use std::ffi::CString;

use crate::Priority;

/// Syslog facility, one of the `LOG_*` facility codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum Facility {
    /// `LOG_KERN`
    Kern = libc::LOG_KERN,
    /// `LOG_USER`
    User = libc::LOG_USER,
    /// `LOG_MAIL`
    Mail = libc::LOG_MAIL,
    /// `LOG_DAEMON`
    Daemon = libc::LOG_DAEMON,
    /// `LOG_AUTH`
    Auth = libc::LOG_AUTH,
    /// `LOG_SYSLOG`
    Syslog = libc::LOG_SYSLOG,
    /// `LOG_LPR`
    Lpr = libc::LOG_LPR,
    /// `LOG_NEWS`
    News = libc::LOG_NEWS,
    /// `LOG_UUCP`
    Uucp = libc::LOG_UUCP,
    /// `LOG_CRON`
    Cron = libc::LOG_CRON,
    /// `LOG_LOCAL0`
    Local0 = libc::LOG_LOCAL0,
    /// `LOG_LOCAL1`
    Local1 = libc::LOG_LOCAL1,
    /// `LOG_LOCAL2`
    Local2 = libc::LOG_LOCAL2,
    /// `LOG_LOCAL3`
    Local3 = libc::LOG_LOCAL3,
    /// `LOG_LOCAL4`
    Local4 = libc::LOG_LOCAL4,
    /// `LOG_LOCAL5`
    Local5 = libc::LOG_LOCAL5,
    /// `LOG_LOCAL6`
    Local6 = libc::LOG_LOCAL6,
    /// `LOG_LOCAL7`
    Local7 = libc::LOG_LOCAL7,
}

const NAMES: [(&str, Facility); 18] = [
    ("kern", Facility::Kern),
    ("user", Facility::User),
    ("mail", Facility::Mail),
    ("daemon", Facility::Daemon),
    ("auth", Facility::Auth),
    ("syslog", Facility::Syslog),
    ("lpr", Facility::Lpr),
    ("news", Facility::News),
    ("uucp", Facility::Uucp),
    ("cron", Facility::Cron),
    ("local0", Facility::Local0),
    ("local1", Facility::Local1),
    ("local2", Facility::Local2),
    ("local3", Facility::Local3),
    ("local4", Facility::Local4),
    ("local5", Facility::Local5),
    ("local6", Facility::Local6),
    ("local7", Facility::Local7),
];

impl Facility {
    /// Case-insensitive lookup by name (`"daemon"`, `"LOCAL0"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, f)| f)
    }

    /// Lower-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, f)| *f == self)
            .map_or("daemon", |&(n, _)| n)
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::Daemon
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A system log connection.
pub trait Syslog: Send {
    /// Open the connection. `ident` prefixes every entry.
    fn open(&mut self, ident: &str, facility: Facility);
    /// Send one entry.
    fn send(&mut self, priority: Priority, message: &str);
}

/// syslog(3) through libc.
#[derive(Debug, Default)]
pub struct SystemLog {
    // openlog keeps the pointer, so the string lives as long as the connection
    ident: Option<CString>,
}

impl SystemLog {
    /// Not yet opened.
    #[must_use]
    pub const fn new() -> Self {
        Self { ident: None }
    }
}

impl Syslog for SystemLog {
    fn open(&mut self, ident: &str, facility: Facility) {
        let Ok(ident) = CString::new(ident) else {
            return;
        };
        // SAFETY: the ident pointer stays valid until closelog, which runs
        // before `self.ident` is replaced or dropped.
        unsafe {
            if self.ident.is_some() {
                libc::closelog();
            }
            libc::openlog(
                ident.as_ptr(),
                libc::LOG_PID | libc::LOG_NDELAY,
                facility as libc::c_int,
            );
        }
        self.ident = Some(ident);
    }

    fn send(&mut self, priority: Priority, message: &str) {
        // interior NULs cannot cross the C boundary; cut there
        let message = message.split('\0').next().unwrap_or_default();
        let Ok(message) = CString::new(message) else {
            return;
        };
        // SAFETY: "%s" keeps `%` in the message from being interpreted and
        // both pointers are valid NUL-terminated strings.
        unsafe {
            libc::syslog(
                priority.as_syslog(),
                b"%s\0".as_ptr().cast::<libc::c_char>(),
                message.as_ptr(),
            );
        }
    }
}

impl Drop for SystemLog {
    fn drop(&mut self) {
        if self.ident.is_some() {
            // SAFETY: openlog was called, so closelog is valid.
            unsafe { libc::closelog() };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facility_names_round_trip() {
        for (name, facility) in NAMES {
            assert_eq!(Facility::from_name(name), Some(facility));
            assert_eq!(facility.as_str(), name);
        }
    }

    #[test]
    fn facility_lookup_is_case_insensitive() {
        assert_eq!(Facility::from_name("LOCAL0"), Some(Facility::Local0));
        assert_eq!(Facility::from_name("Daemon"), Some(Facility::Daemon));
        assert_eq!(Facility::from_name("bogus"), None);
    }

    #[test]
    fn default_facility_is_daemon() {
        assert_eq!(Facility::default(), Facility::Daemon);
    }
}
