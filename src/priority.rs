use core::fmt;

/// Message priority, ordered from least to most severe.
///
/// Maps onto the syslog(3) severities when the system log is the sink.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum Priority {
    /// `LOG_DEBUG`
    Debug = 0,
    /// `LOG_INFO`
    Info,
    /// `LOG_NOTICE`
    Notice,
    /// `LOG_WARNING`
    Warning,
    /// `LOG_ERR`, used by the warn wrappers
    Error,
    /// `LOG_CRIT`, used by the fatal path
    Critical,
}

impl Priority {
    /// The syslog(3) severity value.
    #[must_use]
    pub const fn as_syslog(self) -> libc::c_int {
        match self {
            Self::Debug => libc::LOG_DEBUG,
            Self::Info => libc::LOG_INFO,
            Self::Notice => libc::LOG_NOTICE,
            Self::Warning => libc::LOG_WARNING,
            Self::Error => libc::LOG_ERR,
            Self::Critical => libc::LOG_CRIT,
        }
    }

    /// Upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_severity() {
        assert!(Priority::Debug < Priority::Info);
        assert!(Priority::Info < Priority::Warning);
        assert!(Priority::Error < Priority::Critical);
    }

    #[test]
    fn maps_to_syslog_levels() {
        assert_eq!(Priority::Error.as_syslog(), libc::LOG_ERR);
        assert_eq!(Priority::Critical.as_syslog(), libc::LOG_CRIT);
        assert_eq!(Priority::Debug.as_syslog(), libc::LOG_DEBUG);
    }
}
