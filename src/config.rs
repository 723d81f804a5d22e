use crate::Facility;

/// Startup settings for [`Logger::init_with`](crate::Logger::init_with).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Route everything to stderr instead of syslog.
    pub debug: bool,
    /// Verbosity to apply after init; `None` keeps the init default.
    pub verbose: Option<i32>,
    /// Facility used when syslog is the sink.
    pub facility: Facility,
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes") {
        Some(true)
    } else if s == "0" || s.eq_ignore_ascii_case("false") || s.eq_ignore_ascii_case("no") {
        Some(false)
    } else {
        None
    }
}

impl Config {
    /// Read `PROCLOG_DEBUG`, `PROCLOG_VERBOSE` and `PROCLOG_FACILITY`.
    ///
    /// Unset or unparsable variables keep their default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Overlay environment settings on `self`.
    pub fn apply_env(&mut self) {
        if let Some(on) = std::env::var("PROCLOG_DEBUG").ok().as_deref().and_then(parse_bool) {
            self.debug = on;
        }
        if let Ok(s) = std::env::var("PROCLOG_VERBOSE") {
            if let Ok(v) = s.trim().parse() {
                self.verbose = Some(v);
            }
        }
        if let Ok(s) = std::env::var("PROCLOG_FACILITY") {
            if let Some(f) = Facility::from_name(s.trim()) {
                self.facility = f;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert!(!c.debug);
        assert_eq!(c.verbose, None);
        assert_eq!(c.facility, Facility::Daemon);
    }
}
