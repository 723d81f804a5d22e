mod helpers;
use helpers::*;
use proclog::{errno, Arg, Facility, Priority};

fn exercise(lg: &proclog::Logger) {
    lg.logit(Priority::Notice, format_args!("logit {}", 1));
    lg.logit_printf(Priority::Info, "printf %d", &[Arg::Int(2)]);
    lg.logit_printf(Priority::Info, "bad %d", &[]);
    lg.warn(None);
    lg.warn(Some(format_args!("warn {}", "ctx")));
    lg.warnx(format_args!("warnx"));
    lg.info(format_args!("info"));
    lg.debug(format_args!("debug"));
    let _ = lg.fatal_line(libc::EPERM, Some(format_args!("fatal")));
}

#[test]
fn errno_survives_every_call_in_both_modes() {
    for debug in [true, false] {
        for limit in [proclog::local::DEFAULT_LINE_LIMIT, 3] {
            for verbose in [0, 2] {
                let (lg, _c, _s) = capture();
                lg.init(debug, Facility::Daemon);
                lg.set_verbose(verbose);
                lg.set_line_limit(limit);

                errno::set(libc::EAGAIN);
                exercise(&lg);
                assert_eq!(
                    errno::get(),
                    libc::EAGAIN,
                    "debug={debug} limit={limit} verbose={verbose}"
                );
            }
        }
    }
}

#[test]
fn errno_survives_init_and_procinit() {
    let (lg, _c, _s) = capture();
    errno::set(libc::EBADF);
    lg.init(false, Facility::Local0);
    lg.procinit(Some("ca"));
    assert_eq!(errno::get(), libc::EBADF);
}
