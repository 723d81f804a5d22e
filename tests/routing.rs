mod helpers;
use helpers::*;
use proclog::{errno, Facility, Priority};

const PRIORITIES: [Priority; 6] = [
    Priority::Debug,
    Priority::Info,
    Priority::Notice,
    Priority::Warning,
    Priority::Error,
    Priority::Critical,
];

#[test]
fn debug_mode_writes_only_to_console() {
    let (lg, console, syslog) = capture();
    lg.init(true, Facility::Local0);

    for pri in PRIORITIES {
        lg.logit(pri, format_args!("msg {pri}"));
    }

    let lines = console.lines();
    assert_eq!(lines.len(), PRIORITIES.len());
    for (line, pri) in lines.iter().zip(PRIORITIES) {
        assert_eq!(line, &format!("msg {pri}"));
    }
    assert!(syslog.entries().is_empty());
    assert!(syslog.opened().is_none(), "syslog must not be opened in debug mode");
}

#[test]
fn syslog_mode_writes_only_to_syslog() {
    let (lg, console, syslog) = capture();
    lg.init(false, Facility::Local0);

    for pri in PRIORITIES {
        lg.logit(pri, format_args!("msg {pri}"));
    }

    let entries = syslog.entries();
    assert_eq!(entries.len(), PRIORITIES.len());
    for ((got_pri, msg), pri) in entries.iter().zip(PRIORITIES) {
        assert_eq!(*got_pri, pri);
        assert_eq!(msg, &format!("msg {pri}"));
    }
    assert!(console.text().is_empty());
}

#[test]
fn init_opens_syslog_with_program_name_and_facility() {
    let (lg, _console, syslog) = capture();
    lg.init(false, Facility::Local3);

    let (ident, facility) = syslog.opened().expect("syslog opened");
    assert_eq!(facility, Facility::Local3);
    assert_eq!(ident, lg.procname());
    assert!(!ident.is_empty());
}

#[test]
fn init_sets_verbosity_from_debug_flag() {
    let (lg, _c, _s) = capture();
    lg.init(true, Facility::Daemon);
    assert!(lg.debug_mode());
    assert_eq!(lg.verbose(), 1);

    let (lg, _c, _s) = capture();
    lg.init(false, Facility::Daemon);
    assert!(!lg.debug_mode());
    assert_eq!(lg.verbose(), 0);
}

#[test]
fn procinit_last_call_wins_and_none_is_ignored() {
    let (lg, _c, _s) = capture();
    lg.init(true, Facility::Daemon);
    lg.procinit(Some("parent"));
    lg.procinit(Some("control"));
    lg.procinit(None);
    assert_eq!(lg.procname(), "control");
}

#[test]
fn scenario_syslog_warnx() {
    let (lg, console, syslog) = capture();
    lg.init(false, Facility::Local0);
    lg.procinit(Some("control"));
    lg.warnx(format_args!("listener failed"));

    assert_eq!(
        syslog.entries(),
        vec![(Priority::Error, "listener failed".to_owned())]
    );
    assert!(console.text().is_empty());
}

#[test]
fn scenario_debug_warn_appends_errno() {
    let (lg, console, syslog) = capture();
    lg.init(true, Facility::Local0);
    lg.procinit(Some("ikev2"));
    errno::set(libc::ENOENT);
    lg.warn(Some(format_args!("open config")));

    assert_eq!(console.text(), "open config: No such file or directory\n");
    assert!(syslog.entries().is_empty());
}

#[test]
fn syslog_messages_keep_percent_signs() {
    let (lg, _console, syslog) = capture();
    lg.init(false, Facility::Daemon);
    lg.info(format_args!("100% %s %n"));
    assert_eq!(syslog.entries()[0].1, "100% %s %n");
}

#[test]
fn local_macros_route_through_the_logger() {
    use proclog::local::{info, logit, warnx};

    let (lg, console, _syslog) = capture();
    lg.init(true, Facility::Daemon);
    info!(&lg, "up {}", 1);
    warnx!(&lg, "down {}", 2);
    logit!(&lg, Priority::Notice, "n{}", 3);
    assert_eq!(console.lines(), ["up 1", "down 2", "n3"]);
}
