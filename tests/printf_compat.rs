mod helpers;
use helpers::*;
use proclog::{Arg, Facility, Priority};

#[test]
fn logit_printf_formats_arguments() {
    let (lg, console, _s) = capture();
    lg.init(true, Facility::Daemon);
    lg.logit_printf(
        Priority::Info,
        "%s: spi 0x%08x len %zu",
        &["pfkey_reply".into(), 0xbeefu32.into(), 31usize.into()],
    );
    assert_eq!(console.lines(), ["pfkey_reply: spi 0x0000beef len 31"]);
}

#[test]
fn mismatched_printf_falls_back_to_raw_format() {
    let (lg, _console, syslog) = capture();
    lg.init(false, Facility::Daemon);
    lg.logit_printf(Priority::Error, "peer %s id %d", &[Arg::Int(3)]);
    assert_eq!(
        syslog.entries(),
        vec![(Priority::Error, "peer %s id %d".to_owned())]
    );
}

#[test]
fn overflowing_width_falls_back_to_raw_format() {
    let (lg, _console, syslog) = capture();
    lg.init(false, Facility::Daemon);
    lg.logit_printf(Priority::Info, "%99999999999999999999d", &[Arg::Int(1)]);
    assert_eq!(
        syslog.entries(),
        vec![(Priority::Info, "%99999999999999999999d".to_owned())]
    );
}

#[test]
fn width_beyond_line_budget_falls_back_to_raw_format() {
    let (lg, _console, syslog) = capture();
    lg.init(false, Facility::Daemon);
    lg.logit_printf(Priority::Info, "%4611686018427387904s", &["x".into()]);
    lg.set_line_limit(16);
    lg.logit_printf(Priority::Info, "[%20d]", &[Arg::Int(7)]);
    assert_eq!(
        syslog.entries(),
        vec![
            (Priority::Info, "%4611686018427387904s".to_owned()),
            (Priority::Info, "[%20d]".to_owned()),
        ]
    );
}
