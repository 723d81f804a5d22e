mod helpers;
use helpers::*;
use proclog::{log_debug, log_info, log_warn, log_warnx, logit, Facility, Logger, Priority};

#[test]
fn root_api_drives_the_installed_logger() {
    let _g = test_lock().lock().unwrap();
    let console = Mem::default();
    let syslog = MemSyslog::default();
    let lg = Logger::builder()
        .console(Box::new(console.clone()))
        .syslog(Box::new(syslog.clone()))
        .build();
    assert!(proclog::set_logger(lg).is_ok());

    proclog::init(true, Facility::Local0);
    proclog::procinit(Some("parent"));
    assert_eq!(proclog::verbose(), 1);

    log_info!("hello {}", 42);
    log_debug!("hidden");
    proclog::set_verbose(2);
    log_debug!("shown");
    log_warnx!("careful");
    proclog::errno::set(libc::ENOENT);
    log_warn!("open");
    log_warn!();
    logit!(Priority::Notice, "n");

    assert_eq!(
        console.lines(),
        [
            "hello 42",
            "shown",
            "careful",
            "open: No such file or directory",
            "No such file or directory",
            "n",
        ]
    );
    assert!(syslog.entries().is_empty());
    assert_eq!(proclog::logger().procname(), "parent");

    let other = Logger::builder().build();
    assert!(proclog::set_logger(other).is_err());
}
