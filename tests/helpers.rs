#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use proclog::{Facility, Logger, Priority, Syslog};

// Global lock to serialize tests that touch process-wide state (env, global logger)
pub fn test_lock() -> &'static Mutex<()> {
    static L: OnceLock<Mutex<()>> = OnceLock::new();
    L.get_or_init(|| Mutex::new(()))
}

/// In-memory console sink
#[derive(Clone, Default)]
pub struct Mem(pub Arc<Mutex<Vec<u8>>>);
impl Write for Mem {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
impl Mem {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
    pub fn lines(&self) -> Vec<String> {
        self.text()
            .lines()
            .map(std::string::ToString::to_string)
            .collect()
    }
    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

#[derive(Debug, Default)]
pub struct SyslogRecord {
    pub opened: Option<(String, Facility)>,
    pub entries: Vec<(Priority, String)>,
}

/// In-memory system log
#[derive(Clone, Default)]
pub struct MemSyslog(pub Arc<Mutex<SyslogRecord>>);
impl Syslog for MemSyslog {
    fn open(&mut self, ident: &str, facility: Facility) {
        self.0.lock().unwrap().opened = Some((ident.to_owned(), facility));
    }
    fn send(&mut self, priority: Priority, message: &str) {
        self.0
            .lock()
            .unwrap()
            .entries
            .push((priority, message.to_owned()));
    }
}
impl MemSyslog {
    pub fn entries(&self) -> Vec<(Priority, String)> {
        self.0.lock().unwrap().entries.clone()
    }
    pub fn opened(&self) -> Option<(String, Facility)> {
        self.0.lock().unwrap().opened.clone()
    }
}

/// Logger wired to memory sinks
pub fn capture() -> (Logger, Mem, MemSyslog) {
    let console = Mem::default();
    let syslog = MemSyslog::default();
    let lg = Logger::builder()
        .console(Box::new(console.clone()))
        .syslog(Box::new(syslog.clone()))
        .build();
    (lg, console, syslog)
}
