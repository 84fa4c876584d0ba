//! Minimal file-backed logger installed once at process startup.
//!
//! `env_logger`'s usual destination — stderr — is not a safe output channel
//! here: stdout/stderr are not reserved once the VT owns the display and
//! stdin is in raw mode. Everything goes to a single overwritten file
//! instead, per the "log file overwritten each run" contract.

use std::fs::File;
use std::io::Write;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    fn open(path: &str) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Installs the process-wide logger at `/tmp/<product>.log`, truncating any
/// previous run's log. Call once, before device probing begins.
pub fn init(product: &str) {
    let path = format!("/tmp/{product}.log");
    let logger = match FileLogger::open(&path) {
        Ok(logger) => logger,
        Err(_) => {
            // No writable /tmp: fall back to a logger that drops everything
            // rather than panicking the whole process over diagnostics.
            let _ = log::set_logger(&NOOP);
            log::set_max_level(LevelFilter::Off);
            return;
        }
    };
    let boxed: Box<dyn Log> = Box::new(logger);
    let _ = log::set_boxed_logger(boxed);
    log::set_max_level(LevelFilter::Info);
}

struct NoopLogger;
impl Log for NoopLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        false
    }
    fn log(&self, _: &Record) {}
    fn flush(&self) {}
}
static NOOP: NoopLogger = NoopLogger;
