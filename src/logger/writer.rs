//! Log output targets.
//!
//! Two independent channels, access/info and error, each going to a
//! stream or an append-mode file. Targets are fixed at startup;
//! configuration does not change for the process lifetime.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// One log output destination
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    /// Open a file target in append mode, creating parent directories
    fn open(path: &str) -> io::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::File(Mutex::new(file)))
    }

    /// Write one line; a failed or poisoned file write is dropped rather
    /// than allowed to take the request path down
    fn write_line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// The process-wide pair of log channels
pub struct LogWriter {
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    /// Access log and startup banner lines
    pub fn write_access(&self, message: &str) {
        self.access.write_line(message);
    }

    /// Errors and warnings
    pub fn write_error(&self, message: &str) {
        self.error.write_line(message);
    }
}

/// Install the global log writer; called once at startup
///
/// Absent file paths mean stdout for access/info and stderr for errors.
/// Fails if a log file cannot be opened or the writer is already set.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter {
        access: match access_log_file {
            Some(path) => LogTarget::open(path)?,
            None => LogTarget::Stdout,
        },
        error: match error_log_file {
            Some(path) => LogTarget::open(path)?,
            None => LogTarget::Stderr,
        },
    };
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// The installed writer, or `None` before `init` (unit tests never init;
/// callers fall back to the plain streams)
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
