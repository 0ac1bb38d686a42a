//! Console and log-file output.
//!
//! The subscriber is installed before the configuration is read, so the file
//! layer starts detached and is pointed at the log file once its path is known.
//! Events emitted while detached only reach the console.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Shared handle to the append-mode log file.
#[derive(Debug, Clone, Default)]
pub struct LogFile {
    file: Arc<Mutex<Option<File>>>,
}

impl LogFile {
    /// Opens `path` for appending, creating it if needed.
    pub fn attach(&self, path: &Path) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.lock() = Some(file);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.lock().as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.lock().as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Installs the global subscriber and returns the detached log file handle.
pub fn init_logging() -> LogFile {
    let log_file = LogFile::default();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(log_file.clone()),
        )
        .init();

    log_file
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detached_writes_are_dropped() {
        let mut log_file = LogFile::default();
        assert_eq!(log_file.write(b"lost\n").unwrap(), 5);
        log_file.flush().unwrap();
    }

    #[test]
    fn test_attach_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let log_file = LogFile::default();
        log_file.attach(&path).unwrap();
        log_file.make_writer().write_all(b"this run\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "previous run\nthis run\n");
    }

    #[test]
    fn test_attach_missing_directory() {
        let dir = TempDir::new().unwrap();
        let log_file = LogFile::default();
        assert!(log_file.attach(&dir.path().join("nope/sync.log")).is_err());
    }
}
