use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::error::{DeskError, Result};

/// Writes to the shared log file, or discards output when there is none.
///
/// The terminal is in raw alternate-screen mode while the desktop runs, so
/// there is no stderr fallback.
pub enum DelegatingWriter {
    File(Arc<Mutex<File>>),
    Sink(io::Sink),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DelegatingWriter::File(file) => match file.lock() {
                Ok(mut file) => file.write(buf),
                Err(poisoned) => poisoned.into_inner().write(buf),
            },
            DelegatingWriter::Sink(sink) => sink.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DelegatingWriter::File(file) => match file.lock() {
                Ok(mut file) => file.flush(),
                Err(poisoned) => poisoned.into_inner().flush(),
            },
            DelegatingWriter::Sink(sink) => sink.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| DeskError::LogFile {
                        path: path.to_path_buf(),
                        source,
                    })?,
            ),
            None => None,
        };
        Ok(Self {
            file: file.map(|f| Arc::new(Mutex::new(f))),
        })
    }

    pub fn is_discarding(&self) -> bool {
        self.file.is_none()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match &self.file {
            Some(file) => DelegatingWriter::File(Arc::clone(file)),
            None => DelegatingWriter::Sink(io::sink()),
        }
    }
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init(level: Level, log_file: Option<&Path>) -> Result<()> {
    let writer = SubscriberMakeWriter::open(log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn writes_land_in_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.log");
        let make = SubscriberMakeWriter::open(Some(&path)).unwrap();
        assert!(!make.is_discarding());
        let mut writer = make.make_writer();
        writer.write_all(b"window opened\n").unwrap();
        writer.flush().unwrap();

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "window opened\n");
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("desk.log");
        let err = SubscriberMakeWriter::open(Some(&path)).unwrap_err();
        assert!(matches!(err, DeskError::LogFile { path: p, .. } if p == path));
    }

    #[test]
    fn no_path_discards() {
        let make = SubscriberMakeWriter::open(None).unwrap();
        assert!(make.is_discarding());
        assert_eq!(make.make_writer().write(b"dropped").unwrap(), 7);
    }
}
