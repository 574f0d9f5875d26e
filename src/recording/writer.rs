use std::{
    fs::File,
    io::{BufWriter, Write as _},
    thread::JoinHandle,
};

use crossbeam_channel::{unbounded, Sender};

use super::LogFile;
use crate::error::{HomebaseError, Result};

pub fn write_log_file(file: &LogFile) -> Result<()> {
    let io_err = |e: std::io::Error| HomebaseError::io(&file.path, e);
    let handle = File::create(&file.path).map_err(io_err)?;
    let mut out = BufWriter::new(handle);
    for line in &file.lines {
        writeln!(out, "{line}").map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

fn persist_or_warn(file: &LogFile) {
    match write_log_file(file) {
        Ok(()) => log::info!(
            "wrote {} lines to {}",
            file.lines.len(),
            file.path.display()
        ),
        // Rows are dropped; the session carries on as if the write succeeded.
        Err(err) => log::warn!("discarding {} log lines: {err}", file.lines.len()),
    }
}

/// Sink for finished log files. Writes are best-effort in both modes.
pub enum FileWriter {
    Blocking,
    Background {
        sender: Option<Sender<LogFile>>,
        worker: Option<JoinHandle<()>>,
    },
}

impl FileWriter {
    pub fn new(background: bool) -> Self {
        if background {
            Self::background()
        } else {
            Self::Blocking
        }
    }

    pub fn background() -> Self {
        let (sender, receiver) = unbounded::<LogFile>();
        let spawned = std::thread::Builder::new()
            .name("homebase-writer".into())
            .spawn(move || {
                for file in receiver.iter() {
                    persist_or_warn(&file);
                }
            });
        match spawned {
            Ok(worker) => Self::Background {
                sender: Some(sender),
                worker: Some(worker),
            },
            Err(err) => {
                log::warn!("writer thread unavailable, writing inline: {err}");
                Self::Blocking
            }
        }
    }

    pub fn persist(&self, file: LogFile) {
        match self {
            Self::Blocking => persist_or_warn(&file),
            Self::Background { sender, .. } => {
                let Some(sender) = sender else {
                    persist_or_warn(&file);
                    return;
                };
                if let Err(err) = sender.send(file) {
                    persist_or_warn(&err.into_inner());
                }
            }
        }
    }

    /// Waits for queued writes to land. Later files are written inline.
    pub fn flush(&mut self) {
        if let Self::Background { sender, worker } = self {
            sender.take();
            if let Some(worker) = worker.take() {
                if worker.join().is_err() {
                    log::error!("writer thread panicked");
                }
            }
        }
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        self.flush();
    }
}
