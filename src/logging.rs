use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    str::FromStr,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;

pub struct Logger {
    level: LevelFilter,
    json_file: Option<Mutex<File>>,
}

impl Logger {
    pub fn from_env() -> Result<Self> {
        let level = match std::env::var("HOMEBASE_LOG") {
            Ok(raw) => LevelFilter::from_str(raw.trim())
                .map_err(|_| anyhow!("invalid HOMEBASE_LOG `{raw}` (use error|warn|info|debug|trace)"))?,
            Err(_) => LevelFilter::Info,
        };
        let path = std::env::var("HOMEBASE_LOG_JSON_PATH").ok();
        Self::new(level, path.map(PathBuf::from))
    }

    pub fn new(level: LevelFilter, path: Option<PathBuf>) -> Result<Self> {
        let json_file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("opening log file {}", path.display()))?;
                Some(Mutex::new(file))
            }
            None => None,
        };
        Ok(Self { level, json_file })
    }

    pub fn install(self) -> Result<()> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| anyhow!("logger already set: {e}"))?;
        log::set_max_level(level);
        Ok(())
    }

    fn event(&self, level: &str, target: &str, message: &str) {
        let Some(file) = &self.json_file else {
            return;
        };
        let Ok(mut file) = file.lock() else {
            return;
        };

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let entry = json!({
            "ts_ms": ts_ms,
            "level": level,
            "target": target,
            "msg": message,
        });

        let _ = writeln!(file, "{}", entry);
        let _ = file.flush();
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        let level = record.level();
        if level <= log::Level::Warn {
            eprintln!("[{level}] {message}");
        } else {
            println!("[{level}] {message}");
        }
        self.event(
            &level.as_str().to_ascii_lowercase(),
            record.target(),
            &message,
        );
    }

    fn flush(&self) {
        if let Some(Ok(mut file)) = self.json_file.as_ref().map(Mutex::lock) {
            let _ = file.flush();
        }
    }
}
