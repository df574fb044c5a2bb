//! FileAppender - writes events to disk as JSON lines

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{AppendError, Appender, AppenderLoggingError, LogEvent};
use tracing::{debug, error, instrument};

use super::AppenderCore;
use crate::error::DispatcherError;

/// Configuration for FileAppender
#[derive(Debug, Clone)]
pub struct FileAppenderConfig {
    /// Output file
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it
    pub append: bool,
    /// Flush after every event
    pub immediate_flush: bool,
}

impl FileAppenderConfig {
    /// Create config with default flags
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: true,
            immediate_flush: true,
        }
    }

    /// Create config from params map
    ///
    /// Recognised keys: `path` (required), `append`, `immediate_flush`.
    pub fn from_params(
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<Self, DispatcherError> {
        let path = params
            .get("path")
            .ok_or_else(|| DispatcherError::appender_creation(name, "missing 'path' parameter"))?;

        let mut config = Self::new(path);
        config.append = parse_flag(name, params, "append", config.append)?;
        config.immediate_flush =
            parse_flag(name, params, "immediate_flush", config.immediate_flush)?;
        Ok(config)
    }
}

fn parse_flag(
    name: &str,
    params: &HashMap<String, String>,
    key: &str,
    default: bool,
) -> Result<bool, DispatcherError> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| {
            DispatcherError::appender_creation(
                name,
                format!("parameter '{key}' must be true or false, got '{value}'"),
            )
        }),
    }
}

/// Appender writing one JSON object per line
///
/// The file is opened by `start` and closed by `stop`.
#[derive(Debug)]
pub struct FileAppender {
    core: AppenderCore,
    config: FileAppenderConfig,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileAppender {
    /// Create a new FileAppender (not yet started)
    pub fn new(core: AppenderCore, config: FileAppenderConfig) -> Self {
        Self {
            core,
            config,
            writer: Mutex::new(None),
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(
        core: AppenderCore,
        params: &HashMap<String, String>,
    ) -> Result<Self, DispatcherError> {
        let config = FileAppenderConfig::from_params(core.name(), params)?;
        Ok(Self::new(core, config))
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Flush buffered output
    pub fn flush(&self) -> std::io::Result<()> {
        match self.lock().as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn open(&self) -> std::io::Result<BufWriter<File>> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.config.append)
            .truncate(!self.config.append)
            .open(&self.config.path)?;
        Ok(BufWriter::new(file))
    }

    fn lock(&self) -> MutexGuard<'_, Option<BufWriter<File>>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Appender for FileAppender {
    delegate_appender_core!();

    fn append(&self, event: &LogEvent) -> Result<(), AppendError> {
        let mut guard = self.lock();
        let Some(writer) = guard.as_mut() else {
            return Err(AppenderLoggingError::for_appender(
                self.core.name(),
                format!("file appender '{}' is closed", self.core.name()),
                None,
            )
            .into());
        };
        serde_json::to_writer(&mut *writer, event).map_err(AppendError::other)?;
        writer.write_all(b"\n")?;
        if self.config.immediate_flush {
            writer.flush()?;
        }
        Ok(())
    }

    #[instrument(name = "file_appender_start", skip(self), fields(sink = %self.core.name()))]
    fn start(&self) -> Result<(), AppendError> {
        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        if self.core.mark_started() {
            debug!(path = %self.config.path.display(), "FileAppender started");
        }
        Ok(())
    }

    #[instrument(name = "file_appender_stop", skip(self), fields(sink = %self.core.name()))]
    fn stop(&self) {
        self.core.mark_stopped();
        if let Some(mut writer) = self.lock().take() {
            if let Err(e) = writer.flush() {
                error!(error = %e, "Flush failed on stop");
            }
        }
        debug!("FileAppender stopped");
    }
}
