//! Rolling node-activity log file.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read as _, Seek as _, SeekFrom, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ActivityLog;
use crate::infra::paths::ensure_parent;

/// Rotate once the log grows past this size.
pub const MAX_LOG_BYTES: u64 = 1024 * 1024;

/// Appends to `node.log`, keeping a single rotated `node.log.1`.
#[derive(Debug, Clone)]
pub struct RollingActivityLog {
    path: PathBuf,
    max_bytes: u64,
}

impl RollingActivityLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: MAX_LOG_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotated_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".1");
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) -> Result<()> {
        let size = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        if size > self.max_bytes {
            let rotated = self.rotated_path();
            std::fs::rename(&self.path, &rotated)
                .with_context(|| format!("cannot rotate {}", self.path.display()))?;
        }
        Ok(())
    }

    /// The last `lines` lines of the current log, or `None` if there is no log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn tail(&self, lines: usize) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        let all: Vec<&str> = content.lines().collect();
        let start = all.len().saturating_sub(lines);
        Ok(Some(all[start..].iter().map(|l| (*l).to_string()).collect()))
    }

    /// A follower positioned at the current end of the log.
    #[must_use]
    pub fn follow(&self) -> LogFollower {
        LogFollower {
            path: self.path.clone(),
            offset: std::fs::metadata(&self.path).map_or(0, |m| m.len()),
            partial: String::new(),
        }
    }
}

/// Reads lines appended to the log since the last poll.
#[derive(Debug)]
pub struct LogFollower {
    path: PathBuf,
    offset: u64,
    /// Bytes after the last newline, held until the line is complete.
    partial: String,
}

impl LogFollower {
    /// Complete lines written since the previous call. A log that shrank
    /// was rotated and is read again from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the log exists but cannot be read.
    pub fn poll(&mut self) -> Result<Vec<String>> {
        let len = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("cannot read {}", self.path.display()));
            }
        };
        if len < self.offset {
            self.offset = 0;
            self.partial.clear();
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        let mut file =
            File::open(&self.path).with_context(|| format!("cannot open {}", self.path.display()))?;
        file.seek(SeekFrom::Start(self.offset))
            .with_context(|| format!("cannot seek {}", self.path.display()))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        self.offset += buf.len() as u64;
        self.partial.push_str(&String::from_utf8_lossy(&buf));

        let mut lines = Vec::new();
        while let Some(end) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=end).collect();
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        Ok(lines)
    }
}

impl ActivityLog for RollingActivityLog {
    fn append(&self, entry: &str) -> Result<()> {
        ensure_parent(&self.path)?;
        self.rotate_if_needed()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open {}", self.path.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("cannot write {}", self.path.display()))
    }
}
