//! JSON-lines approval history.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clawnode_common::ExecApprovalHistoryEntry;
use tracing::warn;

use crate::application::ports::ApprovalHistoryLog;
use crate::infra::paths::ensure_parent;

/// One JSON document per line, appended in decision order.
#[derive(Debug, Clone)]
pub struct JsonlApprovalHistory {
    path: PathBuf,
}

impl JsonlApprovalHistory {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ApprovalHistoryLog for JsonlApprovalHistory {
    fn append(&self, entry: &ExecApprovalHistoryEntry) -> Result<()> {
        ensure_parent(&self.path)?;
        let mut line = serde_json::to_string(entry).context("cannot serialize history entry")?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("cannot write {}", self.path.display()))
    }

    fn read_recent(&self, max_entries: usize) -> Result<Vec<ExecApprovalHistoryEntry>> {
        if max_entries == 0 || !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;

        let mut entries: Vec<ExecApprovalHistoryEntry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(line = n + 1, error = %e, "skipping malformed approval history line");
                    None
                }
            })
            .collect();
        let start = entries.len().saturating_sub(max_entries);
        Ok(entries.split_off(start))
    }
}

/// In-memory history, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryApprovalHistory {
    entries: Mutex<Vec<ExecApprovalHistoryEntry>>,
}

impl InMemoryApprovalHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<ExecApprovalHistoryEntry> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ApprovalHistoryLog for InMemoryApprovalHistory {
    fn append(&self, entry: &ExecApprovalHistoryEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }

    fn read_recent(&self, max_entries: usize) -> Result<Vec<ExecApprovalHistoryEntry>> {
        let entries = self.entries();
        let start = entries.len().saturating_sub(max_entries);
        Ok(entries[start..].to_vec())
    }
}
