use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory-backed request queue: the presence of a file is a pending
/// request (its name is the payload, e.g. a symbol), and completing the
/// request deletes the file.
///
/// The filesystem stays the literal queue medium so an operator can inspect
/// or inject requests with `ls` and `touch`. Consumers only see the
/// list-pending / mark-complete contract, so an in-memory channel could
/// stand in behind the same interface.
#[derive(Debug, Clone)]
pub struct TriggerQueue {
    dir: PathBuf,
}

impl TriggerQueue {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Pending request names, sorted for deterministic processing order.
    /// A missing queue directory means "no requests", not an error.
    /// Subdirectories and dotfiles are ignored.
    pub fn pending(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("scan queue {}", self.dir.display()))
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("scan queue {}", self.dir.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || entry.path().is_dir() {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Mark a request complete by removing its trigger file. Removing an
    /// already-gone request is fine (another completion path won the race).
    pub fn complete(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("remove trigger {} from {}", name, self.dir.display())
            }),
        }
    }
}
