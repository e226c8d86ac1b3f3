//! Session transcript: every accepted command and the raw output of each
//! turn, appended to a plain text file.
//!
//! ```text
//! [2026-10-16T12:00:00Z] INIT > Look
//! [2026-10-16T12:00:00Z] OUT
//! Meadow
//! ...
//! [2026-10-16T12:00:07Z] CMD > take apple
//! ```
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

#[derive(Debug)]
pub(crate) struct TranscriptFile {
    path: PathBuf,
    file: Option<File>,
}

impl TranscriptFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `kind` is `INIT` for a synthesised look command, `CMD` otherwise.
    pub fn command(&mut self, kind: &str, command: &str) -> io::Result<()> {
        let entry = format!("[{}] {} > {}\n", timestamp(), kind, command);
        self.write(&entry)
    }

    pub fn output(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let mut entry = format!("[{}] OUT\n{}", timestamp(), text);
        if !entry.ends_with('\n') {
            entry.push('\n');
        }
        self.write(&entry)
    }

    fn write(&mut self, entry: &str) -> io::Result<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }
        match self.file.as_mut() {
            Some(file) => {
                file.write_all(entry.as_bytes())?;
                file.flush()
            }
            None => Ok(()),
        }
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.log");
        let mut t = TranscriptFile::new(&path);
        t.output("").unwrap();
        assert!(!path.exists());
        t.output("Hall").unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("] OUT\nHall\n"), "{}", text);
    }

    #[test]
    fn unwritable_path_reports_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = TranscriptFile::new(dir.path().join("missing").join("t.log"));
        assert!(t.command("CMD", "look").is_err());
    }
}
