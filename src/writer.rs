//! Output writer (spec.md §4.F).
//!
//! Each [`Writer`] owns a `tempfile::TempDir` scratch area under the target
//! prefix's parent directory. Generators call [`Writer::new_file`] to open
//! scratch files; nothing is visible at the final prefix until
//! [`Writer::flush`] renames every scratch file into place. A failing flush
//! leaves the target prefix untouched — the scratch directory (and whatever
//! was written into it) is simply dropped.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::CompileError;

/// A single file opened through a [`Writer`]. Writes land in the scratch
/// area; the file's final path (relative to the writer's prefix) is
/// remembered so `flush` knows where to rename it.
pub struct WriteHandle {
    file: File,
    relative_path: PathBuf,
}

impl WriteHandle {
    pub fn write_str(&mut self, contents: &str) -> Result<(), CompileError> {
        self.file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

pub struct Writer {
    prefix: PathBuf,
    scratch: TempDir,
    wipe_before_commit: bool,
    pending: Vec<PathBuf>,
}

impl Writer {
    /// Creates a writer that commits into `prefix`. `wipe_before_commit`
    /// mirrors the CLI's force/wipe flag (spec.md §6): when set, `flush`
    /// removes anything already at `prefix` before renaming scratch files
    /// in.
    pub fn new(prefix: impl Into<PathBuf>, wipe_before_commit: bool) -> Result<Self, CompileError> {
        let prefix = prefix.into();
        let scratch_parent = prefix.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(scratch_parent)?;
        let scratch = TempDir::new_in(scratch_parent)?;
        Ok(Self {
            prefix,
            scratch,
            wipe_before_commit,
            pending: Vec::new(),
        })
    }

    /// Opens a new scratch file at `relative_path` (relative to this
    /// writer's prefix). Intermediate directories are created as needed.
    pub fn new_file(&mut self, relative_path: impl AsRef<Path>) -> Result<WriteHandle, CompileError> {
        let relative_path = relative_path.as_ref().to_path_buf();
        let scratch_path = self.scratch.path().join(&relative_path);
        if let Some(parent) = scratch_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&scratch_path)?;
        self.pending.push(relative_path.clone());
        Ok(WriteHandle {
            file,
            relative_path,
        })
    }

    /// Commits every scratch file to its final location under the prefix.
    /// On success, the writer must not be used again.
    pub fn flush(self) -> Result<(), CompileError> {
        if self.wipe_before_commit && self.prefix.exists() {
            fs::remove_dir_all(&self.prefix)?;
        }
        fs::create_dir_all(&self.prefix)?;
        for relative_path in &self.pending {
            let from = self.scratch.path().join(relative_path);
            let to = self.prefix.join(relative_path);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&from, &to)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_commits_files_to_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let mut writer = Writer::new(&prefix, false).unwrap();
        let mut handle = writer.new_file("a.txt").unwrap();
        handle.write_str("hello").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(prefix.join("a.txt")).unwrap(), "hello");
    }

    #[test]
    fn files_not_visible_before_flush() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let mut writer = Writer::new(&prefix, false).unwrap();
        let mut handle = writer.new_file("a.txt").unwrap();
        handle.write_str("hello").unwrap();
        assert!(!prefix.join("a.txt").exists());
    }

    #[test]
    fn wipe_before_commit_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        fs::create_dir_all(&prefix).unwrap();
        fs::write(prefix.join("stale.txt"), "old").unwrap();

        let mut writer = Writer::new(&prefix, true).unwrap();
        let mut handle = writer.new_file("a.txt").unwrap();
        handle.write_str("new").unwrap();
        writer.flush().unwrap();

        assert!(!prefix.join("stale.txt").exists());
        assert!(prefix.join("a.txt").exists());
    }

    #[test]
    fn two_writers_with_different_prefixes_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer_a = Writer::new(dir.path().join("a"), false).unwrap();
        let mut writer_b = Writer::new(dir.path().join("b"), false).unwrap();
        writer_a.new_file("x.txt").unwrap().write_str("a").unwrap();
        writer_b.new_file("x.txt").unwrap().write_str("b").unwrap();
        writer_a.flush().unwrap();
        writer_b.flush().unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a/x.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.path().join("b/x.txt")).unwrap(), "b");
    }
}
