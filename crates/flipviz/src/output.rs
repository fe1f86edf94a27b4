//! Staged artifact writes.
//!
//! Renderers draw into a temporary file next to the target and only rename
//! it into place once the artifact is complete. A failed render drops the
//! staging file, so nothing half-written is left under the target name.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempPath;

#[derive(Debug)]
pub struct StagedOutput {
    temp: TempPath,
    target: PathBuf,
}

impl StagedOutput {
    /// Reserve a staging file for `target`, keeping its extension so that
    /// backends which pick the encoding from the file name still work.
    pub fn new<P: AsRef<Path>>(target: P) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let suffix = target
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let temp = tempfile::Builder::new()
            .prefix(".flipviz-")
            .suffix(&suffix)
            .tempfile_in(&dir)
            .with_context(|| format!("Failed to create staging file in {}", dir.display()))?
            .into_temp_path();

        Ok(Self { temp, target })
    }

    /// Where the renderer should write.
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the finished artifact over the target path.
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        self.temp
            .persist(&target)
            .with_context(|| format!("Failed to write output: {}", target.display()))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("figure.png");
        let staged = StagedOutput::new(&target).unwrap();
        assert_eq!(staged.path().extension().unwrap(), "png");
        fs::write(staged.path(), b"done").unwrap();
        let written = staged.commit().unwrap();
        assert_eq!(written, target);
        assert_eq!(fs::read(&target).unwrap(), b"done");
    }

    #[test]
    fn test_dropped_stage_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("anim.gif");
        {
            let staged = StagedOutput::new(&target).unwrap();
            fs::write(staged.path(), b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/report.html");
        let staged = StagedOutput::new(&target).unwrap();
        fs::write(staged.path(), "<html></html>").unwrap();
        staged.commit().unwrap();
        assert!(target.is_file());
    }
}
