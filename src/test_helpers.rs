//! Test utilities for creating temporary log files and inspecting result files.

#[cfg(test)]
use std::fs::{self, File, OpenOptions};
#[cfg(test)]
use std::io::Write;
#[cfg(test)]
use std::path::{Path, PathBuf};

#[cfg(test)]
pub struct TempLogFile {
    pub path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

#[cfg(test)]
impl TempLogFile {
    /// Create a new empty log file named `app.log` in its own temporary directory
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("app.log");

        File::create(&path)?;

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary log file holding exactly `content`
    pub fn with_bytes(content: &[u8]) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append_bytes(content)?;
        Ok(temp_file)
    }

    /// Append raw bytes, as a log producer would
    pub fn append_bytes(&self, content: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(content)?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file (simulate log rotation)
    pub fn truncate(&self) -> std::io::Result<()> {
        File::create(&self.path)?;
        Ok(())
    }

    /// Delete the file out from under a running session
    pub fn remove(&self) -> std::io::Result<()> {
        fs::remove_file(&self.path)
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the result file written for the given rotation count
    pub fn result_path(&self, rotation: u64) -> PathBuf {
        self._temp_dir
            .path()
            .join(format!("result_{}_app.log", rotation))
    }

    /// Contents of the result file for `rotation`, or `None` if it was never created
    pub fn result_bytes(&self, rotation: u64) -> Option<Vec<u8>> {
        fs::read(self.result_path(rotation)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
        assert_eq!(fs::metadata(temp_file.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_append_bytes() {
        let temp_file = TempLogFile::with_bytes(b"line 1\n").unwrap();
        temp_file.append_bytes(b"line 2\n").unwrap();

        let content = fs::read(temp_file.path()).unwrap();
        assert_eq!(content, b"line 1\nline 2\n");
    }

    #[test]
    fn test_truncate_and_remove() {
        let temp_file = TempLogFile::with_bytes(b"initial content").unwrap();
        temp_file.truncate().unwrap();
        assert!(fs::read(temp_file.path()).unwrap().is_empty());

        temp_file.remove().unwrap();
        assert!(!temp_file.path().exists());
    }

    #[test]
    fn test_result_path_sits_beside_source() {
        let temp_file = TempLogFile::new().unwrap();
        let result = temp_file.result_path(3);

        assert_eq!(result.parent(), temp_file.path().parent());
        assert_eq!(result.file_name().unwrap(), "result_3_app.log");
        assert!(temp_file.result_bytes(3).is_none());
    }
}
