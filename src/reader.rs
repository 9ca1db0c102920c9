//! Offset-tracked reads of the source file.

use crate::error::{Error, Result};
use std::io::SeekFrom;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::time::Instant;

/// Outcome of a single read. Lives for one poll iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PollResult {
    /// Bytes between the requested offset and end-of-file.
    pub bytes: Vec<u8>,
    /// Cursor position after the read.
    pub end_offset: u64,
    /// Length of the file on disk when it was opened.
    pub file_len: u64,
    /// Time spent reading.
    pub elapsed: Duration,
}

impl PollResult {
    /// Whether the read observed anything past `offset`.
    pub(crate) fn has_new_bytes(&self, offset: u64) -> bool {
        self.end_offset != offset
    }
}

/// Read everything from `offset` (absolute, from file start) to the current end of file.
///
/// A fresh handle is opened on every call. Reading from an offset at or past
/// end-of-file returns no bytes and leaves the offset where it was.
pub(crate) async fn read_from_offset(path: &Path, offset: u64) -> Result<PollResult> {
    let mut file = File::open(path).await.map_err(|source| Error::OpenSource {
        path: path.to_path_buf(),
        source,
    })?;

    let file_len = file
        .metadata()
        .await
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    file.seek(SeekFrom::Start(offset))
        .await
        .map_err(|source| Error::Seek {
            path: path.to_path_buf(),
            offset,
            source,
        })?;

    let started = Instant::now();
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .await
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let elapsed = started.elapsed();

    let end_offset = file
        .stream_position()
        .await
        .map_err(|source| Error::Seek {
            path: path.to_path_buf(),
            offset,
            source,
        })?;

    Ok(PollResult {
        bytes,
        end_offset,
        file_len,
        elapsed,
    })
}

/// Detect if the file was truncated by comparing its current length with the tracked offset.
pub(crate) fn detect_file_truncation(file_len: u64, offset: u64) -> bool {
    file_len < offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TempLogFile;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_read_whole_file_from_zero() {
        let temp = TempLogFile::with_bytes(b"first line\nsecond line\n").unwrap();

        let result = read_from_offset(temp.path(), 0)
            .await
            .expect("Should read file successfully");

        assert_eq!(result.bytes, b"first line\nsecond line\n");
        assert_eq!(result.end_offset, 23);
        assert_eq!(result.file_len, 23);
        assert!(result.has_new_bytes(0));
    }

    #[tokio::test]
    async fn test_incremental_reading_skips_consumed_prefix() {
        let temp = TempLogFile::with_bytes(b"0123456789").unwrap();

        let first = read_from_offset(temp.path(), 0).await.unwrap();
        assert_eq!(first.end_offset, 10);

        temp.append_bytes(b"abcdef").unwrap();

        let second = read_from_offset(temp.path(), first.end_offset)
            .await
            .unwrap();
        assert_eq!(second.bytes, b"abcdef");
        assert_eq!(second.end_offset, 16);
    }

    #[tokio::test]
    async fn test_offset_is_absolute_across_calls() {
        let temp = TempLogFile::with_bytes(b"abcdefghij").unwrap();

        // Same offset twice must yield the same bytes, not drift forward.
        let a = read_from_offset(temp.path(), 4).await.unwrap();
        let b = read_from_offset(temp.path(), 4).await.unwrap();

        assert_eq!(a.bytes, b"efghij");
        assert_eq!(a, PollResult { elapsed: a.elapsed, ..b });
    }

    #[tokio::test]
    async fn test_no_new_content_when_offset_at_end() {
        let temp = TempLogFile::with_bytes(b"already seen").unwrap();

        let result = read_from_offset(temp.path(), 12).await.unwrap();

        assert!(result.bytes.is_empty());
        assert_eq!(result.end_offset, 12);
        assert!(!result.has_new_bytes(12));
    }

    #[tokio::test]
    async fn test_offset_past_end_after_truncation() {
        let temp = TempLogFile::with_bytes(b"short").unwrap();

        let result = read_from_offset(temp.path(), 1000).await.unwrap();

        assert!(result.bytes.is_empty());
        assert_eq!(result.end_offset, 1000);
        assert_eq!(result.file_len, 5);
        assert!(detect_file_truncation(result.file_len, 1000));
    }

    #[tokio::test]
    async fn test_empty_file() {
        let temp = TempLogFile::new().unwrap();

        let result = read_from_offset(temp.path(), 0).await.unwrap();

        assert!(result.bytes.is_empty());
        assert_eq!(result.end_offset, 0);
        assert!(!result.has_new_bytes(0));
    }

    #[tokio::test]
    async fn test_binary_content_is_preserved() {
        let content = [0u8, 159, 146, 150, b'\n', 0xff, 0x00];
        let temp = TempLogFile::with_bytes(&content).unwrap();

        let result = read_from_offset(temp.path(), 0).await.unwrap();

        assert_eq!(result.bytes, content);
    }

    #[tokio::test]
    async fn test_large_file_reading() {
        let mut content = Vec::new();
        for i in 0..1000 {
            content.extend_from_slice(format!("Line number {}\n", i).as_bytes());
        }
        let temp = TempLogFile::with_bytes(&content).unwrap();

        let result = read_from_offset(temp.path(), 0).await.unwrap();

        assert_eq!(result.bytes.len(), content.len());
        assert_eq!(result.end_offset, content.len() as u64);
    }

    #[tokio::test]
    async fn test_nonexistent_file_is_open_error() {
        let file_path = PathBuf::from("/definitely/not/here/app.log");

        let result = read_from_offset(&file_path, 0).await;

        match result {
            Err(Error::OpenSource { path, .. }) => assert_eq!(path, file_path),
            other => panic!("Expected OpenSource error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_truncation_edge_cases() {
        assert!(!detect_file_truncation(100, 100));
        assert!(!detect_file_truncation(200, 100));
        assert!(detect_file_truncation(100, 200));
        assert!(!detect_file_truncation(0, 0));
        assert!(detect_file_truncation(0, 1));
        assert!(detect_file_truncation(u64::MAX - 1, u64::MAX));
    }
}
