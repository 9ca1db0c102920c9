//! Per-rotation result files written next to the source file.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Prefix shared by every result file name.
const RESULT_PREFIX: &str = "result";

/// Path of the result file that collects bytes captured while `rotation` is current.
///
/// The file sits in the source's directory and is named
/// `result_<rotation>_<source file name>`.
pub fn sink_path(source: &Path, rotation: u64) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| Error::InvalidPath {
        message: format!("{} has no file name", source.display()),
    })?;

    let mut name = OsString::from(format!("{RESULT_PREFIX}_{rotation}_"));
    name.push(file_name);

    Ok(source.with_file_name(name))
}

/// Append `bytes` to the result file at `path`, creating it on first use.
///
/// The handle is opened, written, flushed and closed within this call.
pub(crate) async fn append_to_sink(path: &Path, bytes: &[u8]) -> Result<()> {
    let to_sink_error = |source| Error::Sink {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(to_sink_error)?;

    file.write_all(bytes).await.map_err(to_sink_error)?;
    file.flush().await.map_err(to_sink_error)?;

    Ok(())
}
