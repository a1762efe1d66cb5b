//! src/utils/fs.rs

use std::path::{Path, PathBuf};
use tokio::fs;
use crate::Error;

/// Replaces `path` with `contents` by writing a sibling temp file and
/// renaming it over the target, so readers never see a half-written file.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let temp = temp_path_for(path);
    fs::write(&temp, contents).await?;
    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(Error::Io(e));
    }
    Ok(())
}

/// Reads a file, mapping "does not exist" to `None`.
pub async fn read_optional(path: &Path) -> Result<Option<String>, Error> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Io(e)),
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_creates_parent_and_replaces() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("file.yml");

        write_atomic(&path, "one").await?;
        write_atomic(&path, "two").await?;

        assert_eq!(read_optional(&path).await?, Some("two".to_string()));
        assert!(!temp_path_for(&path).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_optional_missing_file() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        assert_eq!(read_optional(&dir.path().join("nope.yml")).await?, None);
        Ok(())
    }
}
