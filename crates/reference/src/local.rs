//! Local snapshot cache access

use crate::error::ReferenceError;
use std::path::Path;

pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

pub async fn read(path: &Path) -> Result<String, ReferenceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReferenceError::io(path, e))
}

/// Write the snapshot, creating parent directories as needed.
pub async fn write(path: &Path, contents: &str) -> Result<(), ReferenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ReferenceError::io(parent, e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ReferenceError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wallets.txt");
        assert!(!exists(&path).await);
        write(&path, "1111a,1\n").await.unwrap();
        assert!(exists(&path).await);
        assert_eq!(read(&path).await.unwrap(), "1111a,1\n");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("absent.txt")).await.unwrap_err();
        assert!(matches!(err, ReferenceError::Io { .. }));
    }
}
