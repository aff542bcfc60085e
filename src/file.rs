use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ConfigError;

/// Read a config file. Returns None when the file does not exist.
pub fn read(path: &Path) -> Result<Option<Vec<u8>>, ConfigError> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("config file {:?} does not exist", path);
            Ok(None)
        }
        Err(e) => Err(io_error(path, e)),
    }
}

/// Write `data` to `path`, creating missing parent directories.
///
/// The bytes go to a temporary file in the target directory which is then
/// renamed over `path`, so readers see either the old or the new file.
/// Permissions of an existing file are carried over.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    tmp.write_all(data).map_err(|e| io_error(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| io_error(tmp.path(), e))?;

    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(|e| io_error(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    debug!("wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::Io(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read(&dir.path().join("absent.cfg")).unwrap().is_none());
    }

    #[test]
    fn write_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("c").join("test.cfg");
        write_atomic(&path, b"Key: Value\n").unwrap();
        assert_eq!(read(&path).unwrap().unwrap(), b"Key: Value\n");
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.cfg");
        fs::write(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let err = write_atomic(&blocker.join("test.cfg"), b"x").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
