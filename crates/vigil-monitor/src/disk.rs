//! Disk-backed storage resource for the monitor binary

use std::fs;
use std::path::{Component, Path, PathBuf};
use vigil_core::{Error, Result, Storage};

/// A [`Storage`] over a local directory
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        // probe paths must stay inside the storage root
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes {
            return Err(Error::Configuration(format!(
                "storage path '{path}' must be relative to the storage root"
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for DiskStorage {
    fn write(&self, path: &str, contents: &[u8]) -> Result<()> {
        let path = self.resolve(path)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.resolve(path)?)?)
    }

    fn delete(&self, path: &str) -> Result<()> {
        fs::remove_file(self.resolve(path)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path());

        storage.write("monitor.txt", b"test").unwrap();
        assert_eq!(storage.read("monitor.txt").unwrap(), b"test");
        storage.delete("monitor.txt").unwrap();
        assert!(storage.read("monitor.txt").is_err());
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path());
        assert!(storage.read("absent.txt").is_err());
    }

    #[test]
    fn test_escaping_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path());

        assert!(storage.write("../escape.txt", b"x").is_err());
        assert!(storage.read("/etc/passwd").is_err());
    }
}
