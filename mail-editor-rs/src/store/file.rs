//! Filesystem template store
//!
//! Templates live as plain files under a configured search path. Writes are
//! whole-file overwrites with no locking; concurrent editors of the same
//! file race and the last writer wins.

use crate::error::{EditorError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct FileStore {
    dirs: Vec<PathBuf>,
}

impl FileStore {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The template search path, in resolution order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve a template name against the search path; first hit wins.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        crate::render::resolve_path(&self.dirs, name)
            .ok_or_else(|| EditorError::NotFound(name.to_string()))
    }

    /// Read the template source verbatim.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        Ok(fs::read_to_string(path)?)
    }

    /// Overwrite the resolved template file in place.
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.resolve(name)?;
        fs::write(&path, content)?;
        info!("Updated template file: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_template(content: &str) -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("welcome.html"), content).unwrap();
        let store = FileStore::new(vec![dir.path().to_path_buf()]);
        (dir, store)
    }

    #[test]
    fn test_read_verbatim() {
        let (_dir, store) = store_with_template("<p>Hi</p>\n");
        assert_eq!(store.read("welcome.html").unwrap(), "<p>Hi</p>\n");
    }

    #[test]
    fn test_write_overwrites_in_place() {
        let (_dir, store) = store_with_template("old");
        store.write("welcome.html", "new").unwrap();
        assert_eq!(store.read("welcome.html").unwrap(), "new");
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let (_dir, store) = store_with_template("x");
        let err = store.resolve("absent.html").unwrap_err();
        assert!(matches!(err, EditorError::NotFound(name) if name == "absent.html"));
    }
}
