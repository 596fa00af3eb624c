//! In-memory emitter for testing and dry runs.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use projforge_core::application::ports::Emitter;

/// In-memory emitter for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryEmitter {
    inner: Arc<RwLock<MemoryEmitterInner>>,
}

#[derive(Debug, Default)]
struct MemoryEmitterInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryEmitter {
    /// Create a new empty memory emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file before a run (testing helper).
    pub fn seed_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let mut inner = self.inner.write().unwrap();
        inner.files.insert(path.into(), content.into());
    }

    /// Read a file's content (testing helper).
    pub fn file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted for stable assertions.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        let mut files: Vec<PathBuf> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.files.clear();
        inner.directories.clear();
    }
}

impl Emitter for MemoryEmitter {
    fn create_dir_all(&self, path: &Path) -> projforge_core::error::ForgeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| projforge_core::application::ApplicationError::EmitterLockPoisoned)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> projforge_core::error::ForgeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| projforge_core::application::ApplicationError::EmitterLockPoisoned)?;

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> projforge_core::error::ForgeResult<Option<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| projforge_core::application::ApplicationError::EmitterLockPoisoned)?;
        Ok(inner.files.get(path).cloned())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_files_are_visible_through_the_port() {
        let emitter = MemoryEmitter::new();
        emitter.seed_file("/out/package.json", "{}");
        assert_eq!(
            emitter.read_file(Path::new("/out/package.json")).unwrap(),
            Some("{}".to_string())
        );
    }

    #[test]
    fn create_dir_all_registers_every_ancestor() {
        let emitter = MemoryEmitter::new();
        emitter.create_dir_all(Path::new("/a/b/c")).unwrap();
        assert!(emitter.exists(Path::new("/a")));
        assert!(emitter.exists(Path::new("/a/b")));
        assert!(emitter.exists(Path::new("/a/b/c")));
    }

    #[test]
    fn list_files_is_sorted() {
        let emitter = MemoryEmitter::new();
        emitter.seed_file("/z.txt", "z");
        emitter.seed_file("/a.txt", "a");
        assert_eq!(
            emitter.list_files(),
            vec![PathBuf::from("/a.txt"), PathBuf::from("/z.txt")]
        );
    }
}
