//! Local filesystem emitter using std::fs.

use std::io;
use std::path::Path;

use projforge_core::{application::ports::Emitter, error::ForgeResult};

/// Production emitter implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalEmitter;

impl LocalEmitter {
    /// Create a new local emitter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for LocalEmitter {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> ForgeResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, e, "read file")),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> projforge_core::error::ForgeError {
    use projforge_core::application::ApplicationError;

    ApplicationError::EmitFailed {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
