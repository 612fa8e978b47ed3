use std::io;
use std::path::PathBuf;

use tracing::debug;

/// Durable storage for the single session token.
/// Exactly one value is kept; saving replaces whatever was there.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Stores the token as the sole contents of a file.
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        debug!("Token persisted to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Non-durable storage.
    #[derive(Default)]
    pub struct MemoryTokenStorage {
        token: Mutex<Option<String>>,
    }

    impl MemoryTokenStorage {
        pub fn with_token(token: &str) -> Self {
            Self {
                token: Mutex::new(Some(token.to_string())),
            }
        }
    }

    impl TokenStorage for MemoryTokenStorage {
        fn load(&self) -> io::Result<Option<String>> {
            Ok(self.token.lock().clone())
        }

        fn save(&self, token: &str) -> io::Result<()> {
            *self.token.lock() = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> io::Result<()> {
            *self.token.lock() = None;
            Ok(())
        }
    }
}
