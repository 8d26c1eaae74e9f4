//! Config file loading boundary.
//!
//! The core itself never touches storage; this module is the one place
//! where a filename becomes a document string. Files are capped at the size
//! of the boot-time payload buffer, and every I/O failure is mapped to a
//! stable error before it reaches the caller.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Largest accepted config file, matching the boot-time payload buffer.
pub const MAX_CONFIG_FILE_LEN: u64 = 3 * 1024;

/// Failures while loading a config file from storage.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("config file '{path}' could not be found")]
    FileNotFound {
        /// Path of the missing file.
        path: String,
    },

    /// A directory on the way to the file does not exist.
    #[error("path to config file '{path}' could not be found")]
    PathNotFound {
        /// Path with the missing directory.
        path: String,
    },

    /// The file name is not usable on this storage medium.
    #[error("config file name '{path}' is not valid")]
    InvalidName {
        /// The offending path.
        path: String,
    },

    /// The file exceeds [`MAX_CONFIG_FILE_LEN`].
    #[error("config file '{path}' is too large: {len} bytes (limit {MAX_CONFIG_FILE_LEN})")]
    FileTooLarge {
        /// Path of the oversized file.
        path: String,
        /// Actual file length in bytes.
        len: u64,
    },

    /// Any other read failure.
    #[error("config file '{path}' could not be read: {source}")]
    Io {
        /// Path of the unreadable file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Reads a config file of at most [`MAX_CONFIG_FILE_LEN`] bytes.
pub fn load_config_file(path: &Path) -> Result<String, LoadError> {
    let shown = path.display().to_string();

    if path.as_os_str().is_empty() {
        return Err(LoadError::InvalidName { path: shown });
    }

    let metadata = fs::metadata(path).map_err(|source| classify(source, path, &shown))?;
    if metadata.len() > MAX_CONFIG_FILE_LEN {
        return Err(LoadError::FileTooLarge { path: shown, len: metadata.len() });
    }

    let bytes = fs::read(path).map_err(|source| classify(source, path, &shown))?;
    String::from_utf8(bytes).map_err(|source| LoadError::Io {
        path: shown,
        source: io::Error::new(io::ErrorKind::InvalidData, source),
    })
}

fn classify(source: io::Error, path: &Path, shown: &str) -> LoadError {
    match source.kind() {
        io::ErrorKind::NotFound => {
            // Distinguish a missing file from a missing directory.
            let parent_exists = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .is_none_or(Path::exists);
            if parent_exists {
                LoadError::FileNotFound { path: shown.to_owned() }
            } else {
                LoadError::PathNotFound { path: shown.to_owned() }
            }
        }
        io::ErrorKind::InvalidInput => LoadError::InvalidName { path: shown.to_owned() },
        _ => LoadError::Io { path: shown.to_owned(), source },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_load_small_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.xml");
        fs::write(&path, "<aether></aether>").unwrap();
        assert_eq!(load_config_file(&path).unwrap(), "<aether></aether>");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xml");
        assert!(matches!(
            load_config_file(&path),
            Err(LoadError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("config.xml");
        assert!(matches!(
            load_config_file(&path),
            Err(LoadError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_path_is_invalid() {
        assert!(matches!(
            load_config_file(Path::new("")),
            Err(LoadError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.xml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&vec![b'x'; MAX_CONFIG_FILE_LEN as usize + 1]).unwrap();
        drop(file);

        match load_config_file(&path) {
            Err(LoadError::FileTooLarge { len, .. }) => {
                assert_eq!(len, MAX_CONFIG_FILE_LEN + 1);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xml");
        let message = load_config_file(&path).unwrap_err().to_string();
        assert!(message.contains("absent.xml"));
        assert!(message.contains("could not be found"));
    }

    #[test]
    fn test_file_at_exact_limit_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exact.xml");
        fs::write(&path, vec![b'y'; MAX_CONFIG_FILE_LEN as usize]).unwrap();
        assert_eq!(
            load_config_file(&path).unwrap().len() as u64,
            MAX_CONFIG_FILE_LEN
        );
    }
}
