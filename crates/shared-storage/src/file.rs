use shared_types::{ByteStore, StorageError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// File-backed byte store rooted at a data directory.
///
/// Each key maps to `<root>/<key>`. Full writes are atomic via temp file and
/// rename; `write_at` patches bytes in place, so a power cut during a
/// multi-byte patch can leave part of it unwritten.
pub struct FileByteStore {
    root: PathBuf,
}

impl FileByteStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StorageError::write(&root.display().to_string(), e))?;

        tracing::info!(root = %root.display(), "Opened data directory");
        Ok(Self { root })
    }

    /// Directory holding the files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Staging file for `key`; keeps the full key so `a.json` and `a.bin`
    /// never share one.
    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.tmp"))
    }

    fn map_read_err(key: &str, err: io::Error) -> StorageError {
        if err.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound {
                key: key.to_string(),
            }
        } else {
            StorageError::read(key, err)
        }
    }
}

impl ByteStore for FileByteStore {
    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        fs::read(self.path(key)).map_err(|e| Self::map_read_err(key, e))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path(key);

        // Write atomically via temp file
        let temp_path = self.temp_path(key);
        let mut file = File::create(&temp_path).map_err(|e| StorageError::write(key, e))?;
        file.write_all(bytes).map_err(|e| StorageError::write(key, e))?;
        file.sync_all().map_err(|e| StorageError::write(key, e))?;

        fs::rename(&temp_path, &path).map_err(|e| StorageError::write(key, e))?;
        Ok(())
    }

    fn write_at(&self, key: &str, offset: u64, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path(key);
        let mut file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|e| StorageError::write(key, e))?;

        let len = file
            .metadata()
            .map_err(|e| StorageError::write(key, e))?
            .len();
        if offset + bytes.len() as u64 > len {
            return Err(StorageError::write(
                key,
                format!("patch {}+{} beyond end {}", offset, bytes.len(), len),
            ));
        }

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| StorageError::write(key, e))?;
        file.write_all(bytes).map_err(|e| StorageError::write(key, e))?;
        file.sync_data().map_err(|e| StorageError::write(key, e))?;
        Ok(())
    }

    fn append(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(key))
            .map_err(|e| StorageError::write(key, e))?;
        file.write_all(bytes).map_err(|e| StorageError::write(key, e))?;
        Ok(())
    }

    fn size(&self, key: &str) -> Result<u64, StorageError> {
        fs::metadata(self.path(key))
            .map(|m| m.len())
            .map_err(|e| Self::map_read_err(key, e))
    }
}
