//! File-backed save slot.
//!
//! Layout inside the store directory:
//! ```text
//! game_save.json          - current save, JSON or zstd-compressed JSON
//! game_save_backup.json   - the save that `game_save.json` replaced
//! ```
//!
//! Compression is detected from the zstd frame magic on load, so a store
//! opened without compression still reads compressed files.

use crate::save::SaveGame;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SAVE_FILE: &str = "game_save.json";
pub const BACKUP_FILE: &str = "game_save_backup.json";

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("no save found")]
    NoSave,
}

/// Where a loaded save came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveSource {
    Primary,
    Backup,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub save: SaveGame,
    pub source: SaveSource,
}

/// A single save slot with one level of backup.
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
    compress: bool,
}

impl SaveStore {
    /// Open or create a store directory. Writes are plain JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            compress: false,
        })
    }

    /// Compress future writes with zstd.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn save_path(&self) -> PathBuf {
        self.root.join(SAVE_FILE)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.root.join(BACKUP_FILE)
    }

    pub fn has_save(&self) -> bool {
        self.save_path().exists()
    }

    pub fn has_backup(&self) -> bool {
        self.backup_path().exists()
    }

    fn tmp_path(&self) -> PathBuf {
        self.root.join(format!("{SAVE_FILE}.tmp"))
    }

    /// Write `save`, first copying any existing save to the backup slot.
    ///
    /// The new file is written next to the target and renamed into place,
    /// so a failed write leaves the previous save readable and no temp file
    /// behind.
    pub fn save(&self, save: &SaveGame) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(save)?;
        let bytes = if self.compress {
            zstd_compress(&json)?
        } else {
            json
        };

        let target = self.save_path();
        if target.is_file() {
            fs::copy(&target, self.backup_path())?;
        }
        let tmp = self.tmp_path();
        if let Err(e) = write_and_rename(&tmp, &target, &bytes) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::trace!(error = %cleanup, "no temp file to remove");
            }
            return Err(e.into());
        }

        tracing::debug!(
            path = %target.display(),
            bytes = bytes.len(),
            compressed = self.compress,
            "game saved"
        );
        Ok(())
    }

    /// Load and verify the current save, falling back to the backup when
    /// the current one is unreadable or fails verification.
    ///
    /// When both fail, the primary's error is returned.
    pub fn load(&self) -> Result<Loaded, StoreError> {
        let primary = match read_verified(&self.save_path()) {
            Ok(save) => {
                return Ok(Loaded {
                    save,
                    source: SaveSource::Primary,
                });
            }
            Err(e) => e,
        };
        if !self.has_backup() {
            return Err(primary);
        }
        tracing::warn!(error = %primary, "save unreadable, trying backup");
        match read_verified(&self.backup_path()) {
            Ok(save) => Ok(Loaded {
                save,
                source: SaveSource::Backup,
            }),
            Err(backup) => {
                tracing::warn!(error = %backup, "backup unreadable too");
                Err(primary)
            }
        }
    }

    /// Copy the backup over the current save.
    pub fn restore_backup(&self) -> Result<(), StoreError> {
        if !self.has_backup() {
            return Err(StoreError::NoSave);
        }
        read_verified(&self.backup_path())?;
        fs::copy(self.backup_path(), self.save_path())?;
        Ok(())
    }

    /// Remove the save and its backup. Missing files are not an error.
    pub fn delete(&self) -> Result<(), StoreError> {
        for path in [self.save_path(), self.backup_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn write_and_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, target)
}

fn read_verified(path: &Path) -> Result<SaveGame, StoreError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::NoSave),
        Err(e) => return Err(e.into()),
    };
    let json = if raw.starts_with(&ZSTD_MAGIC) {
        zstd_decompress(&raw)?
    } else {
        raw
    };
    let save: SaveGame = serde_json::from_slice(&json)?;
    save.verify()?;
    Ok(save)
}

fn zstd_compress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn zstd_decompress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    let mut decoder = zstd::Decoder::new(data)?;
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
