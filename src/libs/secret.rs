//! Encrypted persistence of the signed-in session.
//!
//! The session is kept between invocations so that `todoer list` does not
//! ask for a password every time. It is serialized to JSON, encrypted with
//! AES-256-CBC and stored base64 encoded in the application data directory.
//! Key and IV are embedded at build time (see `build.rs`).

use super::data_storage::DataStorage;
use super::session::Session;
use aes::Aes256;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Include generated metadata with encryption keys
include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

pub const SESSION_FILE: &str = ".session";

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("session file is not accessible: {0}")]
    Io(#[from] io::Error),

    #[error("session file is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("session could not be decrypted")]
    Cipher,

    #[error("stored session is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct SessionVault {
    path: PathBuf,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl Default for SessionVault {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionVault {
    /// Vault in the platform data directory.
    pub fn new() -> Self {
        let path = DataStorage::new()
            .get_path(SESSION_FILE)
            .unwrap_or_else(|_| PathBuf::from(SESSION_FILE));
        Self::at(path)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: APP_METADATA_ENCRYPTION_KEY.to_vec(),
            iv: APP_METADATA_ENCRYPTION_IV.to_vec(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cipher(&self) -> Result<Aes256Cbc, VaultError> {
        Aes256Cbc::new_from_slices(&self.key, &self.iv).map_err(|_| VaultError::Cipher)
    }

    pub fn store(&self, session: &Session) -> Result<(), VaultError> {
        let plaintext = serde_json::to_vec(session)?;
        let ciphertext = self.cipher()?.encrypt_vec(&plaintext);
        let encoded = BASE64_STANDARD.encode(&ciphertext);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&self.path)?;
        file.write_all(encoded.as_bytes())?;
        Ok(())
    }

    /// The stored session, `None` when nothing was stored.
    pub fn load(&self) -> Result<Option<Session>, VaultError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut encoded = String::new();
        file.read_to_string(&mut encoded)?;
        let ciphertext = BASE64_STANDARD.decode(encoded.trim())?;
        let plaintext = self.cipher()?.decrypt_vec(&ciphertext).map_err(|_| VaultError::Cipher)?;
        Ok(Some(serde_json::from_slice(&plaintext)?))
    }

    /// Removes the stored session. Clearing an empty vault is not an error.
    pub fn clear(&self) -> Result<(), VaultError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
