//! Fetch tool accounts.
//!
//! Accounts are stored in configuration with their passwords obfuscated: the
//! password bytes are XORed against a repeating key and base64 encoded. The
//! store decodes them once at construction and hands out the decoded list in
//! configuration order, which is also the order acquisition tries them in.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tracing::debug;

use crate::config::{AccountEntry, AccountsConfig};

/// Reasons a stored account could not be decoded.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("account has an empty username")]
    MissingUsername,

    #[error("password is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("decoded password is not valid UTF-8")]
    InvalidUtf8,

    #[error("decoded password is empty")]
    EmptySecret,
}

/// A decoded username/secret pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    secret: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// XOR `data` against the repeating `key`.
fn xor_with_key(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}

/// Decode a single stored account.
pub fn decode_entry(entry: &AccountEntry, key: &[u8]) -> Result<Credential, CredentialError> {
    if entry.username.trim().is_empty() {
        return Err(CredentialError::MissingUsername);
    }

    let obfuscated = STANDARD.decode(entry.password.trim())?;
    let secret =
        String::from_utf8(xor_with_key(&obfuscated, key)).map_err(|_| CredentialError::InvalidUtf8)?;
    if secret.is_empty() {
        return Err(CredentialError::EmptySecret);
    }

    Ok(Credential::new(entry.username.clone(), secret))
}

/// Obfuscate a secret the way stored accounts expect it.
///
/// Only used to produce configuration entries; the store itself never
/// re-encodes what it decoded.
pub fn encode_secret(secret: &str, key: &[u8]) -> String {
    STANDARD.encode(xor_with_key(secret.as_bytes(), key))
}

/// Read-only list of decoded accounts.
#[derive(Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    /// Decode every configured account, skipping malformed ones.
    pub fn from_config(config: &AccountsConfig) -> Self {
        let key = config.key.as_bytes();
        let credentials = config
            .entries
            .iter()
            .filter_map(|entry| match decode_entry(entry, key) {
                Ok(credential) => Some(credential),
                Err(e) => {
                    debug!(username = %entry.username, "Skipping account: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Decoded {} of {} configured accounts",
            credentials.len(),
            config.entries.len()
        );

        Self { credentials }
    }

    /// Build a store from already decoded credentials.
    pub fn from_credentials(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// All decoded credentials in retry priority order.
    pub fn decode_all(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("credentials", &self.credentials.len())
            .finish()
    }
}
