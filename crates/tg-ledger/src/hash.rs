//! Ledger hashing primitives
//!
//! Provides [`LedgerHash`], a strongly-typed 32-byte SHA-256 digest,
//! [`ChainLink`], the `prevHash` slot of an entry (the genesis sentinel or the
//! hash of the preceding entry), and [`StoredHash`], an entry's own `hash`.
//!
//! Both slots are read leniently from untrusted input: text that is not a
//! digest is kept as `Malformed` so verification can report it at its index.

use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Sentinel stored as `prevHash` of the first entry
pub const GENESIS_SENTINEL: &str = "0";

/// A 32-byte SHA-256 digest
///
/// Displays and serializes as 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerHash([u8; 32]);

impl LedgerHash {
    /// Create from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create hash from byte slice
    ///
    /// # Errors
    /// Returns error if slice length is not exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| HashError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// SHA-256 of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

/// SHA-256 of arbitrary data
#[inline]
#[must_use]
pub fn compute_hash(data: &[u8]) -> LedgerHash {
    LedgerHash::compute(data)
}

impl Display for LedgerHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for LedgerHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for LedgerHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for LedgerHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The `prevHash` slot of a ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ChainLink {
    /// First entry: no predecessor
    #[default]
    Genesis,
    /// Hash of the preceding entry
    Entry(LedgerHash),
    /// Text read from an export that is neither sentinel nor digest
    Malformed(String),
}

impl ChainLink {
    /// Parse untrusted text, keeping anything unparseable as [`ChainLink::Malformed`]
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Self::Malformed(s.to_string()))
    }

    /// Is this the genesis sentinel
    #[inline]
    #[must_use]
    pub const fn is_genesis(&self) -> bool {
        matches!(self, Self::Genesis)
    }

    #[inline]
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// The linked hash, unless genesis or malformed
    #[inline]
    #[must_use]
    pub const fn hash(&self) -> Option<&LedgerHash> {
        match self {
            Self::Entry(h) => Some(h),
            Self::Genesis | Self::Malformed(_) => None,
        }
    }
}

impl From<LedgerHash> for ChainLink {
    fn from(hash: LedgerHash) -> Self {
        Self::Entry(hash)
    }
}

impl Display for ChainLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genesis => f.write_str(GENESIS_SENTINEL),
            Self::Entry(h) => Display::fmt(h, f),
            Self::Malformed(text) => f.write_str(text),
        }
    }
}

impl FromStr for ChainLink {
    type Err = HashError;

    /// `"0"` and `""` both denote genesis
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == GENESIS_SENTINEL {
            Ok(Self::Genesis)
        } else {
            s.parse().map(Self::Entry)
        }
    }
}

impl serde::Serialize for ChainLink {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ChainLink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&s))
    }
}

/// The `hash` slot of a ledger entry
///
/// Entries built by this crate always hold a [`StoredHash::Digest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoredHash {
    Digest(LedgerHash),
    /// Text read from an export that is not a digest
    Malformed(String),
}

impl StoredHash {
    /// Parse untrusted text, keeping anything unparseable as [`StoredHash::Malformed`]
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.parse()
            .map_or_else(|_| Self::Malformed(s.to_string()), Self::Digest)
    }

    /// The digest, unless malformed
    #[inline]
    #[must_use]
    pub const fn digest(&self) -> Option<&LedgerHash> {
        match self {
            Self::Digest(h) => Some(h),
            Self::Malformed(_) => None,
        }
    }

    /// The `prevHash` a successor of this entry must carry
    #[must_use]
    pub fn link(&self) -> ChainLink {
        match self {
            Self::Digest(h) => ChainLink::Entry(*h),
            Self::Malformed(text) => ChainLink::Malformed(text.clone()),
        }
    }

    /// Short string representation for logs
    #[must_use]
    pub fn short(&self) -> String {
        match self {
            Self::Digest(h) => h.short(),
            Self::Malformed(text) => text.chars().take(16).collect(),
        }
    }
}

impl From<LedgerHash> for StoredHash {
    fn from(hash: LedgerHash) -> Self {
        Self::Digest(hash)
    }
}

impl PartialEq<LedgerHash> for StoredHash {
    fn eq(&self, other: &LedgerHash) -> bool {
        self.digest() == Some(other)
    }
}

impl Display for StoredHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(h) => Display::fmt(h, f),
            Self::Malformed(text) => f.write_str(text),
        }
    }
}

impl serde::Serialize for StoredHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for StoredHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&s))
    }
}

/// Errors that can occur when parsing ledger hashes
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Invalid hash length
    #[error("invalid hash length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
