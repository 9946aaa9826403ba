//! Checksum algorithms and hashing helpers.
//!
//! Packagers declare which algorithms their metadata needs (MacPorts wants
//! RMD160 next to SHA-256, for instance). Validation only records the
//! requirement; the digests themselves are computed here.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::Digest;

/// A checksum algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "rmd160")]
    Rmd160,
    #[serde(rename = "sha-1", alias = "sha1")]
    Sha1,
    #[serde(rename = "sha-256", alias = "sha256")]
    Sha256,
    #[serde(rename = "sha-384", alias = "sha384")]
    Sha384,
    #[serde(rename = "sha-512", alias = "sha512")]
    Sha512,
    #[serde(rename = "sha3-224")]
    Sha3_224,
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[serde(rename = "sha3-384")]
    Sha3_384,
    #[serde(rename = "sha3-512")]
    Sha3_512,
}

impl Algorithm {
    /// Every supported algorithm, in a stable order.
    pub const ALL: [Algorithm; 10] = [
        Algorithm::Md5,
        Algorithm::Rmd160,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
    ];

    /// Canonical name, as written in `packwright.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Rmd160 => "rmd160",
            Algorithm::Sha1 => "sha-1",
            Algorithm::Sha256 => "sha-256",
            Algorithm::Sha384 => "sha-384",
            Algorithm::Sha512 => "sha-512",
            Algorithm::Sha3_224 => "sha3-224",
            Algorithm::Sha3_256 => "sha3-256",
            Algorithm::Sha3_384 => "sha3-384",
            Algorithm::Sha3_512 => "sha3-512",
        }
    }

    /// Identifier-safe name used for template function keys.
    pub fn formatted(&self) -> String {
        self.as_str().replace('-', "")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown checksum algorithm '{0}', valid values: md5, rmd160, sha-1, sha-256, sha-384, sha-512, sha3-224, sha3-256, sha3-384, sha3-512")]
pub struct AlgorithmParseError(pub String);

impl FromStr for Algorithm {
    type Err = AlgorithmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized || a.formatted() == normalized)
            .ok_or_else(|| AlgorithmParseError(s.to_string()))
    }
}

fn digest_hex<D: Digest>(data: &[u8]) -> String {
    hex::encode(D::digest(data))
}

/// Compute the hex-encoded checksum of a byte slice.
pub fn compute_checksum(algorithm: Algorithm, data: &[u8]) -> String {
    match algorithm {
        Algorithm::Md5 => digest_hex::<md5::Md5>(data),
        Algorithm::Rmd160 => digest_hex::<ripemd::Ripemd160>(data),
        Algorithm::Sha1 => digest_hex::<sha1::Sha1>(data),
        Algorithm::Sha256 => digest_hex::<sha2::Sha256>(data),
        Algorithm::Sha384 => digest_hex::<sha2::Sha384>(data),
        Algorithm::Sha512 => digest_hex::<sha2::Sha512>(data),
        Algorithm::Sha3_224 => digest_hex::<sha3::Sha3_224>(data),
        Algorithm::Sha3_256 => digest_hex::<sha3::Sha3_256>(data),
        Algorithm::Sha3_384 => digest_hex::<sha3::Sha3_384>(data),
        Algorithm::Sha3_512 => digest_hex::<sha3::Sha3_512>(data),
    }
}

fn digest_reader<D: Digest, R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the checksum of a file without loading it into memory.
pub fn checksum_file(algorithm: Algorithm, path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;
    let reader = BufReader::new(file);

    let hash = match algorithm {
        Algorithm::Md5 => digest_reader::<md5::Md5, _>(reader),
        Algorithm::Rmd160 => digest_reader::<ripemd::Ripemd160, _>(reader),
        Algorithm::Sha1 => digest_reader::<sha1::Sha1, _>(reader),
        Algorithm::Sha256 => digest_reader::<sha2::Sha256, _>(reader),
        Algorithm::Sha384 => digest_reader::<sha2::Sha384, _>(reader),
        Algorithm::Sha512 => digest_reader::<sha2::Sha512, _>(reader),
        Algorithm::Sha3_224 => digest_reader::<sha3::Sha3_224, _>(reader),
        Algorithm::Sha3_256 => digest_reader::<sha3::Sha3_256, _>(reader),
        Algorithm::Sha3_384 => digest_reader::<sha3::Sha3_384, _>(reader),
        Algorithm::Sha3_512 => digest_reader::<sha3::Sha3_512, _>(reader),
    };

    hash.with_context(|| format!("failed to read file for hashing: {}", path.display()))
}
