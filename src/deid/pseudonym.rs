//! Deterministic pseudonymization of identifiers
//!
//! A pseudonym is the lowercase hex digest of the raw identifier. The function
//! is pure: no salt, no counter, no randomness and no lookup table. Two equal
//! raw identifiers therefore map to the same pseudonym in every record, every
//! request and every process, which is what keeps references resolvable after
//! rewriting.

use crate::domain::{DeidError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512_256};
use std::fmt;
use std::str::FromStr;

/// Length of every pseudonym, in hex characters
pub const PSEUDONYM_LEN: usize = 64;

/// Supported 256-bit one-way hash primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// SHA-512/256
    Sha512_256,
}

impl HashAlgorithm {
    /// Configuration name of the algorithm
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512_256 => "sha512_256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = DeidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512_256" => Ok(Self::Sha512_256),
            _ => Err(DeidError::HashUnavailable(format!(
                "'{s}' is not an available hash primitive. Must be one of: sha256, sha512_256"
            ))),
        }
    }
}

/// Stateless identifier-to-pseudonym function
///
/// Cheap to copy and safe to share across threads; it holds nothing but the
/// algorithm choice.
///
/// # Examples
///
/// ```
/// use fhir_deid::deid::pseudonym::{Pseudonymizer, PSEUDONYM_LEN};
///
/// let pseudonymizer = Pseudonymizer::default();
/// let p1 = pseudonymizer.pseudonymize("123");
/// assert_eq!(p1.len(), PSEUDONYM_LEN);
/// assert_eq!(p1, pseudonymizer.pseudonymize("123"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pseudonymizer {
    algorithm: HashAlgorithm,
}

impl Pseudonymizer {
    /// Create a pseudonymizer for an algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Create a pseudonymizer from a configured algorithm name
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::HashUnavailable`] if the name does not designate
    /// a primitive compiled into this build.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// The algorithm in use
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Pseudonymize a raw identifier
    pub fn pseudonymize(&self, raw_id: &str) -> String {
        match self.algorithm {
            HashAlgorithm::Sha256 => format!("{:x}", Sha256::digest(raw_id.as_bytes())),
            HashAlgorithm::Sha512_256 => format!("{:x}", Sha512_256::digest(raw_id.as_bytes())),
        }
    }
}
