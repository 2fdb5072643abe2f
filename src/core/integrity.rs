use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;

/// Digest used for Subresource Integrity values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Sha256,
    #[default]
    Sha384,
    Sha512,
}

impl HashType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Sha256 => "sha256",
            HashType::Sha384 => "sha384",
            HashType::Sha512 => "sha512",
        }
    }

    pub fn digest(&self, content: &[u8]) -> Vec<u8> {
        match self {
            HashType::Sha256 => Sha256::digest(content).to_vec(),
            HashType::Sha384 => Sha384::digest(content).to_vec(),
            HashType::Sha512 => Sha512::digest(content).to_vec(),
        }
    }

    /// Unpadded base64 of the digest, without the algorithm prefix
    pub fn encoded_digest(&self, content: &[u8]) -> String {
        STANDARD_NO_PAD.encode(self.digest(content))
    }

    /// Full SRI value for an already encoded digest
    pub fn integrity_value(&self, encoded: &str) -> String {
        format!("{}-{}", self.as_str(), encoded)
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashType::Sha256),
            "sha384" => Ok(HashType::Sha384),
            "sha512" => Ok(HashType::Sha512),
            other => Err(format!("unsupported hash type: {}", other)),
        }
    }
}
