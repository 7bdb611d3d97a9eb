use digest::Digest;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid {algorithm} digest {value}: expected {expected_chars} hex characters")]
    InvalidHexDigest {
        algorithm: DigestAlgorithm,
        value: String,
        expected_chars: usize,
    },

    #[error("Digest mismatch: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    DigestMismatch { expected: Vec<u8>, actual: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Md5,
}

impl DigestAlgorithm {
    /// Digest length in bytes.
    pub fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Md5 => 16,
        }
    }

    pub fn parse(name: &str) -> Result<Self, DigestError> {
        match name {
            "SHA1" | "sha1" => Ok(Self::Sha1),
            "SHA256" | "sha256" => Ok(Self::Sha256),
            "MD5" | "MD5Sum" | "md5" => Ok(Self::Md5),
            other => Err(DigestError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Md5 => write!(f, "MD5"),
        }
    }
}

/// An expected content digest, parsed from its hex representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    pub algorithm: DigestAlgorithm,
    pub value: Vec<u8>,
}

impl ContentDigest {
    pub fn from_hex(algorithm: DigestAlgorithm, hex_digest: &str) -> Result<Self, DigestError> {
        let value =
            hex::decode(hex_digest).map_err(|_| DigestError::InvalidHexDigest {
                algorithm,
                value: hex_digest.to_string(),
                expected_chars: algorithm.digest_len() * 2,
            })?;
        if value.len() != algorithm.digest_len() {
            return Err(DigestError::InvalidHexDigest {
                algorithm,
                value: hex_digest.to_string(),
                expected_chars: algorithm.digest_len() * 2,
            });
        }
        Ok(Self { algorithm, value })
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(&self.value)
    }
}

enum ContentDigestHasher {
    Sha1(Sha1),
    Sha256(Sha256),
    Md5(Md5),
}

/// Incremental hasher that checks a byte stream against an expected digest.
pub struct ContentDigestVerifier {
    hasher: ContentDigestHasher,
    expected_digest: Vec<u8>,
}

impl ContentDigestVerifier {
    #[inline]
    pub fn new(content_digest: ContentDigest) -> Self {
        let hasher = match content_digest.algorithm {
            DigestAlgorithm::Sha1 => ContentDigestHasher::Sha1(Sha1::new()),
            DigestAlgorithm::Sha256 => ContentDigestHasher::Sha256(Sha256::new()),
            DigestAlgorithm::Md5 => ContentDigestHasher::Md5(Md5::new()),
        };
        Self {
            hasher,
            expected_digest: content_digest.value,
        }
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        match &mut self.hasher {
            ContentDigestHasher::Sha1(digest) => Digest::update(digest, data.as_ref()),
            ContentDigestHasher::Sha256(digest) => Digest::update(digest, data.as_ref()),
            ContentDigestHasher::Md5(digest) => Digest::update(digest, data.as_ref()),
        };
    }

    pub fn verify(self) -> Result<(), DigestError> {
        let actual_digest = match self.hasher {
            ContentDigestHasher::Sha1(digest) => digest.finalize().to_vec(),
            ContentDigestHasher::Sha256(digest) => digest.finalize().to_vec(),
            ContentDigestHasher::Md5(digest) => digest.finalize().to_vec(),
        };

        if actual_digest == self.expected_digest {
            Ok(())
        } else {
            Err(DigestError::DigestMismatch {
                expected: self.expected_digest.clone(),
                actual: actual_digest,
            })
        }
    }
}
