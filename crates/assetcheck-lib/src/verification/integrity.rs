use super::etag::unquote_etag;
use sha1::{Digest, Sha1};
use thiserror::Error;

/// Statuses for which a downloaded body is considered checkable.
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

pub fn status_indicates_success(status_code: u16) -> bool {
    SUCCESS_STATUSES.contains(&status_code)
}

#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Digest mismatch: response etag ({declared}) != computed sha1 ({computed})")]
    DigestMismatch { declared: String, computed: String },

    #[error("Length mismatch: response length ({actual}) != expected length ({expected})")]
    LengthMismatch { expected: u64, actual: u64 },
}

/// Caller-declared expectations for a single downloaded payload.
///
/// An absent `expected_length` means the scenario declared nothing to check,
/// and verification is skipped entirely rather than defaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrityExpectation {
    pub expected_length: Option<u64>,
}

impl IntegrityExpectation {
    pub fn with_length(expected_length: u64) -> Self {
        Self {
            expected_length: Some(expected_length),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Checks a fully buffered response body against its declared `ETag` and the
/// scenario's expected length.
///
/// The declared entity tag is unquoted (weak and strong validators are
/// treated identically), the SHA-1 of the body is computed once in memory,
/// and both digests are compared as normalized lowercase hex.
pub fn verify_content(
    body: &[u8],
    declared_etag: &str,
    expectation: &IntegrityExpectation,
) -> Result<(), VerificationError> {
    let Some(expected_length) = expectation.expected_length else {
        // Nothing was declared; only check what was asked for.
        return Ok(());
    };

    let declared = unquote_etag(declared_etag).to_ascii_lowercase();
    let computed = hex::encode(Sha1::digest(body));

    if declared != computed {
        return Err(VerificationError::DigestMismatch { declared, computed });
    }

    let actual_length = body.len() as u64;
    if actual_length != expected_length {
        return Err(VerificationError::LengthMismatch {
            expected: expected_length,
            actual: actual_length,
        });
    }

    Ok(())
}
