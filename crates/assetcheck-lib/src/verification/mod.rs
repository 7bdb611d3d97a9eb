mod content_digest;
mod etag;
mod integrity;

pub use content_digest::{ContentDigest, ContentDigestVerifier, DigestAlgorithm, DigestError};
pub use etag::unquote_etag;
pub use integrity::{
    IntegrityExpectation, VerificationError, status_indicates_success, verify_content,
};
