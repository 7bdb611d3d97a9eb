use crate::cli::params::VerifyFileParams;
use crate::error::AssetCheckError;
use crate::verification::ContentDigestVerifier;
use tokio::io::AsyncReadExt;
use tracing;

/// Verifies a local file against an expected digest and optional length,
/// streaming in 64KB chunks so large files never load fully into memory.
pub async fn run_verify_file(params: VerifyFileParams) -> Result<(), AssetCheckError> {
    let VerifyFileParams {
        file_path,
        digest,
        expected_length,
    } = params;

    tracing::info!(
        file = %file_path.display(),
        algorithm = %digest.algorithm,
        expected_digest = digest.digest_hex(),
        "Verifying file"
    );

    let file = tokio::fs::File::open(&file_path).await?;
    let mut reader = tokio::io::BufReader::new(file);
    let mut buffer = vec![0u8; 65536];

    let mut verifier = ContentDigestVerifier::new(digest);
    let mut total_length: u64 = 0;

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        verifier.update(&buffer[..bytes_read]);
        total_length += bytes_read as u64;
    }

    verifier
        .verify()
        .map_err(|e| AssetCheckError::FileVerification {
            path: file_path.clone(),
            details: e.to_string(),
        })?;

    if let Some(expected) = expected_length
        && total_length != expected
    {
        return Err(AssetCheckError::FileVerification {
            path: file_path,
            details: format!("length mismatch: expected {expected}, got {total_length}"),
        });
    }

    tracing::info!(file = %file_path.display(), "File verified");
    Ok(())
}
