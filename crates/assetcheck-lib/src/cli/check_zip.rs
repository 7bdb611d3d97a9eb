use crate::archive::validate_archive_members;
use crate::cli::params::CheckZipParams;
use crate::error::AssetCheckError;
use tracing;

pub async fn run_check_zip(params: CheckZipParams) -> Result<(), AssetCheckError> {
    let CheckZipParams { file_path, members } = params;

    tracing::info!(
        file = %file_path.display(),
        expected_members = members.len(),
        "Validating archive"
    );

    let body = tokio::fs::read(&file_path).await?;
    validate_archive_members(&body, &members)?;

    tracing::info!(file = %file_path.display(), "Archive validated");
    Ok(())
}
