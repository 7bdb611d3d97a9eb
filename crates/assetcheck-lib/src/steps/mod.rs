use crate::archive::{FixedManifest, validate_archive};
use crate::client::{ApiClient, BinaryOperation, DownloadResponse};
use crate::error::AssetCheckError;
use crate::verification::{IntegrityExpectation, status_indicates_success, verify_content};
use serde_json::Value;
use std::collections::HashMap;

/// Per-scenario state, passed explicitly into each step instead of living in
/// ambient globals. Dropped wholesale when the scenario ends.
#[derive(Debug, Default)]
pub struct StepContext {
    pub response: Option<DownloadResponse>,
    pub stored: HashMap<String, Value>,
}

impl StepContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn response(&self) -> Result<&DownloadResponse, AssetCheckError> {
        self.response.as_ref().ok_or(AssetCheckError::NoResponse)
    }
}

/// Runs a binary download operation and verifies the payload.
///
/// The response is recorded in the context as soon as it arrives, so later
/// status assertions see it even when verification fails. Verification
/// applies only when the response status is a success status and the
/// scenario declared an expected length; otherwise the checks are skipped,
/// not failed. For archive operations the payload is additionally validated
/// against the filenames the asset catalog maps the requested identifiers
/// to.
pub async fn download_and_verify(
    ctx: &mut StepContext,
    client: &ApiClient,
    operation: BinaryOperation,
    expectation: IntegrityExpectation,
) -> Result<(), AssetCheckError> {
    let response = ctx.response.insert(client.download_binary(&operation).await?);

    if status_indicates_success(response.status_code) && expectation.expected_length.is_some() {
        let etag = response.etag().ok_or_else(|| AssetCheckError::MissingHeader {
            name: "ETag".to_string(),
        })?;
        verify_content(&response.body, etag, &expectation)?;

        if let BinaryOperation::GetBinaryZipByIds { item_ids } = &operation {
            let filenames = client.resolve_filenames(item_ids).await?;
            tracing::debug!(
                members = filenames.len(),
                "Validating archive against resolved manifest"
            );
            let resolver = FixedManifest::new(filenames);
            validate_archive(&response.body, item_ids, &resolver)?;
        }

        tracing::info!(status = response.status_code, "Download verified");
    } else {
        tracing::debug!(
            status = response.status_code,
            "Skipping verification for this response"
        );
    }

    Ok(())
}

/// Asserts that the recorded response carries a success status (200, 201 or
/// 204).
pub fn assert_ok(ctx: &StepContext) -> Result<(), AssetCheckError> {
    let response = ctx.response()?;
    if status_indicates_success(response.status_code) {
        Ok(())
    } else {
        Err(AssetCheckError::StatusMismatch {
            expected: "200, 201 or 204".to_string(),
            actual: response.status_code,
        })
    }
}

/// Asserts an exact status code on the recorded response.
pub fn expect_status(ctx: &StepContext, expected: u16) -> Result<(), AssetCheckError> {
    let response = ctx.response()?;
    if response.status_code == expected {
        Ok(())
    } else {
        Err(AssetCheckError::StatusMismatch {
            expected: expected.to_string(),
            actual: response.status_code,
        })
    }
}

/// Parses the recorded response body as JSON and stashes it under a tag for
/// later steps in the same scenario.
pub fn store_response(ctx: &mut StepContext, tag: &str) -> Result<(), AssetCheckError> {
    let value = ctx.response()?.json()?;
    ctx.stored.insert(tag.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;

    fn context_with_status(status_code: u16) -> StepContext {
        StepContext {
            response: Some(DownloadResponse {
                status_code,
                headers: HeaderMap::new(),
                body: br#"{"_id": "abc"}"#.to_vec(),
            }),
            stored: HashMap::new(),
        }
    }

    #[test]
    fn test_assert_ok_accepts_success_statuses() {
        for status in [200, 201, 204] {
            assert!(assert_ok(&context_with_status(status)).is_ok());
        }
    }

    #[test]
    fn test_assert_ok_rejects_errors() {
        let err = assert_ok(&context_with_status(404)).unwrap_err();
        assert!(matches!(
            err,
            AssetCheckError::StatusMismatch { actual: 404, .. }
        ));
    }

    #[test]
    fn test_expect_status() {
        assert!(expect_status(&context_with_status(404), 404).is_ok());
        assert!(expect_status(&context_with_status(404), 403).is_err());
    }

    #[test]
    fn test_assertions_require_a_response() {
        let ctx = StepContext::new();
        assert!(matches!(assert_ok(&ctx), Err(AssetCheckError::NoResponse)));
        assert!(matches!(
            expect_status(&ctx, 200),
            Err(AssetCheckError::NoResponse)
        ));
    }

    #[test]
    fn test_store_response_parses_json_body() {
        let mut ctx = context_with_status(200);
        store_response(&mut ctx, "ASSET").unwrap();
        assert_eq!(ctx.stored["ASSET"]["_id"], "abc");
    }
}
