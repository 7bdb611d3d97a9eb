use assetcheck_e2e_tests::{build_zip, init_tracing, quoted_etag, sha1_hex};
use assetcheck_lib::archive::ArchiveError;
use assetcheck_lib::client::{ApiClient, BinaryOperation};
use assetcheck_lib::error::AssetCheckError;
use assetcheck_lib::steps::{StepContext, assert_ok, download_and_verify, expect_status};
use assetcheck_lib::verification::{IntegrityExpectation, VerificationError};
use std::collections::BTreeSet;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ids(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

async fn mount_binary(server: &MockServer, id: &str, body: &[u8], etag: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/assets/binary/{id}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", etag)
                .set_body_bytes(body.to_vec()),
        )
        .mount(server)
        .await;
}

async fn mount_catalog(server: &MockServer, item_ids: &str, filenames: &[&str]) {
    let items: Vec<serde_json::Value> = filenames
        .iter()
        .map(|filename| serde_json::json!({ "filename": filename }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/assets"))
        .and(query_param("item_ids", item_ids))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_items": items
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_binary_download_with_matching_etag_and_length() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    mount_binary(&server, "asset-1", body, &quoted_etag(body)).await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .expect("Verification should succeed");

    assert_ok(&ctx).unwrap();
    assert_eq!(ctx.response.as_ref().unwrap().body, body);
}

#[tokio::test]
async fn test_weak_etag_is_accepted() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    let weak_etag = format!("W/\"{}\"", sha1_hex(body));
    mount_binary(&server, "asset-1", body, &weak_etag).await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let result = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await;

    assert!(result.is_ok(), "Weak validator should verify: {result:?}");
}

#[tokio::test]
async fn test_digest_mismatch_is_reported_with_both_values() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    mount_binary(
        &server,
        "asset-1",
        body,
        "\"da39a3ee5e6b4b0d3255bfef95601890afd80709\"",
    )
    .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let err = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .unwrap_err();

    match err {
        AssetCheckError::Verification(VerificationError::DigestMismatch {
            declared,
            computed,
        }) => {
            assert_eq!(declared, "da39a3ee5e6b4b0d3255bfef95601890afd80709");
            assert_eq!(computed, sha1_hex(body));
        }
        other => panic!("expected DigestMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_response_is_recorded_even_when_verification_fails() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    mount_binary(
        &server,
        "asset-1",
        body,
        "\"da39a3ee5e6b4b0d3255bfef95601890afd80709\"",
    )
    .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let err = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AssetCheckError::Verification(_)));

    // The failed check must not hide the response from later assertions.
    expect_status(&ctx, 200).unwrap();
    assert_eq!(ctx.response.as_ref().unwrap().body, body);
}

#[tokio::test]
async fn test_length_mismatch_is_reported_with_both_values() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    mount_binary(&server, "asset-1", body, &quoted_etag(body)).await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let err = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::with_length(7),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AssetCheckError::Verification(VerificationError::LengthMismatch {
            expected: 7,
            actual: 22
        })
    ));
}

#[tokio::test]
async fn test_no_declared_length_skips_verification() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    // Deliberately wrong etag; nothing was declared so nothing is checked.
    mount_binary(&server, "asset-1", body, "\"bogus\"").await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let result = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::none(),
    )
    .await;

    assert!(result.is_ok());
    assert_ok(&ctx).unwrap();
}

#[tokio::test]
async fn test_error_status_skips_verification_and_is_recorded() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/binary/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "missing".to_string(),
        },
        IntegrityExpectation::with_length(42),
    )
    .await
    .expect("Non-success statuses skip verification rather than fail");

    expect_status(&ctx, 404).unwrap();
    assert!(assert_ok(&ctx).is_err());
}

#[tokio::test]
async fn test_missing_etag_header_fails_when_checking_applies() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"binary fixture payload";
    Mock::given(method("GET"))
        .and(path("/assets/binary/asset-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let err = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryById {
            id: "asset-1".to_string(),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AssetCheckError::MissingHeader { .. }));
}

#[tokio::test]
async fn test_zip_download_validates_resolved_manifest() {
    init_tracing();
    let server = MockServer::start().await;
    let body = build_zip(&[("a.txt", b"alpha"), ("b.txt", b"bravo")]);

    Mock::given(method("GET"))
        .and(path("/assets/binary_zip"))
        .and(query_param("item_ids", "id-a,id-b"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", quoted_etag(&body).as_str())
                .set_body_bytes(body.clone()),
        )
        .mount(&server)
        .await;
    mount_catalog(&server, "id-a,id-b", &["a.txt", "b.txt"]).await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryZipByIds {
            item_ids: ids(&["id-a", "id-b"]),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .expect("Archive download should validate");
}

#[tokio::test]
async fn test_zip_download_reports_missing_members() {
    init_tracing();
    let server = MockServer::start().await;
    let body = build_zip(&[("a.txt", b"alpha")]);

    Mock::given(method("GET"))
        .and(path("/assets/binary_zip"))
        .and(query_param("item_ids", "id-a,id-c"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", quoted_etag(&body).as_str())
                .set_body_bytes(body.clone()),
        )
        .mount(&server)
        .await;
    // The catalog says the archive should also carry c.txt.
    mount_catalog(&server, "id-a,id-c", &["a.txt", "c.txt"]).await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let err = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryZipByIds {
            item_ids: ids(&["id-a", "id-c"]),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .unwrap_err();

    match err {
        AssetCheckError::Archive(ArchiveError::MissingMembers { filenames }) => {
            assert_eq!(filenames, vec!["c.txt".to_string()]);
        }
        other => panic!("expected MissingMembers, got {other:?}"),
    }
}

#[tokio::test]
async fn test_corrupt_zip_body_is_rejected() {
    init_tracing();
    let server = MockServer::start().await;
    let body = b"this is not a zip container".to_vec();

    Mock::given(method("GET"))
        .and(path("/assets/binary_zip"))
        .and(query_param("item_ids", "id-a"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("ETag", quoted_etag(&body).as_str())
                .set_body_bytes(body.clone()),
        )
        .mount(&server)
        .await;
    mount_catalog(&server, "id-a", &["a.txt"]).await;

    let client = ApiClient::new(&server.uri()).unwrap();
    let mut ctx = StepContext::new();

    let err = download_and_verify(
        &mut ctx,
        &client,
        BinaryOperation::GetBinaryZipByIds {
            item_ids: ids(&["id-a"]),
        },
        IntegrityExpectation::with_length(body.len() as u64),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AssetCheckError::Archive(ArchiveError::Corrupt { .. })
    ));
}
