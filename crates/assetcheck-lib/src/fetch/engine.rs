use super::types::{FetchItem, FetchOptions};
use crate::archive::validate_archive_members;
use crate::verification::{ContentDigestVerifier, status_indicates_success, unquote_etag};
use eyre::{Result, WrapErr, eyre};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::header::ETAG;
use std::sync::Arc;
use tracing::{info, warn};

/// Fetches every item over HTTP with bounded parallelism and checks each
/// payload: declared digest, declared size, response ETag (when the declared
/// digest is the same algorithm the server etags with) and, for archive
/// items, ZIP structure and member presence.
///
/// Network failures are retried per item; a verification failure is terminal
/// for that item and never retried. All failures are collected so a single
/// run reports every broken asset.
pub async fn fetch_and_check_all(items: Vec<FetchItem>, options: FetchOptions) -> Result<()> {
    let client = reqwest::Client::new();
    let fetch_semaphore = Arc::new(tokio::sync::Semaphore::new(options.fetch_parallelism));

    let mut futs = FuturesUnordered::new();
    for item in items {
        let client = client.clone();
        let fetch_semaphore = fetch_semaphore.clone();
        let max_retries = options.max_retries;
        futs.push(async move {
            let _permit = fetch_semaphore.acquire_owned().await?;
            fetch_and_check_one(&client, &item, max_retries)
                .await
                .wrap_err_with(|| format!("Check failed for asset {}", item.name))
        });
    }

    info!("Waiting for asset checks to finish...");

    let mut failures = Vec::new();
    while let Some(res) = futs.next().await {
        if let Err(err) = res {
            warn!("Asset check failed: {:#}", err);
            failures.push(err);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(eyre!("{} asset checks failed", failures.len()))
    }
}

async fn fetch_with_retries(
    client: &reqwest::Client,
    url: &str,
    max_retries: usize,
) -> Result<reqwest::Response> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match client.get(url).send().await {
            Ok(response) => return Ok(response),
            Err(err) if attempt <= max_retries => {
                warn!(url, attempt, "Fetch failed, retrying: {err:#}");
            }
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("Failed to fetch {url}"));
            }
        }
    }
}

async fn fetch_and_check_one(
    client: &reqwest::Client,
    item: &FetchItem,
    max_retries: usize,
) -> Result<()> {
    tracing::trace!(url = %item.url, expected_digest = item.digest.digest_hex(), "Checking");

    let mut response = fetch_with_retries(client, &item.url, max_retries).await?;

    let status_code = response.status().as_u16();
    if !status_indicates_success(status_code) {
        return Err(eyre!("Unexpected status {status_code} for {}", item.url));
    }

    let declared_etag = response
        .headers()
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    // The body is kept only when a member check needs to reopen it as a ZIP.
    let keep_body = item.members.is_some();
    let mut verifier = ContentDigestVerifier::new(item.digest.clone());
    let mut total_length: u64 = 0;
    let mut body = Vec::new();

    while let Some(chunk) = response
        .chunk()
        .await
        .wrap_err_with(|| format!("Failed to read from {}", item.url))?
    {
        verifier.update(&chunk);
        total_length += chunk.len() as u64;
        if keep_body {
            body.extend_from_slice(&chunk);
        }
    }

    verifier.verify()?;

    if let Some(expected_size) = item.size
        && total_length != expected_size
    {
        return Err(eyre!(
            "Size mismatch for {}: expected {expected_size}, got {total_length}",
            item.url
        ));
    }

    if item.digest.algorithm == crate::verification::DigestAlgorithm::Sha1
        && let Some(etag) = declared_etag
        && unquote_etag(&etag).to_ascii_lowercase() != item.digest.digest_hex()
    {
        return Err(eyre!(
            "ETag mismatch for {}: declared {etag}, expected {}",
            item.url,
            item.digest.digest_hex()
        ));
    }

    if let Some(members) = &item.members {
        validate_archive_members(&body, members)?;
    }

    info!(name = %item.name, url = %item.url, "Fetched and verified");
    Ok(())
}
