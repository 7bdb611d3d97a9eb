use crate::cli::params::CheckParams;
use crate::error::AssetCheckError;
use crate::fetch::{FetchItem, fetch_and_check_all};
use tracing;

pub async fn run_check(params: CheckParams) -> Result<(), AssetCheckError> {
    let CheckParams { manifest, options } = params;

    let mut items = Vec::with_capacity(manifest.assets.len());
    for (name, entry) in &manifest.assets {
        items.push(FetchItem {
            name: name.clone(),
            url: entry.url.clone(),
            size: entry.size,
            digest: entry.digest.parse()?,
            members: entry
                .members
                .as_ref()
                .map(|members| members.iter().cloned().collect()),
        });
    }

    tracing::info!("Checking {} assets...", items.len());
    fetch_and_check_all(items, options).await?;

    tracing::info!("All asset checks passed");
    Ok(())
}
