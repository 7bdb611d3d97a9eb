use assetcheck_lib::manifest::{AssetEntry, AssetManifest, ManifestDigest};
use eyre::Result;
use sha1::{Digest, Sha1};
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn sha1_hex(body: &[u8]) -> String {
    hex::encode(Sha1::digest(body))
}

/// Strong entity tag for a body, as the API under test would emit it.
pub fn quoted_etag(body: &[u8]) -> String {
    format!("\"{}\"", sha1_hex(body))
}

pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(content).expect("Failed to write zip entry");
    }
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

pub fn sha1_entry(name: &str, url: String, body: &[u8], members: Option<Vec<String>>) -> (String, AssetEntry) {
    (
        name.to_string(),
        AssetEntry {
            url,
            size: Some(body.len() as u64),
            digest: ManifestDigest {
                algorithm: "SHA1".to_string(),
                value: sha1_hex(body),
            },
            members,
        },
    )
}

pub fn write_manifest(temp_dir: &TempDir, manifest: &AssetManifest) -> Result<PathBuf> {
    let manifest_path = temp_dir.path().join("assetcheck.json");
    manifest.save_to_file(&manifest_path)?;
    Ok(manifest_path)
}
