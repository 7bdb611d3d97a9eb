use crate::verification::{ContentDigest, DigestAlgorithm};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestDigest {
    pub algorithm: String,
    pub value: String,
}

impl ManifestDigest {
    pub fn parse(&self) -> Result<ContentDigest, crate::error::AssetCheckError> {
        let algorithm = DigestAlgorithm::parse(&self.algorithm)?;
        ContentDigest::from_hex(algorithm, &self.value).map_err(Into::into)
    }
}

impl From<&ContentDigest> for ManifestDigest {
    fn from(digest: &ContentDigest) -> Self {
        Self {
            algorithm: digest.algorithm.to_string(),
            value: digest.digest_hex(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetEntry {
    /// Complete download URL
    pub url: String,
    /// Expected size in bytes; absent means size is not checked
    pub size: Option<u64>,
    /// Content digest for verification
    pub digest: ManifestDigest,
    /// Expected ZIP member filenames, present only for archive assets
    pub members: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Version of the manifest format
    pub version: u32,
    /// Assets to check, by unique name
    pub assets: BTreeMap<String, AssetEntry>,
}

impl AssetManifest {
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            assets: BTreeMap::new(),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, crate::error::AssetCheckError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AssetCheckError::ManifestLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let manifest: AssetManifest = serde_json::from_str(&content).map_err(|e| {
            crate::error::AssetCheckError::ManifestLoad {
                path: path.to_path_buf(),
                reason: format!("JSON parsing failed: {}", e),
            }
        })?;

        if manifest.version != Self::VERSION {
            return Err(crate::error::AssetCheckError::ManifestValidation {
                details: format!(
                    "Manifest version {} is not supported. Expected version {}",
                    manifest.version,
                    Self::VERSION
                ),
            });
        }

        Ok(manifest)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), crate::error::AssetCheckError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self::new()
    }
}
