use crate::fetch::FetchOptions;
use crate::manifest::AssetManifest;
use crate::verification::ContentDigest;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CheckParams {
    pub manifest: AssetManifest,
    pub options: FetchOptions,
}

#[derive(Debug, Clone)]
pub struct VerifyFileParams {
    pub file_path: PathBuf,
    pub digest: ContentDigest,
    pub expected_length: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CheckZipParams {
    pub file_path: PathBuf,
    pub members: BTreeSet<String>,
}
