use crate::verification::ContentDigest;
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
pub struct FetchItem {
    pub name: String,
    pub url: String,
    pub size: Option<u64>,
    pub digest: ContentDigest,
    /// Expected ZIP member filenames; present only for archive assets
    pub members: Option<BTreeSet<String>>,
}

#[derive(Clone, Copy, Debug)]
pub struct FetchOptions {
    pub max_retries: usize,
    pub fetch_parallelism: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_retries: 5,
            fetch_parallelism: 16,
        }
    }
}
