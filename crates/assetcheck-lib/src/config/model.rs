use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the asset manifest used by `check` when no --manifest is given
    pub manifest_path: Option<PathBuf>,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FetchConfig {
    pub max_retries: Option<usize>,
    pub fetch_parallelism: Option<usize>,
}
