use crate::cli::args::Command;
use crate::cli::params::{CheckParams, CheckZipParams, VerifyFileParams};
use crate::config::load_config;
use crate::error::AssetCheckError;
use crate::fetch::FetchOptions;
use crate::manifest::AssetManifest;
use crate::verification::{ContentDigest, DigestAlgorithm};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ResolvedCommand {
    Check(CheckParams),
    VerifyFile(VerifyFileParams),
    CheckZip(CheckZipParams),
}

fn parse_digest_argument(digest: &str) -> Result<ContentDigest, AssetCheckError> {
    let (algorithm, hex_digest) =
        digest
            .split_once(':')
            .ok_or_else(|| AssetCheckError::CliArgumentValidation {
                details: format!("Digest must be of the form ALGO:HEX, got {digest:?}."),
            })?;
    let algorithm = DigestAlgorithm::parse(algorithm)?;
    ContentDigest::from_hex(algorithm, hex_digest).map_err(Into::into)
}

pub fn resolve_command(command: Command) -> Result<ResolvedCommand, AssetCheckError> {
    match command {
        Command::Check {
            config_path,
            manifest_path,
            max_retries,
            fetch_parallelism,
        } => {
            let app_config = config_path.as_deref().map(load_config).transpose()?;

            let defaults = FetchOptions::default();
            let config_fetch = app_config
                .as_ref()
                .map(|config| config.fetch.clone())
                .unwrap_or_default();
            let options = FetchOptions {
                max_retries: max_retries
                    .or(config_fetch.max_retries)
                    .unwrap_or(defaults.max_retries),
                fetch_parallelism: fetch_parallelism
                    .or(config_fetch.fetch_parallelism)
                    .unwrap_or(defaults.fetch_parallelism),
            };

            if options.fetch_parallelism == 0 {
                return Err(AssetCheckError::CliArgumentValidation {
                    details: "fetch-parallelism must be greater than 0.".to_string(),
                });
            }

            let resolved_manifest_path = manifest_path
                .map(PathBuf::from)
                .or_else(|| app_config.as_ref().and_then(|c| c.manifest_path.clone()))
                .ok_or_else(|| AssetCheckError::CliArgumentValidation {
                    details:
                        "No manifest provided. Pass --manifest or provide --config with manifest_path."
                            .to_string(),
                })?;

            let manifest = AssetManifest::load_from_file(&resolved_manifest_path)?;

            if manifest.assets.is_empty() {
                return Err(AssetCheckError::ManifestValidation {
                    details: "Manifest declares no assets.".to_string(),
                });
            }

            Ok(ResolvedCommand::Check(CheckParams { manifest, options }))
        }
        Command::VerifyFile {
            file_path,
            digest,
            length,
        } => {
            let digest = parse_digest_argument(&digest)?;

            Ok(ResolvedCommand::VerifyFile(VerifyFileParams {
                file_path: PathBuf::from(file_path),
                digest,
                expected_length: length,
            }))
        }
        Command::CheckZip { file_path, members } => {
            let file_path = PathBuf::from(file_path);
            if !Path::new(&file_path).exists() {
                return Err(AssetCheckError::CliArgumentValidation {
                    details: format!("Archive {} does not exist.", file_path.display()),
                });
            }

            Ok(ResolvedCommand::CheckZip(CheckZipParams {
                file_path,
                members: members.into_iter().collect(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digest_argument() {
        let digest =
            parse_digest_argument("SHA1:da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
        assert_eq!(digest.algorithm, DigestAlgorithm::Sha1);
    }

    #[test]
    fn test_parse_digest_argument_requires_separator() {
        let err = parse_digest_argument("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap_err();
        assert!(matches!(
            err,
            AssetCheckError::CliArgumentValidation { .. }
        ));
    }

    #[test]
    fn test_check_requires_a_manifest_source() {
        let command = Command::Check {
            config_path: None,
            manifest_path: None,
            max_retries: None,
            fetch_parallelism: None,
        };
        let err = resolve_command(command).unwrap_err();
        assert!(matches!(
            err,
            AssetCheckError::CliArgumentValidation { .. }
        ));
    }

    #[test]
    fn test_check_rejects_zero_parallelism() {
        let command = Command::Check {
            config_path: None,
            manifest_path: Some("unused.json".to_string()),
            max_retries: None,
            fetch_parallelism: Some(0),
        };
        let err = resolve_command(command).unwrap_err();
        assert!(matches!(
            err,
            AssetCheckError::CliArgumentValidation { .. }
        ));
    }
}
