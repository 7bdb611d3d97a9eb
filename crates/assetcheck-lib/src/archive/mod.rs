use itertools::Itertools;
use std::collections::BTreeSet;
use std::io::Cursor;
use thiserror::Error;
use zip::ZipArchive;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Corrupt archive: {reason}")]
    Corrupt { reason: String },

    #[error("Corrupt archive member {member}: {reason}")]
    CorruptMember { member: String, reason: String },

    #[error("Archive is missing expected members: {}", .filenames.iter().join(", "))]
    MissingMembers { filenames: Vec<String> },

    #[error("Failed to resolve expected filenames: {0}")]
    Resolve(#[from] ResolveError),
}

#[derive(Error, Debug)]
#[error("{reason}")]
pub struct ResolveError {
    pub reason: String,
}

/// Lookup from logical asset identifiers to the filenames an archive
/// containing those assets must carry.
///
/// The production implementation queries the asset catalog over HTTP; tests
/// and pre-resolved call sites use [`FixedManifest`].
pub trait ManifestResolver {
    fn resolve(&self, identifiers: &BTreeSet<String>) -> Result<BTreeSet<String>, ResolveError>;
}

/// A resolver over an already known set of filenames.
#[derive(Debug, Clone, Default)]
pub struct FixedManifest {
    filenames: BTreeSet<String>,
}

impl FixedManifest {
    pub fn new(filenames: BTreeSet<String>) -> Self {
        Self { filenames }
    }
}

impl ManifestResolver for FixedManifest {
    fn resolve(&self, _identifiers: &BTreeSet<String>) -> Result<BTreeSet<String>, ResolveError> {
        Ok(self.filenames.clone())
    }
}

/// Validates a ZIP payload: structural integrity of every member, then
/// presence of every filename the resolver maps the expected identifiers to.
///
/// Missing members are collected and reported together rather than failing
/// on the first, so a single run yields the complete diagnostic.
pub fn validate_archive(
    body: &[u8],
    expected_identifiers: &BTreeSet<String>,
    resolver: &dyn ManifestResolver,
) -> Result<(), ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(body)).map_err(|e| ArchiveError::Corrupt {
        reason: e.to_string(),
    })?;

    // Structural self-test: reading each member to EOF forces the per-entry
    // CRC-32 check defined by the ZIP format.
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| ArchiveError::Corrupt {
            reason: e.to_string(),
        })?;
        let member = entry.name().to_string();
        std::io::copy(&mut entry, &mut std::io::sink()).map_err(|e| {
            ArchiveError::CorruptMember {
                member: member.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    let expected_filenames = resolver.resolve(expected_identifiers)?;
    let member_filenames: BTreeSet<&str> = archive.file_names().collect();

    let missing: Vec<String> = expected_filenames
        .iter()
        .filter(|filename| !member_filenames.contains(filename.as_str()))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(ArchiveError::MissingMembers { filenames: missing });
    }

    Ok(())
}

/// Validates a ZIP payload directly against an expected member list, with no
/// identifier indirection. Used by the standalone CLI checks.
pub fn validate_archive_members(
    body: &[u8],
    expected_filenames: &BTreeSet<String>,
) -> Result<(), ArchiveError> {
    let resolver = FixedManifest::new(expected_filenames.clone());
    validate_archive(body, expected_filenames, &resolver)
}
