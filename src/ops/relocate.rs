//! Artifact relocation.
//!
//! Moves the shim, the facade and the compiled extension files into the
//! package directory, then optionally publishes that directory under a
//! destination root. Nothing here is transactional: a failure part-way
//! leaves the files that were already moved where they landed.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::errors::PackageError;
use crate::util::fs::{
    ensure_dir, list_files, move_path, remove_dir_all_if_exists, with_trailing_separator,
};

/// Why a file is part of the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Explicitly listed (shim, facade, extension binary)
    Listed,
    /// Compiled-cache companion of a listed file
    CacheCompanion,
}

/// A single planned move into the package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// Source path in the working directory
    pub source: PathBuf,

    /// Destination path in the package directory
    pub destination: PathBuf,

    /// Why the file is moved
    pub kind: ArtifactKind,
}

/// Result of publishing a package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Final location of the package directory
    pub destination: PathBuf,

    /// Whether an existing installation was deleted
    pub replaced_existing: bool,
}

/// Regular files directly in `working_dir` whose name contains `artifact_id`.
///
/// Compiled extension names are platform dependent (`.so`, `.pyd`,
/// `.cpython-311-x86_64-linux-gnu.so`, ...), so they are matched by
/// substring rather than suffix.
pub fn discover_extension_artifacts(
    working_dir: &Path,
    artifact_id: &str,
) -> Result<BTreeSet<String>, PackageError> {
    let files = list_files(working_dir).map_err(PackageError::fs("list", working_dir))?;

    let found: BTreeSet<String> = files
        .into_iter()
        .filter(|name| name.contains(artifact_id))
        .collect();

    tracing::debug!(
        "found {} extension artifact(s) matching `{}`",
        found.len(),
        artifact_id
    );
    Ok(found)
}

/// Work out which files would be moved into `package_dir_name`.
///
/// Listed files that do not exist are skipped. Every listed name is also
/// checked for a `<name><cache_suffix>` companion; a missing companion is
/// expected and ignored.
pub fn plan_moves<S: AsRef<str>>(
    working_dir: &Path,
    package_dir_name: &str,
    files: &[S],
    cache_suffix: &str,
) -> Vec<PlannedMove> {
    let package_dir = working_dir.join(package_dir_name);
    let mut seen = BTreeSet::new();
    let mut moves = Vec::new();

    let mut push = |name: String, kind: ArtifactKind, moves: &mut Vec<PlannedMove>| {
        let source = working_dir.join(&name);
        if !source.is_file() || !seen.insert(name.clone()) {
            return;
        }
        moves.push(PlannedMove {
            source,
            destination: package_dir.join(&name),
            kind,
        });
    };

    for name in files {
        let name: &str = name.as_ref();
        if !working_dir.join(name).is_file() {
            tracing::debug!("skipping missing file `{}`", name);
        }
        push(name.to_string(), ArtifactKind::Listed, &mut moves);

        if !cache_suffix.is_empty() {
            push(
                format!("{}{}", name, cache_suffix),
                ArtifactKind::CacheCompanion,
                &mut moves,
            );
        }
    }

    moves
}

/// Create the package directory and move `files` (plus companions) into it.
///
/// Returns the moves that were performed.
pub fn materialize_package<S: AsRef<str>>(
    working_dir: &Path,
    package_dir_name: &str,
    files: &[S],
    cache_suffix: &str,
) -> Result<Vec<PlannedMove>, PackageError> {
    let package_dir = working_dir.join(package_dir_name);
    ensure_dir(&package_dir).map_err(PackageError::fs("create directory", &package_dir))?;

    let moves = plan_moves(working_dir, package_dir_name, files, cache_suffix);
    for planned in &moves {
        move_path(&planned.source, &planned.destination)
            .map_err(PackageError::fs("move", &planned.source))?;
        tracing::debug!(
            "moved {} -> {}",
            planned.source.display(),
            planned.destination.display()
        );
    }

    Ok(moves)
}

/// Where `package_dir` ends up when published under `target_root`.
pub fn publish_destination(package_dir: &Path, target_root: &Path) -> Result<PathBuf, PackageError> {
    let name = package_dir.file_name().ok_or_else(|| PackageError::Filesystem {
        action: "publish",
        path: package_dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "package directory has no name"),
    })?;
    Ok(with_trailing_separator(target_root).join(name))
}

/// Resolve where `package_dir` would be published and check that doing so
/// is safe.
///
/// Returns `None` when the destination already is `package_dir`. Fails when
/// one path contains the other, since replacing the destination would then
/// delete the package or the tree it lives in.
pub fn check_publish_target(
    package_dir: &Path,
    target_root: &Path,
) -> Result<Option<PathBuf>, PackageError> {
    let destination = publish_destination(package_dir, target_root)?;

    let package_abs = normalize_path(package_dir);
    let destination_abs = normalize_path(&destination);
    if package_abs == destination_abs {
        return Ok(None);
    }
    if package_abs.starts_with(&destination_abs) || destination_abs.starts_with(&package_abs) {
        return Err(PackageError::Filesystem {
            action: "publish to",
            path: destination,
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "destination overlaps the package directory {}",
                    package_abs.display()
                ),
            ),
        });
    }

    Ok(Some(destination))
}

/// Move `package_dir` under `target_root`, replacing any existing copy.
///
/// An existing `target_root/<package>` is deleted recursively without
/// confirmation or backup. This cannot be undone.
pub fn publish(package_dir: &Path, target_root: &Path) -> Result<Published, PackageError> {
    let Some(destination) = check_publish_target(package_dir, target_root)? else {
        tracing::debug!("package already at {}", package_dir.display());
        return Ok(Published {
            destination: package_dir.to_path_buf(),
            replaced_existing: false,
        });
    };

    ensure_dir(target_root).map_err(PackageError::fs("create directory", target_root))?;

    if destination.exists() {
        tracing::warn!("replacing existing installation at {}", destination.display());
    }
    let replaced_existing = remove_dir_all_if_exists(&destination)
        .map_err(PackageError::fs("remove", &destination))?;

    move_path(package_dir, &destination).map_err(PackageError::fs("move", package_dir))?;
    tracing::info!("published {}", destination.display());

    Ok(Published {
        destination,
        replaced_existing,
    })
}

/// Absolute form of `path` with symlinks resolved as far as it exists.
///
/// Paths that do not exist yet keep their missing tail as written.
fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            normalize_path(parent).join(name)
        }
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}
