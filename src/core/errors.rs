//! Packaging error types and diagnostics.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while finishing a package.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("shim module `{module}` could not be loaded: {reason}")]
    MissingShim { module: String, reason: String },

    #[error("failed to {action} {}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid module name `{0}`")]
    InvalidModuleName(String),

    #[error("invalid {field} `{value}`: {reason}")]
    InvalidLayout {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl PackageError {
    /// Create a missing-shim error.
    pub fn missing_shim(module: impl Into<String>, reason: impl Into<String>) -> Self {
        PackageError::MissingShim {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-layout error.
    pub fn invalid_layout(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PackageError::InvalidLayout {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Build a mapper from `io::Error` to a filesystem error on `path`.
    ///
    /// ```rust,ignore
    /// fs::create_dir(&dir).map_err(PackageError::fs("create directory", &dir))?;
    /// ```
    pub fn fs(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> PackageError {
        let path = path.to_path_buf();
        move |source| PackageError::Filesystem {
            action,
            path,
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PackageError::MissingShim { .. } => 2,
            _ => 1,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PackageError::MissingShim { module, reason } => {
                Diagnostic::error(format!("could not load shim module `{}`", module))
                    .with_context(reason.clone())
                    .with_suggestion(format!(
                        "Run from the directory containing `{}.py` and its compiled extension",
                        module
                    ))
                    .with_suggestion(
                        "Pass `--manifest <FILE>` to read the symbol list from a file instead",
                    )
            }

            PackageError::Filesystem {
                action,
                path,
                source,
            } => Diagnostic::error(format!("failed to {}", action))
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(
                    "Earlier moves are not rolled back; inspect the working directory before rerunning",
                ),

            PackageError::InvalidModuleName(name) => {
                Diagnostic::error(format!("`{}` is not a valid module name", name))
                    .with_suggestion("Set `shim.module` in shimpack.toml or pass `--shim-module`")
            }

            PackageError::InvalidLayout {
                field,
                value,
                reason,
            } => Diagnostic::error(format!("invalid {} `{}`", field, value))
                .with_context(reason.clone())
                .with_suggestion(format!("Fix `{}` in shimpack.toml", field)),
        }
    }
}
