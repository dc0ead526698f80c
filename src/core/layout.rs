//! Naming contract of a finished package.

use std::path::{Path, PathBuf};

use crate::core::errors::PackageError;

/// Default distribution package name.
pub const DEFAULT_PACKAGE_NAME: &str = "gpstk";

/// Default SWIG shim module name.
pub const DEFAULT_SHIM_MODULE: &str = "gpstk_pylib";

/// Default facade (package entry point) file name.
pub const DEFAULT_FACADE_FILE: &str = "__init__.py";

/// Default compiled-cache suffix appended to a file name (`x.py` -> `x.pyc`).
pub const DEFAULT_CACHE_SUFFIX: &str = "c";

/// Default facade docstring.
pub const DEFAULT_DOCSTRING: &str =
    "The GPS Toolkit - an open source library to the satellite navigation community.";

/// File names and identifiers that tie a SWIG build to its package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    /// Name of the package directory
    pub package_name: String,

    /// Module name of the generated shim (imported by the facade)
    pub shim_module: String,

    /// Substring identifying compiled extension files (`_gpstk_pylib.so`, ...)
    pub artifact_id: String,

    /// File name of the generated facade
    pub facade_file: String,

    /// Suffix of compiled-cache companions
    pub cache_suffix: String,

    /// Docstring placed at the top of the facade
    pub docstring: String,
}

impl Default for PackageLayout {
    fn default() -> Self {
        PackageLayout::new(DEFAULT_PACKAGE_NAME, DEFAULT_SHIM_MODULE)
    }
}

impl PackageLayout {
    /// Create a layout for the given package and shim module.
    ///
    /// The artifact identifier follows SWIG's convention of prefixing the
    /// compiled extension with an underscore.
    pub fn new(package_name: impl Into<String>, shim_module: impl Into<String>) -> Self {
        let shim_module = shim_module.into();
        PackageLayout {
            package_name: package_name.into(),
            artifact_id: format!("_{}", shim_module),
            shim_module,
            facade_file: DEFAULT_FACADE_FILE.to_string(),
            cache_suffix: DEFAULT_CACHE_SUFFIX.to_string(),
            docstring: DEFAULT_DOCSTRING.to_string(),
        }
    }

    /// Set the artifact identifier.
    pub fn with_artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = artifact_id.into();
        self
    }

    /// Set the facade file name.
    pub fn with_facade_file(mut self, facade_file: impl Into<String>) -> Self {
        self.facade_file = facade_file.into();
        self
    }

    /// Set the compiled-cache suffix.
    pub fn with_cache_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.cache_suffix = suffix.into();
        self
    }

    /// Set the facade docstring.
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = docstring.into();
        self
    }

    /// File name of the shim module.
    pub fn shim_file(&self) -> String {
        format!("{}.py", self.shim_module)
    }

    /// Package directory inside a working directory.
    pub fn package_dir(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.package_name)
    }

    /// Check the file-level fields.
    ///
    /// Module names are checked separately; see
    /// [`validate_module_name`](crate::ops::facade::validate_module_name).
    pub fn validate(&self) -> Result<(), PackageError> {
        if self.artifact_id.is_empty() {
            return Err(PackageError::invalid_layout(
                "shim.artifact_id",
                "",
                "must not be empty, every file would match it",
            ));
        }

        let facade = self.facade_file.as_str();
        let reason = if facade.is_empty() {
            Some("must not be empty".to_string())
        } else if facade.contains(['/', '\\']) || facade == "." || facade == ".." {
            Some("must be a plain file name inside the package".to_string())
        } else if facade == self.shim_file() {
            Some(format!("would overwrite the shim `{}`", self.shim_file()))
        } else if facade == self.package_name {
            Some("collides with the package directory".to_string())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(PackageError::invalid_layout(
                "package.facade_file",
                facade,
                reason,
            )),
            None => Ok(()),
        }
    }
}
