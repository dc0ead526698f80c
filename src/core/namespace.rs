//! Sources of a shim module's exported namespace.
//!
//! The facade is built from the ordered list of names a shim exports. A live
//! interpreter can report that list directly; toolchains without one can
//! have the binding generator write it to a manifest instead.

use std::path::{Path, PathBuf};

use crate::core::errors::PackageError;
use crate::util::process::{find_python, ProcessBuilder};

/// Prints `dir(module)` as a JSON array. The module name is `sys.argv[1]`.
const INTROSPECT_SCRIPT: &str = "\
import importlib, json, sys
module = importlib.import_module(sys.argv[1])
json.dump(dir(module), sys.stdout)
";

/// Something that can enumerate the exported names of a built shim module.
pub trait NamespaceSource {
    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;

    /// Return the module's exported names in enumeration order.
    fn load(&self, working_dir: &Path, module: &str) -> Result<Vec<String>, PackageError>;
}

/// Loads the namespace by importing the shim in a Python interpreter.
#[derive(Debug, Clone)]
pub struct PythonIntrospector {
    python: Option<PathBuf>,
}

impl PythonIntrospector {
    /// Use the given interpreter, or search PATH when `None`.
    pub fn new(python: Option<PathBuf>) -> Self {
        PythonIntrospector { python }
    }

    fn interpreter(&self, module: &str) -> Result<PathBuf, PackageError> {
        match &self.python {
            Some(python) => Ok(python.clone()),
            None => find_python().ok_or_else(|| {
                PackageError::missing_shim(module, "no Python interpreter found in PATH")
            }),
        }
    }
}

impl NamespaceSource for PythonIntrospector {
    fn describe(&self) -> String {
        match &self.python {
            Some(python) => format!("python introspection ({})", python.display()),
            None => "python introspection".to_string(),
        }
    }

    fn load(&self, working_dir: &Path, module: &str) -> Result<Vec<String>, PackageError> {
        let python = self.interpreter(module)?;
        let process = ProcessBuilder::new(&python)
            .args(["-c", INTROSPECT_SCRIPT, module])
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONPATH", python_path(working_dir))
            .cwd(working_dir);

        tracing::debug!("introspecting `{}` with {}", module, process.get_program().display());

        let output = process
            .exec_and_check()
            .map_err(|e| PackageError::missing_shim(module, format!("{:#}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str::<Vec<String>>(stdout.trim()).map_err(|e| {
            PackageError::missing_shim(module, format!("unexpected interpreter output: {}", e))
        })
    }
}

/// `PYTHONPATH` with the working directory in front of any inherited entries.
///
/// `-c` only puts the cwd on `sys.path` when `PYTHONSAFEPATH` is unset.
fn python_path(working_dir: &Path) -> String {
    let working_dir =
        std::path::absolute(working_dir).unwrap_or_else(|_| working_dir.to_path_buf());
    let mut paths = vec![working_dir.clone()];
    if let Some(existing) = std::env::var_os("PYTHONPATH") {
        paths.extend(std::env::split_paths(&existing).filter(|p| !p.as_os_str().is_empty()));
    }

    match std::env::join_paths(paths) {
        Ok(joined) => joined.to_string_lossy().into_owned(),
        Err(_) => working_dir.to_string_lossy().into_owned(),
    }
}

/// Reads the namespace from a manifest written by the binding generator.
///
/// `*.json` manifests hold a JSON array of names; any other file lists one
/// name per line.
#[derive(Debug, Clone)]
pub struct ManifestNamespace {
    path: PathBuf,
}

impl ManifestNamespace {
    /// Create a source for the given manifest path.
    ///
    /// Relative paths are resolved against the working directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestNamespace { path: path.into() }
    }

    fn resolve(&self, working_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            working_dir.join(&self.path)
        }
    }
}

impl NamespaceSource for ManifestNamespace {
    fn describe(&self) -> String {
        format!("manifest {}", self.path.display())
    }

    fn load(&self, working_dir: &Path, module: &str) -> Result<Vec<String>, PackageError> {
        let path = self.resolve(working_dir);
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            PackageError::missing_shim(
                module,
                format!("failed to read manifest {}: {}", path.display(), e),
            )
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&contents).map_err(|e| {
                PackageError::missing_shim(
                    module,
                    format!("malformed manifest {}: {}", path.display(), e),
                )
            })
        } else {
            Ok(parse_line_manifest(&contents))
        }
    }
}

/// Split a plain-text manifest into names.
///
/// Blank lines are kept as empty names; the exclusion rules drop them.
fn parse_line_manifest(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
