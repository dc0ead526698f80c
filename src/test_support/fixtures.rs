//! Fixtures for fake SWIG build directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::namespace::ManifestNamespace;

/// Description of a SWIG build directory before it is written.
#[derive(Debug, Clone)]
pub struct ShimFixture {
    /// Package directory name.
    pub package_name: String,
    /// Shim module name.
    pub shim_module: String,
    /// Names written to the symbol manifest.
    pub symbols: Vec<String>,
    /// Whether the shim `.py` (and its `.pyc`) is written.
    pub with_shim: bool,
}

impl ShimFixture {
    /// Create a fixture for the given package and shim module.
    pub fn new(package_name: impl Into<String>, shim_module: impl Into<String>) -> Self {
        ShimFixture {
            package_name: package_name.into(),
            shim_module: shim_module.into(),
            symbols: Vec::new(),
            with_shim: true,
        }
    }

    /// The default GPSTk layout.
    pub fn gpstk() -> Self {
        ShimFixture::new("gpstk", "gpstk_pylib")
    }

    /// Set the exported symbols.
    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = symbols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Leave out the shim module file.
    pub fn without_shim(mut self) -> Self {
        self.with_shim = false;
        self
    }

    /// Name of the symbol manifest file.
    pub fn manifest_name(&self) -> String {
        format!("{}.symbols", self.shim_module)
    }

    /// Write the fixture to a fresh temporary directory.
    pub fn create(&self) -> CreatedFixture {
        let dir = TempDir::new().expect("failed to create temp dir");
        let root = dir.path();
        let module = &self.shim_module;

        if self.with_shim {
            write(root, &format!("{module}.py"), "# SWIG shim\n");
            write(root, &format!("{module}.pyc"), "compiled");
        }
        write(root, &format!("_{module}.so"), "\x7fELF");
        write(root, "README.txt", "not part of the package");

        let manifest: String = self.symbols.iter().map(|s| format!("{s}\n")).collect();
        write(root, &self.manifest_name(), &manifest);

        CreatedFixture {
            manifest: root.join(self.manifest_name()),
            dir,
        }
    }
}

/// A fixture written to disk. The directory is removed on drop.
#[derive(Debug)]
pub struct CreatedFixture {
    dir: TempDir,
    manifest: PathBuf,
}

impl CreatedFixture {
    /// Root of the fake build directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Namespace source reading the fixture's manifest.
    pub fn manifest(&self) -> ManifestNamespace {
        ManifestNamespace::new(&self.manifest)
    }
}

fn write(root: &Path, name: &str, contents: &str) {
    std::fs::write(root.join(name), contents).expect("failed to write fixture file");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::namespace::NamespaceSource;

    #[test]
    fn test_fixture_layout() {
        let fixture = ShimFixture::gpstk().with_symbols(&["SatID", "_x"]).create();

        assert!(fixture.path().join("gpstk_pylib.py").is_file());
        assert!(fixture.path().join("_gpstk_pylib.so").is_file());

        let names = fixture.manifest().load(fixture.path(), "gpstk_pylib").unwrap();
        assert_eq!(names, vec!["SatID", "_x"]);
    }

    #[test]
    fn test_fixture_without_shim() {
        let fixture = ShimFixture::new("geo", "geo_core").without_shim().create();
        assert!(!fixture.path().join("geo_core.py").exists());
        assert!(fixture.path().join("_geo_core.so").is_file());
    }
}
