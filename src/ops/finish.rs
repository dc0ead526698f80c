//! Package finishing operation.
//!
//! Runs the whole post-build sequence for a SWIG shim: load its namespace,
//! filter it, write the facade, gather the package directory, and
//! optionally publish it under a destination root.

use std::path::{Path, PathBuf};

use crate::core::errors::PackageError;
use crate::core::layout::PackageLayout;
use crate::core::namespace::NamespaceSource;
use crate::core::rules::ExclusionRuleSet;
use crate::ops::facade::{validate_module_name, FacadeGenerator};
use crate::ops::filter::SymbolFilter;
use crate::ops::relocate::{
    check_publish_target, discover_extension_artifacts, materialize_package, plan_moves,
    publish, publish_destination, ArtifactKind, PlannedMove, Published,
};
use crate::util::fs::write_string_atomic;

/// Options for finishing a package.
#[derive(Debug, Clone)]
pub struct FinishOptions {
    /// Directory holding the shim and its compiled extension
    pub working_dir: PathBuf,

    /// Names of the package, shim and facade
    pub layout: PackageLayout,

    /// Symbols to hide from the facade
    pub rules: ExclusionRuleSet,

    /// Destination root to publish the package under
    pub target_root: Option<PathBuf>,

    /// Dry run - log what would happen without touching the filesystem
    pub dry_run: bool,
}

impl FinishOptions {
    /// Create finish options for the given working directory.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        FinishOptions {
            working_dir: working_dir.into(),
            layout: PackageLayout::default(),
            rules: ExclusionRuleSet::default(),
            target_root: None,
            dry_run: false,
        }
    }

    /// Set the package layout.
    pub fn with_layout(mut self, layout: PackageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the exclusion rules.
    pub fn with_rules(mut self, rules: ExclusionRuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Set the destination root.
    pub fn with_target_root(mut self, target_root: Option<PathBuf>) -> Self {
        self.target_root = target_root;
        self
    }

    /// Set dry run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of finishing a package.
#[derive(Debug, Clone)]
pub struct FinishResult {
    /// Number of names in the shim namespace
    pub total_symbols: usize,

    /// Symbols re-exported by the facade, in namespace order
    pub accepted: Vec<String>,

    /// Number of hidden symbols
    pub rejected: usize,

    /// Moves into the package directory
    pub moves: Vec<PlannedMove>,

    /// Package directory inside the working directory
    pub package_dir: PathBuf,

    /// Final location, when a destination root was given
    pub published: Option<Published>,
}

impl FinishResult {
    /// Where the package lives after the run.
    pub fn final_location(&self) -> &Path {
        self.published
            .as_ref()
            .map(|p| p.destination.as_path())
            .unwrap_or(self.package_dir.as_path())
    }
}

/// Finish the package described by `opts`, reading the namespace from `source`.
pub fn finish_package(
    opts: &FinishOptions,
    source: &dyn NamespaceSource,
) -> Result<FinishResult, PackageError> {
    let layout = &opts.layout;
    let working_dir = opts.working_dir.as_path();

    validate_module_name(&layout.shim_module)?;
    validate_module_name(&layout.package_name)?;
    layout.validate()?;

    let package_dir = layout.package_dir(working_dir);
    if let Some(target_root) = &opts.target_root {
        check_publish_target(&package_dir, target_root)?;
    }

    let shim_file = layout.shim_file();
    if !working_dir.join(&shim_file).is_file() {
        return Err(PackageError::missing_shim(
            &layout.shim_module,
            format!("`{}` not found in {}", shim_file, working_dir.display()),
        ));
    }

    tracing::info!(
        "loading namespace of `{}` via {}",
        layout.shim_module,
        source.describe()
    );
    let namespace = source.load(working_dir, &layout.shim_module)?;

    let report = SymbolFilter::new(opts.rules.clone()).partition(&namespace);
    tracing::info!(
        "exporting {} of {} symbols",
        report.accepted.len(),
        namespace.len()
    );

    let facade =
        FacadeGenerator::new(&layout.docstring).generate(&report.accepted, &layout.shim_module);
    let facade_path = working_dir.join(&layout.facade_file);
    if opts.dry_run {
        tracing::info!("[dry-run] Would write {}", facade_path.display());
    } else {
        write_string_atomic(&facade_path, &facade)
            .map_err(PackageError::fs("write", &facade_path))?;
        tracing::debug!("wrote {}", facade_path.display());
    }

    let artifacts = discover_extension_artifacts(working_dir, &layout.artifact_id)?;
    let mut files = vec![shim_file, layout.facade_file.clone()];
    let extensions: Vec<String> = artifacts
        .into_iter()
        .filter(|name| !files.contains(name))
        .collect();
    files.extend(extensions);

    let moves = if opts.dry_run {
        let mut moves =
            plan_moves(working_dir, &layout.package_name, &files, &layout.cache_suffix);
        if !facade_path.is_file() {
            moves.push(PlannedMove {
                source: facade_path.clone(),
                destination: package_dir.join(&layout.facade_file),
                kind: ArtifactKind::Listed,
            });
        }
        for planned in &moves {
            tracing::info!(
                "[dry-run] Would move {} -> {}",
                planned.source.display(),
                planned.destination.display()
            );
        }
        moves
    } else {
        materialize_package(working_dir, &layout.package_name, &files, &layout.cache_suffix)?
    };
    tracing::info!("gathered {} file(s) into {}", moves.len(), package_dir.display());

    let published = match &opts.target_root {
        Some(target_root) if opts.dry_run => {
            let destination = publish_destination(&package_dir, target_root)?;
            tracing::info!("[dry-run] Would publish to {}", destination.display());
            None
        }
        Some(target_root) => Some(publish(&package_dir, target_root)?),
        None => None,
    };

    Ok(FinishResult {
        total_symbols: namespace.len(),
        rejected: report.rejected.len(),
        accepted: report.accepted,
        moves,
        package_dir,
        published,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::namespace::ManifestNamespace;
    use crate::test_support::ShimFixture;
    use std::fs;

    #[test]
    fn test_finish_builds_package() {
        let fixture = ShimFixture::gpstk()
            .with_symbols(&[
                "Position",
                "Position_swigregister",
                "_internal",
                "FFData",
                "ComputeStats",
            ])
            .create();
        let opts = FinishOptions::new(fixture.path());

        let result = finish_package(&opts, &fixture.manifest()).unwrap();

        assert_eq!(result.accepted, vec!["ComputeStats"]);
        assert_eq!(result.rejected, 4);
        assert_eq!(result.total_symbols, 5);

        let pkg = fixture.path().join("gpstk");
        assert!(pkg.join("gpstk_pylib.py").is_file());
        assert!(pkg.join("_gpstk_pylib.so").is_file());
        assert!(pkg.join("gpstk_pylib.pyc").is_file());
        assert!(!fixture.path().join("gpstk_pylib.py").exists());
        assert!(!fixture.path().join("__init__.py").exists());

        let init = fs::read_to_string(pkg.join("__init__.py")).unwrap();
        assert!(init.ends_with("from gpstk_pylib import ComputeStats\n"));
        assert_eq!(init.matches("import").count(), 1);
        assert_eq!(result.final_location(), pkg.as_path());
    }

    #[test]
    fn test_finish_publishes_to_target_root() {
        let fixture = ShimFixture::gpstk().with_symbols(&["SatID"]).create();
        let target = fixture.path().join("site-packages");
        fs::create_dir_all(target.join("gpstk")).unwrap();
        fs::write(target.join("gpstk/old.txt"), "stale").unwrap();

        let opts = FinishOptions::new(fixture.path()).with_target_root(Some(target.clone()));
        let result = finish_package(&opts, &fixture.manifest()).unwrap();

        let published = result.published.as_ref().unwrap();
        assert!(published.replaced_existing);
        assert!(!target.join("gpstk/old.txt").exists());
        assert!(target.join("gpstk/__init__.py").is_file());
        assert!(!fixture.path().join("gpstk").exists());
        assert_eq!(result.final_location(), target.join("gpstk").as_path());
    }

    #[test]
    fn test_missing_shim_aborts_before_writing() {
        let fixture = ShimFixture::gpstk().without_shim().create();
        let opts = FinishOptions::new(fixture.path());

        let err = finish_package(&opts, &fixture.manifest()).unwrap_err();

        assert!(matches!(err, PackageError::MissingShim { .. }));
        assert!(!fixture.path().join("__init__.py").exists());
        assert!(!fixture.path().join("gpstk").exists());
    }

    #[test]
    fn test_unreadable_namespace_aborts_before_writing() {
        let fixture = ShimFixture::gpstk().create();
        let opts = FinishOptions::new(fixture.path());

        let err = finish_package(&opts, &ManifestNamespace::new("missing.symbols")).unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(!fixture.path().join("__init__.py").exists());
    }

    #[test]
    fn test_invalid_module_name_rejected() {
        let fixture = ShimFixture::gpstk().create();
        let opts = FinishOptions::new(fixture.path()).with_layout(PackageLayout::new("gpstk", ""));

        let err = finish_package(&opts, &fixture.manifest()).unwrap_err();
        assert!(matches!(err, PackageError::InvalidModuleName(_)));
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let fixture = ShimFixture::gpstk().with_symbols(&["SatID"]).create();
        let target = fixture.path().join("site-packages");
        let opts = FinishOptions::new(fixture.path())
            .with_target_root(Some(target.clone()))
            .with_dry_run(true);

        let result = finish_package(&opts, &fixture.manifest()).unwrap();

        assert!(result.published.is_none());
        assert!(result
            .moves
            .iter()
            .any(|m| m.destination.ends_with("gpstk/__init__.py")));
        assert!(fixture.path().join("gpstk_pylib.py").is_file());
        assert!(!fixture.path().join("__init__.py").exists());
        assert!(!fixture.path().join("gpstk").exists());
        assert!(!target.exists());
    }

    #[test]
    fn test_custom_layout_and_rules() {
        let fixture = ShimFixture::new("geo", "geo_core")
            .with_symbols(&["Legacy", "Position", "SatID"])
            .create();
        let opts = FinishOptions::new(fixture.path())
            .with_layout(PackageLayout::new("geo", "geo_core").with_docstring("Geo toolkit."))
            .with_rules(ExclusionRuleSet::empty().with_exact("Legacy"));

        let result = finish_package(&opts, &fixture.manifest()).unwrap();

        assert_eq!(result.accepted, vec!["Position", "SatID"]);
        let init = fs::read_to_string(fixture.path().join("geo/__init__.py")).unwrap();
        assert!(init.starts_with("\"\"\"Geo toolkit.\n\"\"\"\n"));
        assert!(init.contains("from geo_core import Position\n"));
        assert!(fixture.path().join("geo/_geo_core.so").is_file());
    }

    #[test]
    fn test_empty_artifact_id_moves_nothing() {
        let fixture = ShimFixture::gpstk().with_symbols(&["SatID"]).create();
        fs::write(fixture.path().join("shimpack.toml"), "").unwrap();
        let opts = FinishOptions::new(fixture.path())
            .with_layout(PackageLayout::default().with_artifact_id(""));

        let err = finish_package(&opts, &fixture.manifest()).unwrap_err();

        assert!(matches!(err, PackageError::InvalidLayout { .. }));
        assert!(!fixture.path().join("gpstk").exists());
        assert!(fixture.path().join("shimpack.toml").is_file());
        assert!(fixture.path().join("README.txt").is_file());
    }

    #[test]
    fn test_facade_over_shim_rejected() {
        let fixture = ShimFixture::gpstk().with_symbols(&["SatID"]).create();
        let opts = FinishOptions::new(fixture.path())
            .with_layout(PackageLayout::default().with_facade_file("gpstk_pylib.py"));

        let err = finish_package(&opts, &fixture.manifest()).unwrap_err();

        assert!(matches!(err, PackageError::InvalidLayout { .. }));
        let shim = fs::read_to_string(fixture.path().join("gpstk_pylib.py")).unwrap();
        assert_eq!(shim, "# SWIG shim\n");
    }

    #[test]
    fn test_facade_outside_working_dir_rejected() {
        let fixture = ShimFixture::gpstk().with_symbols(&["SatID"]).create();
        let opts = FinishOptions::new(fixture.path())
            .with_layout(PackageLayout::default().with_facade_file("../__init__.py"));

        let err = finish_package(&opts, &fixture.manifest()).unwrap_err();

        assert!(matches!(err, PackageError::InvalidLayout { .. }));
        assert!(!fixture.path().join("../__init__.py").exists());
    }

    #[test]
    fn test_publishing_over_working_dir_is_refused_up_front() {
        let tmp = tempfile::TempDir::new().unwrap();
        let work = tmp.path().join("gpstk");
        fs::create_dir(&work).unwrap();
        fs::write(work.join("gpstk_pylib.py"), "# SWIG shim\n").unwrap();
        fs::write(work.join("_gpstk_pylib.so"), "\x7fELF").unwrap();
        fs::write(work.join("precious.cpp"), "int main() {}").unwrap();
        fs::write(work.join("gpstk_pylib.symbols"), "SatID\n").unwrap();

        let opts = FinishOptions::new(&work).with_target_root(Some(tmp.path().to_path_buf()));
        let err = finish_package(&opts, &ManifestNamespace::new("gpstk_pylib.symbols"))
            .unwrap_err();

        assert!(matches!(err, PackageError::Filesystem { .. }));
        assert!(work.join("precious.cpp").is_file());
        assert!(work.join("gpstk_pylib.py").is_file());
        assert!(work.join("_gpstk_pylib.so").is_file());
        assert!(!work.join("__init__.py").exists());
        assert!(!work.join("gpstk").exists());
    }
}
