//! shimpack - post-build finisher for SWIG Python extensions
//!
//! This crate turns a freshly built SWIG shim and its compiled extension
//! into an importable package: it filters the shim's namespace, writes a
//! facade `__init__.py` that re-exports the public names, and gathers
//! everything into a package directory.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for shimpack unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It lays out fake SWIG build directories in temporary
/// locations.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::PackageError, layout::PackageLayout, namespace::NamespaceSource,
    rules::ExclusionRuleSet,
};

pub use ops::{finish_package, FinishOptions, FinishResult};
