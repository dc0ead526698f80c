//! Core data types.

pub mod errors;
pub mod layout;
pub mod namespace;
pub mod rules;

pub use errors::PackageError;
pub use layout::PackageLayout;
pub use namespace::{ManifestNamespace, NamespaceSource, PythonIntrospector};
pub use rules::{ExclusionRuleSet, Rule};
