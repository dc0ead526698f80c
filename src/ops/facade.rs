//! Facade module generation.
//!
//! The facade is the package's `__init__.py`: a docstring, an
//! auto-generation notice, and one `from <shim> import <name>` line per
//! accepted symbol.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::PackageError;
use crate::core::layout::DEFAULT_DOCSTRING;

static MODULE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Generator for facade module text.
#[derive(Debug, Clone)]
pub struct FacadeGenerator {
    docstring: String,
    tool_name: String,
}

impl Default for FacadeGenerator {
    fn default() -> Self {
        FacadeGenerator {
            docstring: DEFAULT_DOCSTRING.to_string(),
            tool_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl FacadeGenerator {
    /// Create a generator with the given docstring.
    pub fn new(docstring: impl Into<String>) -> Self {
        FacadeGenerator {
            docstring: docstring.into(),
            ..Default::default()
        }
    }

    /// Set the tool name written into the auto-generation notice.
    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = tool_name.into();
        self
    }

    /// The auto-generation notice line.
    pub fn notice(&self) -> String {
        format!("### This file is AUTO-GENERATED by {}. ###", self.tool_name)
    }

    /// Generate the facade text.
    ///
    /// `accepted` is trusted to be already filtered. `source_module` must be
    /// a valid module name; see [`validate_module_name`].
    pub fn generate<S: AsRef<str>>(&self, accepted: &[S], source_module: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\"\"\"{}\n\"\"\"", self.docstring);
        let _ = writeln!(out, "{}", self.notice());
        out.push('\n');

        for name in accepted {
            let name: &str = name.as_ref();
            let _ = writeln!(out, "from {} import {}", source_module, name);
        }

        out
    }
}

/// Check that `name` is usable as the source module of import statements.
pub fn validate_module_name(name: &str) -> Result<(), PackageError> {
    if MODULE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(PackageError::InvalidModuleName(name.to_string()))
    }
}
