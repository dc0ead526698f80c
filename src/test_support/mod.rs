//! Test utilities for shimpack unit tests.
//!
//! Provides fixtures that lay out a fake SWIG build directory in a
//! temporary location, so packaging operations never touch the real
//! working directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use shimpack::test_support::ShimFixture;
//!
//! let fixture = ShimFixture::gpstk().with_symbols(&["SatID"]).create();
//! let names = fixture.manifest().load(fixture.path(), "gpstk_pylib")?;
//! ```

pub mod fixtures;

pub use fixtures::*;
