//! High-level operations.
//!
//! This module contains the packaging pipeline: filtering the shim
//! namespace, generating the facade, and relocating artifacts.

pub mod facade;
pub mod filter;
pub mod finish;
pub mod relocate;

pub use facade::{validate_module_name, FacadeGenerator};
pub use filter::{FilterReport, SymbolFilter};
pub use finish::{finish_package, FinishOptions, FinishResult};
pub use relocate::{
    discover_extension_artifacts, materialize_package, plan_moves, publish, ArtifactKind,
    PlannedMove, Published,
};
