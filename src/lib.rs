//! dagit - a minimal content-addressed version-control core
//!
//! The crate is split the same way a repository is laid out on disk:
//!
//! - [`areas`]: the stores that own state (object database, refs, working directory)
//!   and the [`Repository`](areas::repository::Repository) that ties them together
//! - [`artifacts`]: the data model and algorithms (objects, tree codec, name
//!   resolution, ancestry traversal, checkout planning)
//! - [`commands`]: the boundary operations consumed by the `dagit` binary
//! - [`errors`]: the error taxonomy surfaced to callers

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;

/// Name of the metadata directory kept at the root of every working directory
pub const METADATA_DIR: &str = ".dagit";

/// Branch that HEAD points to right after `init`
pub const DEFAULT_BRANCH: &str = "master";
