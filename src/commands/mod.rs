//! Boundary operations, implemented on [`Repository`](crate::areas::repository::Repository)
//!
//! - `plumbing`: direct access to the object and ref stores (hash-object,
//!   cat-file, write-tree, read-tree, show-ref)
//! - `porcelain`: version-control workflows built on top of them (init,
//!   commit, log, checkout, branch, tag)
//!
//! Operations return what they produce; the ones backing a CLI command also
//! report to the repository's writer.

pub mod plumbing;
pub mod porcelain;
