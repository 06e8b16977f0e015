//! Replacing the working directory with the contents of a tree
//!
//! See [`migration::Migration`] for how a checkout is planned and applied.

pub mod migration;
