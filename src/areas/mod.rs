//! Core repository components
//!
//! - `database`: content-addressed object store
//! - `refs`: named pointers (HEAD, branches, tags)
//! - `repository`: ties the areas together for the commands
//! - `workspace`: working directory file system operations

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
