//! Plumbing commands
//!
//! - `hash-object`: store bytes as a blob
//! - `cat-file`: print the raw content of an object
//! - `write-tree` / `read-tree`: snapshot and restore the working directory
//! - `show-ref`: enumerate refs
//! - name resolution shared by every command taking a name

pub mod cat_file;
pub mod hash_object;
pub mod read_tree;
pub mod rev_parse;
pub mod show_ref;
pub mod write_tree;
