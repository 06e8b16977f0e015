//! Dagit data structures and algorithms
//!
//! - `branch`: ref names and name resolution
//! - `checkout`: planning a working-directory replacement
//! - `log`: history traversal
//! - `objects`: object types (blob, tree, commit) and their encodings

pub mod branch;
pub mod checkout;
pub mod log;
pub mod objects;
