//! Commit history traversal
//!
//! - `rev_list`: lazy breadth-first walk over every commit reachable from a
//!   set of starting points, each commit visited once

pub mod rev_list;
