//! Porcelain commands
//!
//! - `init`: create the metadata directory and point HEAD at `master`
//! - `commit`: snapshot the working directory on top of HEAD
//! - `log`: walk history from a name
//! - `checkout`: restore a commit and repoint HEAD
//! - `branch` / `tag`: create and list named pointers

pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod tag;
