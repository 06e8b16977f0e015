//! Object types and operations
//!
//! Every piece of stored content is an immutable object addressed by the SHA-1
//! of its framed bytes. There are three kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (kind, object ID and name per entry)
//! - **Commit**: Snapshot of a tree with an optional parent and a message
//!
//! All objects are framed the same way before hashing and storage:
//! `<kind> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
