//! Errors surfaced by the version-control core
//!
//! Operations return `anyhow::Result`; the conditions a caller may want to
//! react to are raised as a [`DagitError`] inside the `anyhow::Error`, so they
//! can be recovered with `err.downcast_ref::<DagitError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DagitError {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("object {oid} is a {found}, expected a {expected}")]
    TypeMismatch {
        oid: ObjectId,
        expected: ObjectType,
        found: ObjectType,
    },

    #[error("malformed tree {oid}: {reason}")]
    MalformedTree { oid: ObjectId, reason: String },

    #[error("malformed commit {oid}: {reason}")]
    MalformedCommit { oid: ObjectId, reason: String },

    #[error("unknown name: {0}")]
    UnknownName(String),

    /// Only one level of symbolic indirection is supported.
    #[error("symbolic ref {name} points to another symbolic ref {target}")]
    NestedSymbolicRef { name: String, target: String },

    #[error("ref {0} does not point to any object yet")]
    EmptyRef(String),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error("ref {0} already exists")]
    RefAlreadyExists(String),

    #[error("not a dagit repository: {}", .0.display())]
    NotARepository(PathBuf),
}
