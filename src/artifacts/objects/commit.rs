//! Commit object
//!
//! Commits record a snapshot of the working directory at a point in history.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - An optional parent commit ID (absent for the root commit)
//! - The commit message, stored verbatim
//!
//! ## Format
//!
//! ```text
//! tree <tree-sha>
//! parent <parent-sha>
//!
//! <commit message>
//! ```
//!
//! History is linear: a commit carries at most one `parent` header.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct Commit {
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
    /// Parent commit ID (None for the root commit)
    parent: Option<ObjectId>,
    message: String,
}

impl Commit {
    /// First line of the commit message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut headers = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            headers.push(format!("parent {parent}"));
        }

        let content = format!("{}\n\n{}", headers.join("\n"), self.message);
        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("commit content is not valid UTF-8")?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("missing blank line after the headers")?;

        let mut tree_oid = None;
        let mut parent = None;

        for line in headers.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("invalid header line: {line:?}"))?;

            match key {
                "tree" if tree_oid.is_some() => anyhow::bail!("duplicate tree header"),
                "tree" => tree_oid = Some(ObjectId::try_parse(value.to_string())?),
                "parent" if parent.is_some() => {
                    anyhow::bail!("more than one parent header")
                }
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                // unknown headers are skipped
                _ => {}
            }
        }

        let tree_oid = tree_oid.context("missing tree header")?;

        Ok(Self::new(tree_oid, parent, message.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
