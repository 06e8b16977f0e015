//! Tree object and the tree codec
//!
//! Trees represent directory snapshots. They contain one entry per file (blob)
//! and per subdirectory (tree).
//!
//! ## Format
//!
//! One line per entry: `<kind> <object-id> <name>\n`, sorted by the whole
//! line so that the same directory contents always hash identically.
//!
//! ## Codec
//!
//! - [`Tree::write_directory`] snapshots a working-directory subtree into the
//!   database, bottom-up, and returns the root tree ID
//! - [`Tree::read_flat`] expands a stored tree into a flat map of
//!   `/`-joined relative paths to blob IDs

use crate::areas::database::Database;
use crate::areas::workspace::{EntryKind, Workspace};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::DagitError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

/// Flat view of a tree: relative path (`a/b/c.txt`) to blob ID
pub type FlatTree = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    /// Either [`ObjectType::Blob`] or [`ObjectType::Tree`]
    pub kind: ObjectType,
    pub oid: ObjectId,
    pub name: String,
}

impl TreeEntry {
    fn to_line(&self) -> String {
        format!("{} {} {}\n", self.kind, self.oid, self.name)
    }

    fn parse_line(line: &str) -> anyhow::Result<Self> {
        let mut parts = line.splitn(3, ' ');
        let (Some(kind), Some(oid), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            anyhow::bail!("invalid entry line: {line:?}");
        };

        let kind = match kind {
            "blob" => ObjectType::Blob,
            "tree" => ObjectType::Tree,
            other => anyhow::bail!("entry type {other:?} is neither blob nor tree"),
        };
        let oid = ObjectId::try_parse(oid.to_string())?;
        validate_entry_name(name)?;

        Ok(Self::new(kind, oid, name.to_string()))
    }
}

/// Entry names are single path components.
pub fn validate_entry_name(name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        anyhow::bail!("invalid entry name: {name:?}");
    }
    if name.contains('/') || name.contains('\n') || name.contains('\0') {
        anyhow::bail!("entry name {name:?} contains a forbidden character");
    }

    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from its entries, validating every name
    pub fn try_new(entries: Vec<TreeEntry>) -> anyhow::Result<Self> {
        for entry in &entries {
            validate_entry_name(&entry.name)?;
            if entry.kind == ObjectType::Commit {
                anyhow::bail!("entry {} cannot reference a commit", entry.name);
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeEntry> {
        self.entries.into_iter()
    }

    /// Snapshot `dir` (relative to the workspace root) into the database
    ///
    /// Files become blobs and subdirectories are written first (post-order),
    /// since a tree's ID depends on the IDs of its children. The metadata
    /// directory is never visited.
    pub fn write_directory(
        database: &Database,
        workspace: &Workspace,
        dir: &Path,
    ) -> anyhow::Result<ObjectId> {
        let mut entries = Vec::new();

        for entry in workspace.list_dir(dir)? {
            let oid = match entry.kind {
                EntryKind::File => {
                    let blob = Blob::new(workspace.read_file(&entry.path)?);
                    database.store(&blob)?
                }
                EntryKind::Directory => Self::write_directory(database, workspace, &entry.path)?,
            };

            entries.push(TreeEntry::new(entry.kind.object_type(), oid, entry.name));
        }

        let tree = Self::try_new(entries)
            .with_context(|| format!("cannot snapshot directory {}", dir.display()))?;

        database.store(&tree)
    }

    /// Expand the tree `oid` into a flat path-to-blob map
    pub fn read_flat(database: &Database, oid: &ObjectId) -> anyhow::Result<FlatTree> {
        let mut flat = FlatTree::new();
        Self::read_flat_into(database, oid, "", &mut flat)?;

        Ok(flat)
    }

    fn read_flat_into(
        database: &Database,
        oid: &ObjectId,
        prefix: &str,
        flat: &mut FlatTree,
    ) -> anyhow::Result<()> {
        let tree = database.parse_object_as_tree(oid)?;

        for entry in tree.into_entries() {
            let path = format!("{prefix}{}", entry.name);

            match entry.kind {
                ObjectType::Blob => {
                    flat.insert(path, entry.oid);
                }
                ObjectType::Tree => {
                    Self::read_flat_into(database, &entry.oid, &format!("{path}/"), flat)?
                }
                ObjectType::Commit => {
                    return Err(DagitError::MalformedTree {
                        oid: oid.clone(),
                        reason: format!("entry {} references a commit", entry.name),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = self.entries.iter().map(TreeEntry::to_line).collect::<Vec<_>>();
        lines.sort();

        Ok(Bytes::from(lines.concat()))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("tree content is not valid UTF-8")?;

        // names may end in '\r', so only '\n' separates entries
        let entries = content
            .split_terminator('\n')
            .map(TreeEntry::parse_line)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
