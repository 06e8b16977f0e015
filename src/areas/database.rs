//! Object database
//!
//! Append-only, content-addressed storage of framed objects under
//! `.dagit/objects/<xx>/<yyyy...>`. An object file is written once, through a
//! temporary file that is renamed into place, and never rewritten.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{self, Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::DagitError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store a typed object, returning its ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.put(object.object_type(), object.serialize()?)
    }

    /// Store `content` as an object of kind `object_type`
    ///
    /// Idempotent: if the object already exists nothing is written.
    pub fn put(&self, object_type: ObjectType, content: Bytes) -> anyhow::Result<ObjectId> {
        let object_id = object::hash(object_type, &content);
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(&object_id, object_path, object::frame(object_type, &content))?;
        tracing::debug!(oid = %object_id, kind = %object_type, size = content.len(), "stored object");

        Ok(object_id)
    }

    /// Load the content of `object_id`, checking its kind when `expected` is given
    pub fn load(
        &self,
        object_id: &ObjectId,
        expected: Option<ObjectType>,
    ) -> anyhow::Result<Bytes> {
        let (object_type, content) = self.read_object(object_id)?;

        match expected {
            Some(expected) if expected != object_type => Err(DagitError::TypeMismatch {
                oid: object_id.clone(),
                expected,
                found: object_type,
            }
            .into()),
            _ => Ok(content),
        }
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.read_object(object_id)?;
        Ok(object_type)
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let content = self.load(object_id, Some(ObjectType::Blob))?;
        Blob::deserialize(Cursor::new(content))
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let content = self.load(object_id, Some(ObjectType::Tree))?;

        Tree::deserialize(Cursor::new(content)).map_err(|err| {
            DagitError::MalformedTree {
                oid: object_id.clone(),
                reason: format!("{err:#}"),
            }
            .into()
        })
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let content = self.load(object_id, Some(ObjectType::Commit))?;

        Commit::deserialize(Cursor::new(content)).map_err(|err| {
            DagitError::MalformedCommit {
                oid: object_id.clone(),
                reason: format!("{err:#}"),
            }
            .into()
        })
    }

    fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(object_id.to_path());

        let raw: Bytes = match std::fs::read(&object_path) {
            Ok(raw) => raw.into(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(DagitError::ObjectNotFound(object_id.clone()).into());
            }
            Err(err) => {
                return Err(err).context(format!(
                    "Unable to read object file {}",
                    object_path.display()
                ));
            }
        };

        let mut reader = Cursor::new(raw.clone());
        let (object_type, size) = ObjectType::parse_header(&mut reader)
            .with_context(|| format!("Corrupt object header in {object_id}"))?;
        let content = raw.slice(reader.position() as usize..);

        if content.len() != size {
            anyhow::bail!(
                "Corrupt object {object_id}: header declares {size} bytes, found {}",
                content.len()
            );
        }

        Ok((object_type, content))
    }

    fn write_object(
        &self,
        object_id: &ObjectId,
        object_path: PathBuf,
        object_content: Bytes,
    ) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name(object_id));

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn generate_temp_name(object_id: &ObjectId) -> String {
        format!("tmp-obj-{}-{}", std::process::id(), object_id.to_short_oid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::proptest;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[rstest]
    fn stored_content_is_loaded_back(database_dir: TempDir) {
        let database = database(&database_dir);

        let oid = database
            .put(ObjectType::Blob, Bytes::from_static(b"hello"))
            .unwrap();

        assert_eq!(oid.as_ref(), "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0");
        assert_eq!(database.load(&oid, None).unwrap(), Bytes::from_static(b"hello"));
        assert_eq!(
            database.load(&oid, Some(ObjectType::Blob)).unwrap(),
            Bytes::from_static(b"hello")
        );
        assert_eq!(database.object_type(&oid).unwrap(), ObjectType::Blob);
    }

    #[rstest]
    fn storing_twice_changes_nothing(database_dir: TempDir) {
        let database = database(&database_dir);

        let first = database
            .put(ObjectType::Blob, Bytes::from_static(b"same"))
            .unwrap();
        let object_path = database.objects_path().join(first.to_path());
        let written = std::fs::read(&object_path).unwrap();

        let second = database
            .put(ObjectType::Blob, Bytes::from_static(b"same"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&object_path).unwrap(), written);
        let files_in_fanout = std::fs::read_dir(object_path.parent().unwrap())
            .unwrap()
            .count();
        assert_eq!(files_in_fanout, 1);
    }

    #[rstest]
    fn missing_object_is_reported(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = ObjectId::try_parse("0".repeat(40)).unwrap();

        let err = database.load(&oid, None).unwrap_err();

        assert_eq!(
            err.downcast_ref::<DagitError>(),
            Some(&DagitError::ObjectNotFound(oid.clone()))
        );
        assert!(!database.contains(&oid));
    }

    #[rstest]
    fn unexpected_kind_is_reported(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database
            .put(ObjectType::Blob, Bytes::from_static(b"not a commit"))
            .unwrap();

        let err = database.parse_object_as_commit(&oid).unwrap_err();

        assert_eq!(
            err.downcast_ref::<DagitError>(),
            Some(&DagitError::TypeMismatch {
                oid,
                expected: ObjectType::Commit,
                found: ObjectType::Blob,
            })
        );
    }

    #[rstest]
    fn undecodable_tree_is_malformed(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database
            .put(ObjectType::Tree, Bytes::from_static(b"garbage\n"))
            .unwrap();

        let err = database.parse_object_as_tree(&oid).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DagitError>(),
            Some(DagitError::MalformedTree { .. })
        ));
    }

    #[rstest]
    fn commit_without_tree_is_malformed(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database
            .put(ObjectType::Commit, Bytes::from_static(b"\n\nmessage only"))
            .unwrap();

        let err = database.parse_object_as_commit(&oid).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DagitError>(),
            Some(DagitError::MalformedCommit { .. })
        ));
    }

    proptest! {
        #[test]
        fn ids_are_equal_iff_contents_are_equal(
            first in proptest::collection::vec(proptest::num::u8::ANY, 0..64),
            second in proptest::collection::vec(proptest::num::u8::ANY, 0..64),
        ) {
            let dir = TempDir::new().unwrap();
            let database = database(&dir);

            let first_oid = database.put(ObjectType::Blob, first.clone().into()).unwrap();
            let second_oid = database.put(ObjectType::Blob, second.clone().into()).unwrap();

            assert_eq!(first_oid == second_oid, first == second);
        }
    }
}
