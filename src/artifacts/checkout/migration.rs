//! Checkout planning
//!
//! Replacing the working directory with a tree happens in two phases. The
//! plan is computed first: the target tree is fully decoded and every blob it
//! names is confirmed to exist. Only a complete plan is handed to the
//! workspace, so a missing or malformed object leaves the working directory
//! untouched.
//!
//! Applying a plan removes every file outside the metadata directory, then
//! every directory that became empty (deepest first), then writes the tree's
//! files. Untracked files are not preserved.

use crate::areas::database::Database;
use crate::areas::workspace::{EntryKind, Workspace};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{FlatTree, Tree};
use crate::errors::DagitError;
use bytes::Bytes;
use std::path::{Path, PathBuf};

pub struct Migration<'r> {
    database: &'r Database,
    /// Files currently in the workspace, all of them removed
    removals: Vec<PathBuf>,
    /// Directories currently in the workspace, children before parents
    rmdirs: Vec<PathBuf>,
    /// Files of the target tree
    target: FlatTree,
}

impl<'r> Migration<'r> {
    pub fn plan(
        database: &'r Database,
        workspace: &Workspace,
        tree_oid: &ObjectId,
    ) -> anyhow::Result<Self> {
        let target = Tree::read_flat(database, tree_oid)?;

        for (path, oid) in &target {
            let found = database.object_type(oid).inspect_err(|_| {
                tracing::debug!(%path, %oid, "target tree names a missing blob");
            })?;
            if found != ObjectType::Blob {
                anyhow::bail!(DagitError::TypeMismatch {
                    oid: oid.clone(),
                    expected: ObjectType::Blob,
                    found,
                });
            }
        }

        let (files, dirs): (Vec<_>, Vec<_>) = workspace
            .list_contents_deepest_first()?
            .into_iter()
            .partition(|entry| entry.kind == EntryKind::File);

        let migration = Migration {
            database,
            removals: files.into_iter().map(|entry| entry.path).collect(),
            rmdirs: dirs.into_iter().map(|entry| entry.path).collect(),
            target,
        };

        tracing::debug!(
            tree = %tree_oid,
            removals = migration.removals.len(),
            rmdirs = migration.rmdirs.len(),
            writes = migration.target.len(),
            "planned checkout"
        );

        Ok(migration)
    }

    pub fn removals(&self) -> &[PathBuf] {
        &self.removals
    }

    pub fn rmdirs(&self) -> &[PathBuf] {
        &self.rmdirs
    }

    /// Files to write, in path order
    pub fn writes(&self) -> impl Iterator<Item = (&Path, &ObjectId)> {
        self.target
            .iter()
            .map(|(path, oid)| (Path::new(path.as_str()), oid))
    }

    pub fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        Ok(self.database.parse_object_as_blob(oid)?.into_content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::tree::TreeEntry;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    struct Fixture {
        dir: TempDir,
        database: Database,
        workspace: Workspace,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let database = Database::new(dir.path().join(".dagit/objects").into_boxed_path());
        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());

        Fixture {
            dir,
            database,
            workspace,
        }
    }

    fn oid(id: &str) -> ObjectId {
        ObjectId::try_parse(id.to_string()).unwrap()
    }

    #[rstest]
    fn plan_lists_workspace_contents_and_target_files(fixture: Fixture) {
        fixture.dir.child("old.txt").write_str("old").unwrap();
        fixture.dir.child("d/e/f.txt").write_str("f").unwrap();
        let tree_oid = Tree::write_directory(&fixture.database, &fixture.workspace, Path::new(""))
            .unwrap();

        let migration = Migration::plan(&fixture.database, &fixture.workspace, &tree_oid).unwrap();

        assert_eq!(
            migration.removals(),
            &[PathBuf::from("old.txt"), PathBuf::from("d/e/f.txt")]
        );
        assert_eq!(migration.rmdirs(), &[PathBuf::from("d/e"), PathBuf::from("d")]);
        assert_eq!(
            migration
                .writes()
                .map(|(path, _)| path.to_path_buf())
                .collect::<Vec<_>>(),
            vec![PathBuf::from("d/e/f.txt"), PathBuf::from("old.txt")]
        );
    }

    #[rstest]
    fn missing_blob_fails_the_plan(fixture: Fixture) {
        let missing = oid("dddddddddddddddddddddddddddddddddddddddd");
        let tree = Tree::try_new(vec![TreeEntry::new(
            ObjectType::Blob,
            missing.clone(),
            "gone.txt".to_string(),
        )])
        .unwrap();
        let tree_oid = fixture.database.store(&tree).unwrap();

        let err = Migration::plan(&fixture.database, &fixture.workspace, &tree_oid)
            .err()
            .unwrap();

        assert_eq!(
            err.downcast_ref::<DagitError>(),
            Some(&DagitError::ObjectNotFound(missing))
        );
    }

    #[rstest]
    fn blob_entry_naming_a_tree_fails_before_touching_the_workspace(fixture: Fixture) {
        fixture.dir.child("current.txt").write_str("current").unwrap();
        let subtree_oid = fixture.database.store(&Tree::default()).unwrap();
        let tree = Tree::try_new(vec![TreeEntry::new(
            ObjectType::Blob,
            subtree_oid.clone(),
            "not-a-file".to_string(),
        )])
        .unwrap();
        let tree_oid = fixture.database.store(&tree).unwrap();

        let err = Migration::plan(&fixture.database, &fixture.workspace, &tree_oid)
            .err()
            .unwrap();

        assert_eq!(
            err.downcast_ref::<DagitError>(),
            Some(&DagitError::TypeMismatch {
                oid: subtree_oid,
                expected: ObjectType::Blob,
                found: ObjectType::Tree,
            })
        );
        fixture.dir.child("current.txt").assert("current");
    }

    #[rstest]
    fn directory_holding_nested_metadata_is_kept(fixture: Fixture) {
        let tree_oid = fixture.database.store(&Tree::default()).unwrap();
        fixture.dir.child("sub/.dagit/keep").write_str("kept").unwrap();
        fixture.dir.child("sub/x.txt").write_str("x").unwrap();

        let migration = Migration::plan(&fixture.database, &fixture.workspace, &tree_oid).unwrap();
        fixture.workspace.apply_migration(&migration).unwrap();

        fixture.dir.child("sub/.dagit/keep").assert("kept");
        fixture
            .dir
            .child("sub/x.txt")
            .assert(predicates::path::missing());
    }

    #[rstest]
    fn applying_a_plan_replaces_the_workspace(fixture: Fixture) {
        fixture.dir.child("keep/a.txt").write_str("a").unwrap();
        let tree_oid = Tree::write_directory(&fixture.database, &fixture.workspace, Path::new(""))
            .unwrap();
        fixture.dir.child("keep/a.txt").write_str("changed").unwrap();
        fixture.dir.child("extra/b.txt").write_str("b").unwrap();

        let migration = Migration::plan(&fixture.database, &fixture.workspace, &tree_oid).unwrap();
        fixture.workspace.apply_migration(&migration).unwrap();

        fixture.dir.child("keep/a.txt").assert("a");
        fixture
            .dir
            .child("extra")
            .assert(predicates::path::missing());
        fixture
            .dir
            .child(".dagit/objects")
            .assert(predicates::path::is_dir());
    }
}
