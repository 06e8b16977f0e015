use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::command::{dagit_stdout, repository_dir, run_dagit_command};
use common::file::{snapshot_files, write_generated_files};
use predicates::prelude::*;
use rstest::{fixture, rstest};

mod common;

#[fixture]
fn initialized_dir(repository_dir: TempDir) -> TempDir {
    run_dagit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

#[rstest]
fn write_tree_is_independent_of_creation_order() -> Result<(), Box<dyn std::error::Error>> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    for dir in [&first, &second] {
        run_dagit_command(dir.path(), &["init"]).assert().success();
    }

    first.child("a.txt").write_str("alpha")?;
    first.child("sub/b.txt").write_str("beta")?;
    first.child("sub/deeper/c.txt").write_str("gamma")?;

    second.child("sub/deeper/c.txt").write_str("gamma")?;
    second.child("sub/b.txt").write_str("beta")?;
    second.child("a.txt").write_str("alpha")?;

    assert_eq!(
        dagit_stdout(first.path(), &["write-tree"]),
        dagit_stdout(second.path(), &["write-tree"])
    );

    Ok(())
}

#[rstest]
fn write_tree_changes_with_content(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("a.txt").write_str("hello")?;
    let before = dagit_stdout(initialized_dir.path(), &["write-tree"]);

    initialized_dir.child("a.txt").write_str("world")?;
    let after = dagit_stdout(initialized_dir.path(), &["write-tree"]);

    assert_ne!(before, after);

    Ok(())
}

#[rstest]
fn tree_object_lists_sorted_entries(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("z.txt").write_str("hello")?;
    initialized_dir.child("dir/inner.txt").write_str("hello")?;
    let tree_id = dagit_stdout(initialized_dir.path(), &["write-tree"]);

    let content = dagit_stdout(
        initialized_dir.path(),
        &["cat-file", "--expect", "tree", tree_id.trim()],
    );
    let lines = content.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("blob b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0 z.txt"));
    assert!(lines[1].starts_with("tree ") && lines[1].ends_with(" dir"));

    Ok(())
}

#[rstest]
fn metadata_directory_is_never_snapshotted(
    initialized_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let empty_tree = dagit_stdout(initialized_dir.path(), &["write-tree"]);

    // writing the empty tree stored an object under .dagit, which must not
    // show up in the next snapshot
    assert_eq!(dagit_stdout(initialized_dir.path(), &["write-tree"]), empty_tree);

    Ok(())
}

#[rstest]
fn read_tree_round_trips_the_working_directory(
    initialized_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_generated_files(initialized_dir.path(), 3);
    write_generated_files(&initialized_dir.path().join("nested").join("dir"), 2);
    let original = snapshot_files(initialized_dir.path());
    let tree_id = dagit_stdout(initialized_dir.path(), &["write-tree"]);

    // rewrite, add and delete files, then restore
    initialized_dir.child("untracked.txt").write_str("untracked")?;
    initialized_dir.child("other/dir/file.txt").write_str("other")?;
    std::fs::remove_dir_all(initialized_dir.path().join("nested"))?;

    run_dagit_command(initialized_dir.path(), &["read-tree", tree_id.trim()])
        .assert()
        .success();

    assert_eq!(snapshot_files(initialized_dir.path()), original);
    initialized_dir
        .child("other")
        .assert(predicate::path::missing());
    assert_eq!(dagit_stdout(initialized_dir.path(), &["write-tree"]), tree_id);

    Ok(())
}

#[rstest]
fn read_tree_keeps_the_metadata_directory(
    initialized_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("a.txt").write_str("a")?;
    let tree_id = dagit_stdout(initialized_dir.path(), &["write-tree"]);

    run_dagit_command(initialized_dir.path(), &["read-tree", tree_id.trim()])
        .assert()
        .success();

    initialized_dir
        .child(".dagit/HEAD")
        .assert(predicate::path::is_file());
    initialized_dir.child("a.txt").assert("a");

    Ok(())
}

#[rstest]
fn read_tree_of_a_blob_fails_without_touching_files(
    initialized_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("a.txt").write_str("hello")?;
    let blob_id = dagit_stdout(initialized_dir.path(), &["hash-object", "a.txt"]);

    run_dagit_command(initialized_dir.path(), &["read-tree", blob_id.trim()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a blob, expected a tree"));

    initialized_dir.child("a.txt").assert("hello");

    Ok(())
}
