use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_dagit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    dagit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_dagit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("dagit").expect("Failed to find dagit binary");
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("DAGIT_LOG");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn dagit_commit(dir: &Path, message: &str) -> Command {
    run_dagit_command(dir, &["commit", "-m", message])
}

/// Stdout of a command that is expected to succeed
pub fn dagit_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_dagit_command(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("stdout is not valid UTF-8")
}

/// Raw content of a ref file, empty if it does not exist
pub fn read_ref(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(".dagit").join(name)).unwrap_or_default()
}

/// Commit ID HEAD currently resolves to
pub fn get_head_commit_sha(dir: &Path) -> String {
    let head_content = read_ref(dir, "HEAD");

    match head_content.strip_prefix("ref: ") {
        Some(ref_path) => read_ref(dir, ref_path.trim()).trim().to_string(),
        None => head_content.trim().to_string(),
    }
}

/// Commit everything in the working directory and return the new commit ID
pub fn commit_all(dir: &Path, message: &str) -> String {
    dagit_commit(dir, message).assert().success();
    get_head_commit_sha(dir)
}
