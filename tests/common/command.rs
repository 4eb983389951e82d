use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Initialized repository holding one commit of `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_rev_command(repository_dir.path(), &["init"])
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

    run_rev_command(repository_dir.path(), &["add", "1.txt", "a/2.txt", "a/b/3.txt"])
        .assert()
        .success();

    rev_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// Initialized repository with three commits, each adding one file
#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_rev_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (index, message) in ["First commit", "Second commit", "Third commit"]
        .iter()
        .enumerate()
    {
        let file_name = format!("file{}.txt", index + 1);
        let file = FileSpec::new(
            repository_dir.path().join(&file_name),
            format!("content {}", index + 1),
        );
        write_file(file);

        run_rev_command(repository_dir.path(), &["add", &file_name])
            .assert()
            .success();
        rev_commit(repository_dir.path(), message)
            .assert()
            .success();
    }

    repository_dir
}

pub fn run_rev_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("rev").expect("Failed to find rev binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("REV_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn rev_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_rev_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("REV_AUTHOR_NAME", AUTHOR_NAME),
        ("REV_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("REV_AUTHOR_DATE", AUTHOR_DATE), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is not UTF-8")
}

/// Get the current head commit SHA, following the branch when head is symbolic
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".rev").join("head");
    let head_content = std::fs::read_to_string(head_path)?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".rev").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}
