use crate::common::command::{init_repository_dir, run_rev_command, stdout_of};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use filetime::FileTime;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn status(dir: &TempDir) -> String {
    stdout_of(&mut run_rev_command(dir.path(), &["status"]))
}

#[rstest]
fn print_nothing_when_no_files_are_changed(init_repository_dir: TempDir) {
    assert_eq!(status(&init_repository_dir), "");
}

#[rstest]
fn print_nothing_if_a_file_is_touched(init_repository_dir: TempDir) {
    let path = init_repository_dir.path().join("1.txt");
    filetime::set_file_mtime(&path, FileTime::from_unix_time(1_000_000_000, 0)).unwrap();

    assert_eq!(status(&init_repository_dir), "");
}

#[rstest]
fn report_files_with_modified_contents(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "modified one".to_string()));
    write_file(FileSpec::new(
        dir.path().join("a").join("2.txt"),
        "modified two".to_string(),
    ));

    assert_eq!(status(&dir), " M 1.txt\n M a/2.txt\n");
}

#[rstest]
fn report_modified_files_with_unchanged_size(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "eno".to_string()));

    assert_eq!(status(&dir), " M 1.txt\n");
}

#[rstest]
fn report_deleted_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    delete_path(&dir.path().join("a"));

    assert_eq!(status(&dir), " D a/2.txt\n D a/b/3.txt\n");
}

#[rstest]
fn list_untracked_files_in_name_order(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("file.txt"), "new".to_string()));
    write_file(FileSpec::new(dir.path().join("another.txt"), "new".to_string()));
    write_file(FileSpec::new(
        dir.path().join("a").join("inner.txt"),
        "new".to_string(),
    ));

    assert_eq!(
        status(&dir),
        "?? a/inner.txt\n?? another.txt\n?? file.txt\n"
    );
}

#[rstest]
fn report_every_kind_of_change_in_path_order(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "changed".to_string()));
    delete_path(&dir.path().join("a").join("2.txt"));
    write_file(FileSpec::new(dir.path().join("0.txt"), "untracked".to_string()));

    assert_eq!(status(&dir), "?? 0.txt\n M 1.txt\n D a/2.txt\n");
}

#[rstest]
fn status_leaves_the_index_untouched(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let index_path = dir.path().join(".rev").join("index");
    let before = std::fs::read(&index_path).unwrap();
    write_file(FileSpec::new(dir.path().join("1.txt"), "changed".to_string()));

    status(&dir);

    assert_eq!(std::fs::read(&index_path).unwrap(), before);
}
