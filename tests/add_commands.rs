use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

use common::blob_hash;
use common::command::{committed_repository_dir, gogit_commit, repository_dir, run_gogit_command};
use common::file::{FileSpec, write_file};

#[rstest]
fn add_stages_a_single_file(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("hello.txt"), "hi\n".to_string()));

    run_gogit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add 'hello.txt'"));

    run_gogit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("new file:   hello.txt"));
}

#[rstest]
fn add_writes_the_blob_into_the_object_store(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("hello.txt"), "hi\n".to_string()));

    run_gogit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    let hash = blob_hash(b"hi\n");
    let object_path = dir
        .path()
        .join(".gogit")
        .join("objects")
        .join(&hash[..2])
        .join(&hash[2..]);
    assert!(object_path.is_file(), "missing object for blob {hash}");

    let framed = common::decompress_object(dir.path(), &hash);
    pretty_assertions::assert_eq!(framed, b"blob 3\0hi\n");
}

#[rstest]
fn add_walks_directories_and_skips_the_state_directory(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("top.txt"), "top".to_string()));
    write_file(FileSpec::new(
        dir.path().join("nested").join("deep").join("file.txt"),
        "deep".to_string(),
    ));

    run_gogit_command(dir.path(), &["add", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("add 'top.txt'"))
        .stdout(predicate::str::contains("add 'nested/deep/file.txt'"))
        .stdout(predicate::str::contains("HEAD").not());

    run_gogit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("new file:   nested/deep/file.txt"))
        .stdout(predicate::str::contains("new file:   top.txt"));
}

#[rstest]
fn re_adding_a_changed_file_replaces_its_entry(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    write_file(FileSpec::new(dir.path().join("hello.txt"), "bye\n".to_string()));

    run_gogit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    // the single entry now carries the new blob; nothing is left unstaged
    let status = run_gogit_command(dir.path(), &["status"]).assert().success();
    let stdout = String::from_utf8(status.get_output().stdout.clone()).unwrap();
    pretty_assertions::assert_eq!(stdout.matches("hello.txt").count(), 1);
    assert!(stdout.contains("modified:   hello.txt"));
    assert!(!stdout.contains("not staged"));

    let hash = blob_hash(b"bye\n");
    let object_path = dir
        .path()
        .join(".gogit")
        .join("objects")
        .join(&hash[..2])
        .join(&hash[2..]);
    assert!(object_path.is_file());
}

#[rstest]
fn adding_a_deleted_path_unstages_it(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    std::fs::remove_file(dir.path().join("hello.txt")).unwrap();

    run_gogit_command(dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    run_gogit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted:    hello.txt"));
}

#[rstest]
fn executable_files_are_staged_with_their_mode(repository_dir: TempDir) {
    use std::os::unix::fs::PermissionsExt;

    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    let script = dir.path().join("run.sh");
    write_file(FileSpec::new(script.clone(), "#!/bin/sh\n".to_string()));
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    run_gogit_command(dir.path(), &["add", "run.sh"])
        .assert()
        .success();
    gogit_commit(dir.path(), "add script").assert().success();

    let head_hash = common::read_branch_ref(dir.path(), "main");
    let commit_text = String::from_utf8(common::decompress_object(dir.path(), &head_hash)).unwrap();
    let tree_hash = commit_text
        .lines()
        .next()
        .and_then(|line| line.split_once("tree "))
        .map(|(_, hash)| hash.to_string())
        .unwrap();

    let tree_bytes = common::decompress_object(dir.path(), &tree_hash);
    let needle = b"100755 run.sh\0";
    assert!(
        tree_bytes
            .windows(needle.len())
            .any(|window| window == needle),
        "tree entry does not carry the executable mode"
    );
}

#[rstest]
fn add_requires_a_path_argument(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    run_gogit_command(dir.path(), &["add"]).assert().failure();
}

#[rstest]
fn staged_content_survives_further_edits(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(dir.path().join("note.txt"), "v1\n".to_string()));
    run_gogit_command(dir.path(), &["add", "note.txt"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.path().join("note.txt"), "v2\n".to_string()));
    gogit_commit(dir.path(), "snapshot of v1").assert().success();

    // the committed tree holds v1, the working tree v2
    run_gogit_command(dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("modified:   note.txt"));
}
