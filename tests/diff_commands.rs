use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{committed_repository_dir, repository_dir, run_gogit_command};
use common::file::{FileSpec, write_file};

#[rstest]
fn clean_tree_diffs_to_nothing(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    run_gogit_command(dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[rstest]
fn modified_line_renders_a_unified_hunk(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.path().join("poem.txt"),
        "one\ntwo\nthree\nfour\nfive\nsix\nseven\n".to_string(),
    ));
    run_gogit_command(dir.path(), &["add", "poem.txt"])
        .assert()
        .success();

    write_file(FileSpec::new(
        dir.path().join("poem.txt"),
        "one\ntwo\nthree\nFOUR\nfive\nsix\nseven\n".to_string(),
    ));

    run_gogit_command(dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- a/poem.txt"))
        .stdout(predicate::str::contains("+++ b/poem.txt"))
        .stdout(predicate::str::contains("@@ -1,7 +1,7 @@"))
        .stdout(predicate::str::contains("-four"))
        .stdout(predicate::str::contains("+FOUR"))
        .stdout(predicate::str::contains(" three"))
        .stdout(predicate::str::contains(" five"));
}

#[rstest]
fn deleted_file_renders_as_a_full_removal(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    std::fs::remove_file(dir.path().join("hello.txt")).unwrap();

    run_gogit_command(dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- a/hello.txt"))
        .stdout(predicate::str::contains("+++ b/hello.txt"))
        .stdout(predicate::str::contains("@@ -1,2 +0,0 @@"))
        .stdout(predicate::str::contains("-hi"));
}

#[rstest]
fn distant_changes_produce_separate_hunks(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    let original: String = (1..=30).map(|n| format!("line{n}\n")).collect();
    write_file(FileSpec::new(dir.path().join("long.txt"), original.clone()));
    run_gogit_command(dir.path(), &["add", "long.txt"])
        .assert()
        .success();

    let edited = original
        .replace("line3\n", "LINE3\n")
        .replace("line25\n", "LINE25\n");
    write_file(FileSpec::new(dir.path().join("long.txt"), edited));

    let assertion = run_gogit_command(dir.path(), &["diff"]).assert().success();
    let stdout = String::from_utf8(assertion.get_output().stdout.clone()).unwrap();

    pretty_assertions::assert_eq!(stdout.matches("@@ -").count(), 2);
}

#[rstest]
fn staged_matching_content_is_silent(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    // stat-only change: rewritten identical content hashes the same
    write_file(FileSpec::new(dir.path().join("hello.txt"), "hi\n".to_string()));

    run_gogit_command(dir.path(), &["diff"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
