use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{committed_repository_dir, repository_dir, run_gogit_command};
use common::read_branch_ref;

#[rstest]
fn new_branch_points_at_the_current_head(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    run_gogit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created branch 'feature' at"));

    pretty_assertions::assert_eq!(
        read_branch_ref(dir.path(), "feature"),
        read_branch_ref(dir.path(), "main")
    );
}

#[rstest]
fn duplicate_branch_names_are_rejected(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    run_gogit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    run_gogit_command(dir.path(), &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch 'feature' already exists"));
}

#[rstest]
fn branching_an_unborn_head_fails(repository_dir: TempDir) {
    let dir = repository_dir;
    run_gogit_command(dir.path(), &["init"]).assert().success();

    run_gogit_command(dir.path(), &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no commits yet"));
}

#[rstest]
fn listing_marks_the_current_branch(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    run_gogit_command(dir.path(), &["branch", "feature"])
        .assert()
        .success();

    run_gogit_command(dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* main"))
        .stdout(predicate::str::contains("  feature"));
}

#[rstest]
fn listing_is_sorted_by_name(committed_repository_dir: TempDir) {
    let dir = committed_repository_dir;

    for name in ["zeta", "alpha", "midway"] {
        run_gogit_command(dir.path(), &["branch", name])
            .assert()
            .success();
    }

    let assertion = run_gogit_command(dir.path(), &["branch"]).assert().success();
    let stdout = String::from_utf8(assertion.get_output().stdout.clone()).unwrap();

    let names: Vec<&str> = stdout.lines().map(|line| &line[2..]).collect();
    pretty_assertions::assert_eq!(names, ["alpha", "main", "midway", "zeta"]);
}
