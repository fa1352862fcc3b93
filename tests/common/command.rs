use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit: `hello.txt` containing `hi\n`
#[fixture]
pub fn committed_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gogit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("hello.txt"),
        "hi\n".to_string(),
    ));

    run_gogit_command(repository_dir.path(), &["add", "hello.txt"])
        .assert()
        .success();

    gogit_commit(repository_dir.path(), "first").assert().success();

    repository_dir
}

pub fn run_gogit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gogit").expect("Failed to find gogit binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

#[derive(Debug, Clone, new)]
struct RandomAuthor {
    name: String,
    email: String,
}

fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>().replace(" ", "_");
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}

pub fn gogit_commit(dir: &Path, message: &str) -> Command {
    let author = generate_random_author();
    let mut cmd = run_gogit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GOGIT_AUTHOR_NAME", &author.name),
        ("GOGIT_AUTHOR_EMAIL", &author.email),
    ]);
    cmd
}
