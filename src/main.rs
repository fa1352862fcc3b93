use crate::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};
use clap::error::ErrorKind;

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "gogit",
    version = "0.1.0",
    about = "A minimal, Git-compatible version control engine",
    long_about = "gogit is a minimal version control engine speaking a Git-compatible \
    object format. It keeps its state under a .gogit directory and supports the \
    everyday porcelain: init, add, status, commit, log, diff, branch, checkout and merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create a new repository in the current directory")]
    Init,
    #[command(name = "add", about = "Add files or directories to the staging index")]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(name = "commit", about = "Record the staged changes as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the commit history from HEAD")]
    Log,
    #[command(name = "diff", about = "Show unstaged changes as a unified diff")]
    Diff,
    #[command(name = "branch", about = "List branches, or create one at HEAD")]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
    },
    #[command(name = "checkout", about = "Switch to another branch")]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to")]
        branch: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current one")]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        let code = match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        };
        let _ = error.print();
        std::process::exit(code);
    });

    match &cli.command {
        Commands::Init => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::new(pwd, Box::new(std::io::stdout()))?;

            repository.init()?
        }
        Commands::Add { paths } => {
            let mut repository = discovered_repository()?;

            repository.add(paths).await?
        }
        Commands::Status => {
            let mut repository = discovered_repository()?;

            repository.status().await?
        }
        Commands::Commit { message } => {
            let mut repository = discovered_repository()?;

            repository.commit(message).await?
        }
        Commands::Log => {
            let mut repository = discovered_repository()?;

            repository.log().await?
        }
        Commands::Diff => {
            let mut repository = discovered_repository()?;

            repository.diff().await?
        }
        Commands::Branch { name } => {
            let mut repository = discovered_repository()?;

            repository.branch(name.as_deref()).await?
        }
        Commands::Checkout { branch } => {
            let mut repository = discovered_repository()?;

            repository.checkout(branch).await?
        }
        Commands::Merge { branch } => {
            let mut repository = discovered_repository()?;

            repository.merge(branch).await?
        }
    }

    Ok(())
}

/// Open the repository enclosing the current directory
fn discovered_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::discover(&pwd, Box::new(std::io::stdout()))
}
