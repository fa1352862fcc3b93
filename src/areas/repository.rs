//! Repository facade
//!
//! `Repository` wires the four on-disk components together and is the
//! receiver for every porcelain operation. State lives under a `.gogit`
//! directory at the repository root:
//!
//! - `objects/`: the content-addressed object database
//! - `refs/heads/`: branch references
//! - `HEAD`: the current branch pointer (or a bare hash when detached)
//! - `index`: the staging area

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Repository state directory name
pub const GOGIT_DIR: &str = ".gogit";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

/// Index file name
const INDEX_FILE: &str = "index";

pub struct Repository {
    /// Repository root path
    path: Box<Path>,
    /// Output writer (stdout in production, a buffer in tests)
    writer: RefCell<Box<dyn std::io::Write>>,
    /// Staging area
    index: Arc<Mutex<Index>>,
    /// Object database
    database: Database,
    /// Working directory
    workspace: Workspace,
    /// Reference manager
    refs: Refs,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .field("database", &self.database)
            .field("workspace", &self.workspace)
            .field("refs", &self.refs)
            .finish()
    }
}

impl Repository {
    /// Open a repository rooted at the given path.
    ///
    /// The path does not need to contain a `.gogit` directory yet; `init`
    /// is the operation that creates one.
    pub fn new(path: PathBuf, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.canonicalize()?;
        let gogit_path = path.join(GOGIT_DIR);

        let index = Index::new(gogit_path.join(INDEX_FILE).into_boxed_path());
        let database = Database::new(gogit_path.join(DATABASE_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(gogit_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    /// Locate the repository containing `start` by walking upward until a
    /// directory with a `.gogit` subdirectory is found.
    pub fn discover(start: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(GOGIT_DIR).is_dir() {
                return Self::new(current, writer);
            }

            if !current.pop() {
                anyhow::bail!("not a gogit repository (or any parent)");
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gogit_path(&self) -> PathBuf {
        self.path.join(GOGIT_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
