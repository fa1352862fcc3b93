use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Walk the first-parent chain from HEAD, printing each commit
    pub async fn log(&mut self) -> anyhow::Result<()> {
        let Some(mut cursor) = self.refs().resolve_head()? else {
            writeln!(self.writer(), "No commits yet")?;
            return Ok(());
        };

        loop {
            let commit = self.database().load_commit(&cursor)?;

            writeln!(self.writer(), "{}", format!("commit {cursor}").yellow())?;
            writeln!(self.writer(), "Author: {}", commit.author().display())?;
            writeln!(self.writer())?;
            writeln!(self.writer(), "    {}", commit.message())?;
            writeln!(self.writer())?;

            match commit.parent() {
                Some(parent) => cursor = parent.clone(),
                None => break,
            }
        }

        Ok(())
    }
}
