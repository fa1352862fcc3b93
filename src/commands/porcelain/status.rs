use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusReport;
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let report = StatusReport::gather(self, &index)?;

        match &report.branch {
            Some(branch) => writeln!(self.writer(), "On branch {branch}")?,
            None => writeln!(self.writer(), "HEAD detached")?,
        }

        if !report.staged.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            for (path, change) in &report.staged {
                writeln!(self.writer(), "\t{change}{path}")?;
            }
        }

        if !report.unstaged.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            for (path, change) in &report.unstaged {
                writeln!(self.writer(), "\t{change}{path}")?;
            }
        }

        if !report.untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            for path in &report.untracked {
                writeln!(self.writer(), "\t{path}")?;
            }
        }

        if report.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
        }

        Ok(())
    }
}
