use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// With a name, create a branch at the current HEAD commit; without
    /// one, list branches marking the current with `*`
    pub async fn branch(&mut self, name: Option<&str>) -> anyhow::Result<()> {
        match name {
            Some(name) => self.create_branch(name),
            None => self.list_branches(),
        }
    }

    fn list_branches(&mut self) -> anyhow::Result<()> {
        let branches = self.refs().list_branches()?;
        let current = self.refs().current_branch()?;

        for branch in branches {
            if Some(&branch) == current.as_ref() {
                writeln!(self.writer(), "* {branch}")?;
            } else {
                writeln!(self.writer(), "  {branch}")?;
            }
        }

        Ok(())
    }

    fn create_branch(&mut self, name: &str) -> anyhow::Result<()> {
        if self.refs().read_ref(&Refs::branch_ref(name))?.is_some() {
            anyhow::bail!("branch '{}' already exists", name);
        }

        let head_oid = self
            .refs()
            .resolve_head()?
            .ok_or_else(|| anyhow::anyhow!("cannot create branch: no commits yet"))?;

        self.refs().write_ref(&Refs::branch_ref(name), &head_oid)?;

        writeln!(
            self.writer(),
            "Created branch '{}' at {}",
            name,
            head_oid.to_short_oid()
        )?;

        Ok(())
    }
}
