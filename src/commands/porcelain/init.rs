use crate::areas::refs::{DEFAULT_BRANCH, Refs};
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        let gogit_path = self.gogit_path();

        if gogit_path.exists() {
            anyhow::bail!("already a gogit repository: {}", gogit_path.display());
        }

        fs::create_dir_all(gogit_path.join("objects"))
            .context("failed to create objects directory")?;
        fs::create_dir_all(gogit_path.join("refs").join("heads"))
            .context("failed to create refs directory")?;

        self.refs()
            .update_head(&Refs::symref_to(DEFAULT_BRANCH))
            .context("failed to write HEAD file")?;

        writeln!(
            self.writer(),
            "Initialized empty gogit repository in {}",
            gogit_path.display()
        )?;

        Ok(())
    }
}
