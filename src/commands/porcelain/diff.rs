use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_algorithm::diff_lines;
use crate::artifacts::diff::hunk::build_hunks;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Unified diff of the working tree against the index.
    ///
    /// Files whose blob hash matches the staged hash are silent; deleted
    /// files render as full removals; unreadable blobs are skipped.
    pub async fn diff(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        for entry in index.entries() {
            let entry_path = Path::new(&entry.path);

            if !self.workspace().file_exists(entry_path) {
                let Ok(Some(old_blob)) = self.database().parse_object_as_blob(&entry.oid) else {
                    continue;
                };
                self.print_file_removal(&entry.path, old_blob.content())?;
                continue;
            }

            let Ok(current) = self.workspace().read_file(entry_path) else {
                continue;
            };

            let current_oid = Blob::new(current.clone()).object_id()?;
            if current_oid == entry.oid {
                continue;
            }

            let Ok(Some(old_blob)) = self.database().parse_object_as_blob(&entry.oid) else {
                continue;
            };

            self.print_file_diff(&entry.path, old_blob.content(), &current)?;
        }

        Ok(())
    }

    fn print_file_headers(&self, path: &str) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", format!("--- a/{path}").bold())?;
        writeln!(self.writer(), "{}", format!("+++ b/{path}").bold())?;
        Ok(())
    }

    fn print_file_removal(&self, path: &str, old_content: &[u8]) -> anyhow::Result<()> {
        self.print_file_headers(path)?;

        let old_text = String::from_utf8_lossy(old_content);
        let old_lines: Vec<&str> = old_text.split('\n').collect();

        writeln!(self.writer(), "@@ -1,{} +0,0 @@", old_lines.len())?;
        for line in old_lines {
            writeln!(self.writer(), "{}", format!("-{line}").red())?;
        }

        Ok(())
    }

    fn print_file_diff(
        &self,
        path: &str,
        old_content: &[u8],
        new_content: &[u8],
    ) -> anyhow::Result<()> {
        self.print_file_headers(path)?;

        let old_text = String::from_utf8_lossy(old_content);
        let new_text = String::from_utf8_lossy(new_content);
        let old_lines: Vec<&str> = old_text.split('\n').collect();
        let new_lines: Vec<&str> = new_text.split('\n').collect();

        let edits = diff_lines(&old_lines, &new_lines);
        for line in build_hunks(&edits) {
            let rendered = match line.as_bytes().first() {
                Some(b'+') => line.green().to_string(),
                Some(b'-') => line.red().to_string(),
                Some(b'@') => line.cyan().to_string(),
                _ => line,
            };
            writeln!(self.writer(), "{rendered}")?;
        }

        Ok(())
    }
}
