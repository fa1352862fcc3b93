use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Stage the given paths.
    ///
    /// Files are hashed into the object store and upserted into the
    /// index; directories are walked (skipping `.gogit`); paths that no
    /// longer exist are removed from the index.
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        for input_path in paths {
            let absolute_path = match Path::new(input_path).canonicalize() {
                Ok(path) => path,
                Err(_) => {
                    // the file is gone: unstage whatever was there
                    let absolute = std::path::absolute(input_path)?;
                    let relative = self.workspace().relativize(&absolute)?;
                    index.remove(&relative);
                    continue;
                }
            };

            for path in self.workspace().list_files(Some(absolute_path))? {
                let Ok(data) = self.workspace().read_file(&path) else {
                    // unreadable files are ignored rather than aborting the add
                    continue;
                };

                let stat = self.workspace().stat_file(&path)?;

                let blob = Blob::new(data);
                let blob_oid = self.database().store(&blob)?;

                let relative = path.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");
                writeln!(self.writer(), "add '{relative}'")?;
                index.add(IndexEntry::new(relative, blob_oid, stat));
            }
        }

        index.write_updates()?;

        Ok(())
    }
}
