//! File and directory modes
//!
//! Only three modes exist on the wire: regular files (`100644`),
//! executable files (`100755`) and subdirectories (`40000`). Tree
//! objects carry the octal ASCII form, index entries the numeric one.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Directory,
    File(FileMode),
}

impl EntryMode {
    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::Directory => 0o40000,
            EntryMode::File(FileMode::Regular) => 0o100644,
            EntryMode::File(FileMode::Executable) => 0o100755,
        }
    }

    /// Octal ASCII form used in tree entries (no leading zero)
    pub fn as_octal_str(&self) -> String {
        format!("{:o}", self.as_u32())
    }

    pub fn from_octal_str(mode: &str) -> anyhow::Result<Self> {
        let mode = u32::from_str_radix(mode, 8)
            .map_err(|_| anyhow::anyhow!("invalid entry mode: {}", mode))?;
        Ok(mode.into())
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl From<u32> for EntryMode {
    fn from(mode: u32) -> Self {
        if mode == 0o40000 {
            EntryMode::Directory
        } else if mode & 0o111 != 0 {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        }
    }
}
