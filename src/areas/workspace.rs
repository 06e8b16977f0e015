use crate::METADATA_DIR;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryKind::File => ObjectType::Blob,
            EntryKind::Directory => ObjectType::Tree,
        }
    }
}

/// A file or directory directly inside a workspace directory
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct WorkspaceEntry {
    pub name: String,
    /// Path relative to the workspace root
    pub path: PathBuf,
    pub kind: EntryKind,
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any component of `path` is the metadata directory
    pub fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            matches!(component, std::path::Component::Normal(name) if name == METADATA_DIR)
        })
    }

    /// List the files and directories directly inside `dir_path`
    ///
    /// The metadata directory is skipped, as is anything that is neither a
    /// regular file nor a directory (symlinks are not followed).
    pub fn list_dir(&self, dir_path: &Path) -> anyhow::Result<Vec<WorkspaceEntry>> {
        let absolute_path = self.path.join(dir_path);

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&absolute_path)
            .with_context(|| format!("Unable to list directory {}", absolute_path.display()))?
        {
            let entry = entry?;
            let relative_path = dir_path.join(entry.file_name());
            if Self::is_ignored(&relative_path) {
                continue;
            }

            let name = entry.file_name().into_string().map_err(|name| {
                anyhow::anyhow!("File name {name:?} in {} is not valid UTF-8", dir_path.display())
            })?;

            let file_type = entry.file_type()?;
            let kind = if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                tracing::debug!(path = %relative_path.display(), "skipping special file");
                continue;
            };

            entries.push(WorkspaceEntry::new(name, relative_path, kind));
        }

        Ok(entries)
    }

    /// Everything in the workspace except the metadata directory, children
    /// listed before their parent directory
    pub fn list_contents_deepest_first(&self) -> anyhow::Result<Vec<WorkspaceEntry>> {
        // walk pre-order so the metadata directory is pruned, then reverse:
        // every descendant ends up ahead of its ancestors
        let mut entries = WalkDir::new(&self.path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR)
            .map(|entry| -> anyhow::Result<WorkspaceEntry> {
                let entry = entry?;
                let relative_path = entry.path().strip_prefix(&self.path)?.to_path_buf();
                let kind = if entry.file_type().is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };

                Ok(WorkspaceEntry::new(
                    entry.file_name().to_string_lossy().to_string(),
                    relative_path,
                    kind,
                ))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        entries.reverse();
        Ok(entries)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content.into())
    }

    /// Write `data` to `file_path`, creating its parent directories as needed
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    // Files go first, then directories deepest first, then the new files are
    // written (creating whatever directories they need).
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for file_path in migration.removals() {
            std::fs::remove_file(self.path.join(file_path))
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        for dir_path in migration.rmdirs() {
            self.remove_directory(dir_path)?;
        }

        for (file_path, oid) in migration.writes() {
            let data = migration.load_blob_data(oid)?;
            self.write_file(file_path, &data)?;
        }

        Ok(())
    }

    // A directory still holding excluded content (a nested metadata directory)
    // cannot be removed; that is expected and left in place.
    fn remove_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        match std::fs::remove_dir(self.path.join(dir_path)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::DirectoryNotEmpty => {
                tracing::debug!(path = %dir_path.display(), "keeping non-empty directory");
                Ok(())
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove directory: {:?}", dir_path))
            }
        }
    }
}
