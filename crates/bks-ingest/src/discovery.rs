//! Dataset folder discovery.

use std::path::{Path, PathBuf};

use bks_model::SourceKind;

use crate::error::{IngestError, Result};

/// Locations of the three source artifacts of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub books: PathBuf,
    pub users: PathBuf,
    pub orders: PathBuf,
}

impl SourcePaths {
    /// Conventional file names inside `dir`.
    pub fn in_folder(dir: &Path) -> Self {
        Self {
            books: dir.join(SourceKind::Books.file_name()),
            users: dir.join(SourceKind::Users.file_name()),
            orders: dir.join(SourceKind::Orders.file_name()),
        }
    }

    pub fn path(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Books => &self.books,
            SourceKind::Users => &self.users,
            SourceKind::Orders => &self.orders,
        }
    }

    /// Sources whose artifact is not a file.
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| !self.path(*kind).is_file())
            .collect()
    }
}

/// Resolve the source paths of a dataset folder.
pub fn discover_dataset(dir: &Path) -> Result<SourcePaths> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    Ok(SourcePaths::in_folder(dir))
}

/// Lists the sub-folders of `base` that contain at least one source artifact.
///
/// Returns folders sorted by name.
pub fn list_dataset_folders(base: &Path) -> Result<Vec<PathBuf>> {
    if !base.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: base.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(base).map_err(|e| IngestError::DirectoryRead {
        path: base.to_path_buf(),
        source: e,
    })?;

    let mut folders = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: base.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let paths = SourcePaths::in_folder(&path);
        if paths.missing().len() < SourceKind::ALL.len() {
            folders.push(path);
        }
    }

    folders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reports_missing_sources() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("books.yaml"), "[]").unwrap();
        let paths = discover_dataset(dir.path()).unwrap();
        assert_eq!(paths.missing(), vec![SourceKind::Users, SourceKind::Orders]);
    }

    #[test]
    fn lists_dataset_folders_sorted() {
        let base = TempDir::new().unwrap();
        for name in ["DATA3", "DATA1", "empty"] {
            std::fs::create_dir(base.path().join(name)).unwrap();
        }
        std::fs::write(base.path().join("DATA3/users.csv"), "id\n").unwrap();
        std::fs::write(base.path().join("DATA1/books.yaml"), "[]").unwrap();
        std::fs::write(base.path().join("notes.txt"), "x").unwrap();

        let folders = list_dataset_folders(base.path()).unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["DATA1", "DATA3"]);
    }

    #[test]
    fn missing_base_is_an_error() {
        let err = list_dataset_folders(Path::new("/nonexistent/base")).unwrap_err();
        assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
    }
}
