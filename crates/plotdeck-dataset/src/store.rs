//! Directory-backed dataset CRUD.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DatasetError;
use crate::table::DataTable;

const EXTENSION: &str = ".csv";

/// File-system store for named CSV datasets.
///
/// Request-facing names use hyphens, storage names use underscores; the
/// mapping is a literal substring replacement and is lossy for names that
/// legitimately contain both characters. This matches the upstream naming
/// contract and is deliberately not fixed.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    data_dir: PathBuf,
}

impl DatasetStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Request-facing name → storage filename (`my-data` → `my_data.csv`).
    pub fn storage_name(dataset: &str) -> String {
        format!("{}{}", dataset.replace('-', "_"), EXTENSION)
    }

    /// Storage filename → request-facing name (`my_data.csv` → `my-data`).
    pub fn dataset_name(filename: &str) -> String {
        filename
            .strip_suffix(EXTENSION)
            .unwrap_or(filename)
            .replace('_', "-")
    }

    /// Load a dataset by request-facing name.
    pub fn load(&self, dataset: &str) -> Result<DataTable, DatasetError> {
        let filename = Self::storage_name(dataset);
        let path = self.data_dir.join(&filename);
        if !path.is_file() {
            return Err(DatasetError::NotFound(filename));
        }
        debug!(dataset, file = %path.display(), "loading dataset");
        DataTable::from_csv_path(dataset, &path)
    }

    /// Request-facing names of every stored dataset, sorted.
    pub fn list_datasets(&self) -> Result<Vec<String>, DatasetError> {
        let mut names: Vec<String> = self
            .list_files()?
            .iter()
            .map(|f| Self::dataset_name(f))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Raw `.csv` filenames in the data directory, sorted. Creates the
    /// directory on first use.
    pub fn list_files(&self) -> Result<Vec<String>, DatasetError> {
        self.ensure_dir()?;
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(EXTENSION) && entry.path().is_file() {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Store an uploaded file. The extension gate runs before any disk
    /// write; a same-named file is silently overwritten.
    pub fn save_upload(&self, filename: &str, bytes: &[u8]) -> Result<(), DatasetError> {
        check_single_component(filename)?;
        if !filename.ends_with(EXTENSION) {
            return Err(DatasetError::InvalidExtension(filename.to_owned()));
        }
        self.ensure_dir()?;
        let path = self.data_dir.join(filename);
        std::fs::write(&path, bytes)?;
        debug!(file = %path.display(), size = bytes.len(), "stored upload");
        Ok(())
    }

    /// Delete a stored file by exact name.
    pub fn delete(&self, filename: &str) -> Result<(), DatasetError> {
        check_single_component(filename)?;
        let path = self.data_dir.join(filename);
        if !path.is_file() {
            return Err(DatasetError::NotFound(filename.to_owned()));
        }
        std::fs::remove_file(&path).map_err(|e| {
            if e.kind() == ErrorKind::PermissionDenied {
                DatasetError::PermissionDenied(filename.to_owned())
            } else {
                DatasetError::Io(e)
            }
        })
    }

    fn ensure_dir(&self) -> Result<(), DatasetError> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Reject filenames that could escape the data directory.
fn check_single_component(filename: &str) -> Result<(), DatasetError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(DatasetError::InvalidFilename(filename.to_owned()));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, DatasetStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = DatasetStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn name_normalization_round_trip() {
        assert_eq!(DatasetStore::storage_name("my-data"), "my_data.csv");
        assert_eq!(DatasetStore::dataset_name("my_data.csv"), "my-data");
    }

    #[test]
    fn hyphenated_request_loads_underscored_file() {
        let (_dir, store) = store();
        store.save_upload("my_data.csv", b"a,b\n1,2\n").expect("save");
        let table = store.load("my-data").expect("load");
        assert_eq!(table.n_rows, 1);
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn load_missing_dataset_is_not_found() {
        let (_dir, store) = store();
        let err = store.load("absent").expect_err("must fail");
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn upload_extension_gate_runs_before_write() {
        let (dir, store) = store();
        let err = store.save_upload("data.txt", b"a\n1\n").expect_err("must fail");
        assert!(matches!(err, DatasetError::InvalidExtension(_)));
        assert!(!dir.path().join("data.txt").exists());
    }

    #[test]
    fn upload_overwrites_same_name() {
        let (_dir, store) = store();
        store.save_upload("d.csv", b"a\n1\n").expect("first");
        store.save_upload("d.csv", b"a\n1\n2\n").expect("second");
        assert_eq!(store.load("d").expect("load").n_rows, 2);
    }

    #[test]
    fn delete_missing_is_not_found_without_side_effects() {
        let (_dir, store) = store();
        store.save_upload("keep.csv", b"a\n1\n").expect("save");
        let err = store.delete("gone.csv").expect_err("must fail");
        assert!(matches!(err, DatasetError::NotFound(_)));
        assert_eq!(store.list_files().expect("list"), vec!["keep.csv"]);
    }

    #[test]
    fn delete_removes_exactly_that_file() {
        let (_dir, store) = store();
        store.save_upload("one.csv", b"a\n1\n").expect("save");
        store.save_upload("two.csv", b"a\n1\n").expect("save");
        store.delete("one.csv").expect("delete");
        assert_eq!(store.list_files().expect("list"), vec!["two.csv"]);
    }

    #[test]
    fn traversal_filenames_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.delete("../etc/passwd").expect_err("must fail"),
            DatasetError::InvalidFilename(_)
        ));
        assert!(matches!(
            store.save_upload("a/b.csv", b"x").expect_err("must fail"),
            DatasetError::InvalidFilename(_)
        ));
    }

    #[test]
    fn list_datasets_hyphenates() {
        let (_dir, store) = store();
        store.save_upload("sales_2024.csv", b"a\n1\n").expect("save");
        assert_eq!(store.list_datasets().expect("list"), vec!["sales-2024"]);
    }
}
