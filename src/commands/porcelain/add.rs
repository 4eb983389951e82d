use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use std::path::Path;

impl Repository {
    /// Store a file's content and upsert its index entry
    ///
    /// Relative paths are resolved against the work tree.
    pub fn stage(&self, path: impl AsRef<Path>) -> anyhow::Result<IndexEntry> {
        let _lock = self.lock()?;

        let path = self.workspace().resolve_stage_path(path.as_ref())?;
        let data = self.workspace().read_file(&path)?;
        let stat = self.workspace().stat_file(&path)?;

        let blob_id = self.database().store(&Blob::new(data))?;
        let entry = IndexEntry::new(path, blob_id, stat);

        let mut index = self.index()?;
        index.stage(entry.clone());
        index.save()?;
        tracing::debug!(path = %entry.name.display(), oid = %entry.oid, "staged file");

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use crate::artifacts::objects::object_type::ObjectType;
    use crate::errors::{RevError, kind_of};
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    #[fixture]
    fn repository_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Repository::init(dir.path()).expect("Failed to init repository");
        dir
    }

    #[rstest]
    fn staging_stores_the_blob_and_records_the_entry(repository_dir: TempDir) {
        repository_dir.child("src/main.rs").write_str("fn main() {}").unwrap();
        let repository = Repository::open(repository_dir.path()).unwrap();

        let entry = repository.stage("src/main.rs").unwrap();

        let expected_oid = ObjectId::compute(ObjectType::Blob, b"fn main() {}");
        assert_eq!(entry.name, PathBuf::from("src/main.rs"));
        assert_eq!(entry.oid, expected_oid);
        assert!(repository.database().contains(&expected_oid));

        let index = repository.index().unwrap();
        assert_eq!(index.entry_by_path(Path::new("src/main.rs")), Some(&entry));
    }

    #[rstest]
    fn restaging_updates_only_that_entry(repository_dir: TempDir) {
        repository_dir.child("a.txt").write_str("one").unwrap();
        repository_dir.child("b.txt").write_str("two").unwrap();
        let repository = Repository::open(repository_dir.path()).unwrap();
        repository.stage("a.txt").unwrap();
        let b = repository.stage("b.txt").unwrap();

        repository_dir.child("a.txt").write_str("changed").unwrap();
        let a = repository.stage("a.txt").unwrap();

        let index = repository.index().unwrap();
        assert_eq!(index.entries().cloned().collect::<Vec<_>>(), vec![a, b]);
    }

    #[rstest]
    fn missing_files_are_rejected(repository_dir: TempDir) {
        let repository = Repository::open(repository_dir.path()).unwrap();

        let error = repository.stage("ghost.txt").unwrap_err();
        assert_eq!(
            kind_of(&error),
            Some(&RevError::PathNotFound(PathBuf::from("ghost.txt")))
        );
        assert!(repository.index().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[rstest]
    fn names_with_line_breaks_leave_the_index_untouched(repository_dir: TempDir) {
        repository_dir.child("line1\nline2.txt").write_str("x").unwrap();
        repository_dir.child("plain.txt").write_str("y").unwrap();
        let repository = Repository::open(repository_dir.path()).unwrap();
        let plain = repository.stage("plain.txt").unwrap();

        let error = repository.stage("line1\nline2.txt").unwrap_err();

        assert_eq!(
            kind_of(&error),
            Some(&RevError::InvalidPathName(PathBuf::from("line1\nline2.txt")))
        );
        let index = repository.index().unwrap();
        assert_eq!(index.entries().cloned().collect::<Vec<_>>(), vec![plain]);
        assert!(repository.status().unwrap().deleted.is_empty());
    }
}
