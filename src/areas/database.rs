//! Object database
//!
//! Content-addressed, zlib-compressed, immutable storage. Each object lives at
//! `objects/<first-2-hex>/<remaining-38-hex>` and is written once: storing an object
//! whose digest already exists is a no-op.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, RawObject, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::core::write_atomically;
use crate::errors::RevError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store `payload` as an object of the given kind and return its digest
    pub fn put(&self, kind: ObjectType, payload: impl Into<Bytes>) -> anyhow::Result<ObjectId> {
        let object = RawObject::new(kind, payload);
        let object_id = object.object_id();
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            tracing::debug!(oid = %object_id, %kind, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .with_context(|| format!("Invalid object path {}", object_path.display()))?,
        )
        .with_context(|| format!("Unable to create object directory {}", object_path.display()))?;

        let compressed = Self::compress(&object.encode())?;
        write_atomically(&object_path, &compressed)?;
        tracing::debug!(oid = %object_id, %kind, size = object.payload.len(), "stored object");

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.put(object.object_type(), object.serialize()?)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Load, decompress and validate an object
    ///
    /// Fails with [`RevError::ObjectNotFound`] when nothing is stored under the digest and
    /// with [`RevError::CorruptObject`] when the stored bytes cannot be decoded or do not
    /// hash back to the digest.
    pub fn get(&self, object_id: &ObjectId) -> anyhow::Result<RawObject> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(compressed) => compressed,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(RevError::ObjectNotFound(object_id.to_string()).into());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("Unable to read object file {}", object_path.display())
                });
            }
        };

        let framed = Self::decompress(&compressed).map_err(|error| {
            RevError::CorruptObject(object_id.to_string(), error.to_string())
        })?;
        let object = RawObject::decode(object_id, framed)?;

        if object.object_id() != *object_id {
            return Err(RevError::CorruptObject(
                object_id.to_string(),
                "content does not match digest".to_string(),
            )
            .into());
        }

        Ok(object)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let object = self.get(object_id)?;
        if object.kind != ObjectType::Blob {
            return Err(RevError::NotABlob(object_id.to_string()).into());
        }

        Ok(Blob::new(object.payload))
    }

    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        let object = self.get(object_id)?;
        if object.kind != ObjectType::Tree {
            return Err(RevError::NotATree(object_id.to_string()).into());
        }

        Tree::deserialize(&object.payload[..]).map_err(|error| {
            RevError::CorruptObject(object_id.to_string(), error.to_string()).into()
        })
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let object = self.get(object_id)?;
        if object.kind != ObjectType::Commit {
            return Err(RevError::NotACommit(object_id.to_string()).into());
        }

        Commit::deserialize(&object.payload[..]).map_err(|error| {
            RevError::CorruptObject(object_id.to_string(), error.to_string()).into()
        })
    }

    /// The tree a commit points at
    pub fn tree_of(&self, commit_id: &ObjectId) -> anyhow::Result<ObjectId> {
        Ok(self.load_commit(commit_id)?.tree_oid().clone())
    }

    /// Commit digests reachable from `start` by following parent links, newest first
    pub fn history(
        &self,
        start: Option<ObjectId>,
    ) -> impl Iterator<Item = anyhow::Result<ObjectId>> + '_ {
        RevList::new(self, start).map(|commit| commit.map(|(oid, _)| oid))
    }

    /// Visit every entry reachable from a tree, parents before their children
    ///
    /// `visit` receives the entry's path relative to the tree root. Directory entries are
    /// visited and then descended into.
    pub fn walk_tree<F>(&self, tree_id: &ObjectId, visit: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Path, &DatabaseEntry) -> anyhow::Result<()>,
    {
        self.walk_tree_at(tree_id, Path::new(""), visit)
    }

    fn walk_tree_at<F>(&self, tree_id: &ObjectId, prefix: &Path, visit: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Path, &DatabaseEntry) -> anyhow::Result<()>,
    {
        let tree = self.load_tree(tree_id)?;

        for (name, entry) in tree.entries() {
            let path = Self::child_path(tree_id, prefix, name)?;
            visit(&path, entry)?;

            if entry.is_tree() {
                self.walk_tree_at(&entry.oid, &path, visit)?;
            }
        }

        Ok(())
    }

    // entry names must stay inside the directory that holds them
    fn child_path(tree_id: &ObjectId, prefix: &Path, name: &str) -> anyhow::Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(prefix.join(name)),
            _ => Err(RevError::CorruptObject(
                tree_id.to_string(),
                format!("invalid entry name {name:?}"),
            )
            .into()),
        }
    }

    fn compress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(Bytes::from)
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use walkdir::WalkDir;

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().to_path_buf().into_boxed_path())
    }

    fn stored_files(dir: &TempDir) -> usize {
        WalkDir::new(dir.path())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .count()
    }

    #[rstest]
    fn stores_under_split_digest_path(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.put(ObjectType::Blob, &b"hello"[..]).unwrap();

        assert!(
            objects_dir
                .path()
                .join("b6")
                .join("fc4c620b67d95f953a5c1c1230aaab5db5a1b0")
                .is_file()
        );
        assert_eq!(
            database.get(&oid).unwrap(),
            RawObject::new(ObjectType::Blob, &b"hello"[..])
        );
    }

    #[rstest]
    fn missing_objects_are_reported(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = ObjectId::compute(ObjectType::Blob, b"never stored");

        let error = database.get(&oid).unwrap_err();
        assert_eq!(
            kind_of(&error),
            Some(&RevError::ObjectNotFound(oid.to_string()))
        );
    }

    #[rstest]
    fn undecompressable_objects_are_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.put(ObjectType::Blob, &b"hello"[..]).unwrap();
        std::fs::write(objects_dir.path().join(oid.to_path()), b"not zlib").unwrap();

        let error = database.get(&oid).unwrap_err();
        assert!(matches!(kind_of(&error), Some(RevError::CorruptObject(_, _))));
    }

    #[rstest]
    fn objects_that_do_not_hash_to_their_digest_are_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.put(ObjectType::Blob, &b"hello"[..]).unwrap();
        let other = database.put(ObjectType::Blob, &b"world"[..]).unwrap();
        std::fs::copy(
            objects_dir.path().join(other.to_path()),
            objects_dir.path().join(oid.to_path()),
        )
        .unwrap();

        let error = database.get(&oid).unwrap_err();
        assert!(matches!(kind_of(&error), Some(RevError::CorruptObject(_, _))));
    }

    #[rstest]
    fn kind_mismatches_are_reported(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = database.put(ObjectType::Blob, &b"hello"[..]).unwrap();

        let error = database.load_commit(&blob).unwrap_err();
        assert_eq!(kind_of(&error), Some(&RevError::NotACommit(blob.to_string())));

        let error = database.load_tree(&blob).unwrap_err();
        assert_eq!(kind_of(&error), Some(&RevError::NotATree(blob.to_string())));

        let error = database.tree_of(&blob).unwrap_err();
        assert_eq!(kind_of(&error), Some(&RevError::NotACommit(blob.to_string())));
    }

    #[rstest]
    fn tree_entries_escaping_their_directory_are_corrupt(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let blob = database.put(ObjectType::Blob, &b"x"[..]).unwrap();
        let mut payload = b"100644 ..\0".to_vec();
        blob.write_h40_to(&mut payload).unwrap();
        let tree = database.put(ObjectType::Tree, payload).unwrap();

        let error = database
            .walk_tree(&tree, &mut |_: &Path, _: &DatabaseEntry| Ok(()))
            .unwrap_err();
        assert!(matches!(kind_of(&error), Some(RevError::CorruptObject(_, _))));
    }

    proptest! {
        #[test]
        fn storing_twice_yields_one_object(payload in any::<Vec<u8>>(), kind in prop_oneof![
            Just(ObjectType::Blob),
            Just(ObjectType::Tree),
            Just(ObjectType::Commit),
        ]) {
            let dir = TempDir::new().unwrap();
            let database = database(&dir);

            let first = database.put(kind, payload.clone()).unwrap();
            let second = database.put(kind, payload.clone()).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(stored_files(&dir), 1);
            prop_assert_eq!(database.get(&first).unwrap(), RawObject::new(kind, payload));
        }
    }
}
