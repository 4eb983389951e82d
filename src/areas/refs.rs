//! References (head and branches)
//!
//! The head file holds either:
//! - `ref: refs/heads/<branch>`, a symbolic reference resolved through the branch file
//! - A raw 40-character digest, a detached head entered by revert
//!
//! Branch files hold a commit digest, or nothing before the first commit.

use crate::artifacts::core::write_atomically;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the head file inside the repository directory
pub const HEAD_REF_NAME: &str = "head";

/// Parsed content of the head file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Points at a branch file, e.g. `refs/heads/main`
    Symbolic(PathBuf),
    /// Holds a commit digest directly
    Detached(ObjectId),
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.rev`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    /// Point head at `branch` and create its branch file, empty
    pub fn init_head(&self, branch: &str) -> anyhow::Result<()> {
        let heads_path = self.heads_path();
        std::fs::create_dir_all(&heads_path)
            .with_context(|| format!("Unable to create {}", heads_path.display()))?;

        write_atomically(&heads_path.join(branch), b"")?;
        write_atomically(
            &self.head_path(),
            format!("ref: refs/heads/{branch}").as_bytes(),
        )?;
        tracing::debug!(branch, "initialized head");

        Ok(())
    }

    /// Read and parse the head file
    pub fn read_head(&self) -> anyhow::Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("Unable to read {}", head_path.display()))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => Ok(Head::Symbolic(PathBuf::from(&symref_match[1]))),
            None => Ok(Head::Detached(ObjectId::try_parse(content)?)),
        }
    }

    /// The commit head currently resolves to, if any
    ///
    /// A missing or empty branch file means no commit has been made on that branch yet.
    pub fn head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.read_head()? {
            Head::Symbolic(branch) => self.read_branch(&branch),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    fn read_branch(&self, branch: &Path) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.path.join(branch);
        if !branch_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("Unable to read {}", branch_path.display()))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content)?))
    }

    /// Move the current position to `oid`
    ///
    /// A symbolic head moves its branch, a detached head is rewritten in place.
    pub fn advance(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.read_head()? {
            Head::Symbolic(branch) => {
                let branch_path = self.path.join(&branch);
                if let Some(parent) = branch_path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Unable to create {}", parent.display()))?;
                }
                write_atomically(&branch_path, oid.as_ref().as_bytes())?;
                tracing::debug!(branch = %branch.display(), %oid, "advanced branch");
            }
            Head::Detached(_) => {
                write_atomically(&self.head_path(), oid.as_ref().as_bytes())?;
                tracing::debug!(%oid, "advanced detached head");
            }
        }

        Ok(())
    }

    /// Store `oid` directly in the head file, leaving branch files untouched
    pub fn detach(&self, oid: &ObjectId) -> anyhow::Result<()> {
        write_atomically(&self.head_path(), oid.as_ref().as_bytes())?;
        tracing::debug!(%oid, "detached head");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use crate::errors::{RevError, kind_of};
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn refs_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn refs(dir: &TempDir) -> Refs {
        let refs = Refs::new(dir.path().to_path_buf().into_boxed_path());
        refs.init_head("main").unwrap();
        refs
    }

    fn commit_oid(seed: &str) -> ObjectId {
        ObjectId::compute(ObjectType::Commit, seed.as_bytes())
    }

    #[rstest]
    fn fresh_head_is_symbolic_and_unborn(refs_dir: TempDir) {
        let refs = refs(&refs_dir);

        assert_eq!(
            std::fs::read_to_string(refs_dir.path().join("head")).unwrap(),
            "ref: refs/heads/main"
        );
        assert_eq!(refs.head().unwrap(), None);
    }

    #[rstest]
    fn advance_moves_the_branch_not_the_head(refs_dir: TempDir) {
        let refs = refs(&refs_dir);
        let oid = commit_oid("first");

        refs.advance(&oid).unwrap();

        assert_eq!(refs.head().unwrap(), Some(oid.clone()));
        assert_eq!(
            std::fs::read_to_string(refs_dir.path().join("refs/heads/main")).unwrap(),
            oid.to_string()
        );
        assert_eq!(
            refs.read_head().unwrap(),
            Head::Symbolic(PathBuf::from("refs/heads/main"))
        );
    }

    #[rstest]
    fn detached_head_advances_in_place(refs_dir: TempDir) {
        let refs = refs(&refs_dir);
        let on_branch = commit_oid("first");
        let detached = commit_oid("second");
        let next = commit_oid("third");
        refs.advance(&on_branch).unwrap();

        refs.detach(&detached).unwrap();
        assert_eq!(refs.head().unwrap(), Some(detached.clone()));
        assert_eq!(refs.read_head().unwrap(), Head::Detached(detached));

        refs.advance(&next).unwrap();
        assert_eq!(refs.head().unwrap(), Some(next));
        assert_eq!(
            std::fs::read_to_string(refs_dir.path().join("refs/heads/main")).unwrap(),
            on_branch.to_string()
        );
    }

    #[rstest]
    fn garbage_head_is_an_invalid_digest(refs_dir: TempDir) {
        let refs = refs(&refs_dir);
        std::fs::write(refs_dir.path().join("head"), "not a digest").unwrap();

        let error = refs.head().unwrap_err();
        assert!(matches!(kind_of(&error), Some(RevError::InvalidDigest(_))));
    }
}
