use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RevError;

/// Outcome of a successful commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub oid: ObjectId,
    pub tree_oid: ObjectId,
    /// No parent: this is the first commit of the history
    pub root: bool,
    pub short_message: String,
}

impl std::fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let is_root = if self.root { "(root-commit) " } else { "" };
        write!(
            f,
            "[{}{}] {}",
            is_root,
            self.oid.to_short_oid(),
            self.short_message
        )
    }
}

impl Repository {
    /// Promote the index into a tree and record it as a new commit on top of head
    pub fn commit(&self, message: &str, author: Author) -> anyhow::Result<CommitSummary> {
        let _lock = self.lock()?;

        let index = self.index()?;
        if index.is_empty() {
            return Err(RevError::NothingToCommit.into());
        }

        let tree = Tree::build(index.entries())?;
        let tree_id = tree.object_id()?;
        tree.traverse(&mut |tree: &Tree| self.database().store(tree).map(|_| ()))?;

        let parent = self.refs().head()?;
        let root = parent.is_none();

        let commit = Commit::new(parent, tree_id.clone(), author, message.trim().to_string());
        let commit_id = self.database().store(&commit)?;
        self.refs().advance(&commit_id)?;

        tracing::info!(oid = %commit_id, tree = %tree_id, root, "created commit");

        Ok(CommitSummary {
            oid: commit_id,
            tree_oid: tree_id,
            root,
            short_message: commit.short_message(),
        })
    }
}
