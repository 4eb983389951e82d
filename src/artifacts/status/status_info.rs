use crate::artifacts::status::file_change::WorkspaceChangeType;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub type FileSet = BTreeSet<PathBuf>;

/// Differences between the index and the working directory
///
/// The three sets are disjoint: modified and deleted paths are indexed, untracked ones
/// are not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub modified: FileSet,
    pub deleted: FileSet,
    pub untracked: FileSet,
}

impl StatusReport {
    pub fn record(&mut self, path: PathBuf, change: WorkspaceChangeType) {
        match change {
            WorkspaceChangeType::Modified => self.modified.insert(path),
            WorkspaceChangeType::Deleted => self.deleted.insert(path),
            WorkspaceChangeType::Untracked => self.untracked.insert(path),
        };
    }

    /// Every change in path order
    pub fn changes(&self) -> Vec<(&Path, WorkspaceChangeType)> {
        let mut changes = Vec::new();
        for (set, change) in [
            (&self.modified, WorkspaceChangeType::Modified),
            (&self.deleted, WorkspaceChangeType::Deleted),
            (&self.untracked, WorkspaceChangeType::Untracked),
        ] {
            changes.extend(set.iter().map(|path| (path.as_path(), change)));
        }
        changes.sort();

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn changes_are_merged_in_path_order() {
        let mut report = StatusReport::default();
        report.record(PathBuf::from("c.txt"), WorkspaceChangeType::Untracked);
        report.record(PathBuf::from("a.txt"), WorkspaceChangeType::Deleted);
        report.record(PathBuf::from("b.txt"), WorkspaceChangeType::Modified);

        assert_eq!(
            report.changes(),
            vec![
                (Path::new("a.txt"), WorkspaceChangeType::Deleted),
                (Path::new("b.txt"), WorkspaceChangeType::Modified),
                (Path::new("c.txt"), WorkspaceChangeType::Untracked),
            ]
        );
        assert!(StatusReport::default().changes().is_empty());
    }
}
