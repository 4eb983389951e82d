use colored::Colorize;

/// How a working-directory path differs from the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkspaceChangeType {
    /// Indexed, present, but its content hashes to a different digest
    Modified,
    /// Indexed but no longer a file on disk
    Deleted,
    /// On disk but not indexed
    Untracked,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => " M",
            WorkspaceChangeType::Deleted => " D",
            WorkspaceChangeType::Untracked => "??",
        }
    }
}

impl std::fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code: &str = self.into();
        write!(f, "{}", code.red())
    }
}
