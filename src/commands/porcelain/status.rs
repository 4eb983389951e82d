use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use crate::artifacts::status::status_info::StatusReport;

impl Repository {
    /// Compare the working directory with the index without modifying either
    pub fn status(&self) -> anyhow::Result<StatusReport> {
        let index = self.index()?;
        let inspector = Inspector::new(self.workspace());
        let mut report = StatusReport::default();

        for entry in index.entries() {
            if let Some(change) = inspector.check_index_against_workspace(entry)? {
                report.record(entry.name.clone(), change);
            }
        }

        for path in self.workspace().list_files()? {
            if !index.is_tracked(&path) {
                report.record(path, WorkspaceChangeType::Untracked);
            }
        }

        Ok(report)
    }
}
