use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Lazily walk the history from head, newest commit first
    pub fn log(&self) -> anyhow::Result<RevList<'_>> {
        Ok(RevList::new(self.database(), self.refs().head()?))
    }
}

/// Render a commit the way `log` prints it
pub fn format_commit_medium(oid: &ObjectId, commit: &Commit) -> String {
    let mut lines = vec![
        format!("commit {oid}"),
        format!("Author: {}", commit.author().display_name()),
        format!("Date:   {}", commit.author().readable_timestamp()),
        String::new(),
    ];
    lines.extend(
        commit
            .message()
            .lines()
            .map(|message_line| format!("    {message_line}")),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Author;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn author() -> Author {
        Author::new_with_timestamp(
            "user".to_string(),
            "user@example.com".to_string(),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn log_of_an_unborn_branch_is_empty() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::init(dir.path()).unwrap();

        assert_eq!(repository.log().unwrap().count(), 0);
    }

    #[test]
    fn log_yields_newest_first() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::init(dir.path()).unwrap();
        dir.child("a.txt").write_str("1").unwrap();
        repository.stage("a.txt").unwrap();
        let first = repository.commit("first", author()).unwrap();
        dir.child("a.txt").write_str("2").unwrap();
        repository.stage("a.txt").unwrap();
        let second = repository.commit("second", author()).unwrap();

        let history = repository
            .log()
            .unwrap()
            .map(|entry| entry.map(|(oid, commit)| (oid, commit.short_message())))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap();

        assert_eq!(
            history,
            vec![
                (second.oid, "second".to_string()),
                (first.oid, "first".to_string()),
            ]
        );
    }

    #[test]
    fn medium_format_indents_the_message() {
        let tree = ObjectId::try_parse("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap();
        let commit = Commit::new(None, tree, author(), "subject\n\nbody".to_string());
        let oid = ObjectId::try_parse("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0").unwrap();

        assert_eq!(
            format_commit_medium(&oid, &commit),
            "commit b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0\n\
             Author: user <user@example.com>\n\
             Date:   Tue Nov 14 22:13:20 2023 +0000\n\
             \n    subject\n    \n    body"
        );
    }
}
