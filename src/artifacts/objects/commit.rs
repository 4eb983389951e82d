//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - The parent commit ID (absent for the first commit)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp>
//! committer <name> <email> <timestamp>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::{BufRead, Read};

pub const AUTHOR_NAME_ENV: &str = "REV_AUTHOR_NAME";
pub const AUTHOR_EMAIL_ENV: &str = "REV_AUTHOR_EMAIL";
pub const AUTHOR_DATE_ENV: &str = "REV_AUTHOR_DATE";

const DEFAULT_AUTHOR_NAME: &str = "user";
const DEFAULT_AUTHOR_EMAIL: &str = "user@example.com";

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<Utc>,
}

impl Author {
    /// Create a new author stamped with the current time
    pub fn new(name: String, email: String) -> anyhow::Result<Self> {
        Self::new_with_timestamp(name, email, Utc::now())
    }

    /// Create a new author with a fixed timestamp
    ///
    /// Name and email must survive the `name <email> seconds` header line unchanged.
    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        validate_identity(&name, &email)?;

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }

    /// Parse an identity of the form `Name <email>`, stamped with the current time
    pub fn from_identity(identity: &str) -> anyhow::Result<Self> {
        let (name, email) = parse_identity(identity)?;
        Author::new(name, email)
    }

    /// Same identity, re-stamped with `timestamp`
    pub fn with_timestamp(self, timestamp: DateTime<Utc>) -> Self {
        Author { timestamp, ..self }
    }

    /// Load author information from environment variables
    ///
    /// Reads `REV_AUTHOR_NAME` and `REV_AUTHOR_EMAIL`, falling back to
    /// `user <user@example.com>`. `REV_AUTHOR_DATE` pins the timestamp, otherwise the
    /// current time is used.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name =
            std::env::var(AUTHOR_NAME_ENV).unwrap_or_else(|_| DEFAULT_AUTHOR_NAME.to_string());
        let email =
            std::env::var(AUTHOR_EMAIL_ENV).unwrap_or_else(|_| DEFAULT_AUTHOR_EMAIL.to_string());

        match std::env::var(AUTHOR_DATE_ENV) {
            Ok(date) => Author::new_with_timestamp(name, email, parse_date(&date)?),
            Err(_) => Author::new(name, email),
        }
    }

    /// The timestamp configured through `REV_AUTHOR_DATE`, if any
    pub fn pinned_timestamp_from_env() -> anyhow::Result<Option<DateTime<Utc>>> {
        std::env::var(AUTHOR_DATE_ENV)
            .ok()
            .map(|date| parse_date(&date))
            .transpose()
    }

    /// Format author name and email for display: `Name <email@example.com>`
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Format complete author info including timestamp: `Name <email> timestamp`
    pub fn display(&self) -> String {
        format!("{} {}", self.display_name(), self.timestamp.timestamp())
    }

    /// Format timestamp in human-readable form, like `Mon Jan 1 12:34:56 2024 +0000`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    /// Parse `name <email> timestamp`
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (identity, timestamp) = value
            .rsplit_once(' ')
            .context("Invalid author format: missing timestamp")?;
        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp {timestamp:?}"))?;
        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Timestamp out of range"))?;

        let (name, email) = parse_identity(identity)?;

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

fn parse_identity(identity: &str) -> anyhow::Result<(String, String)> {
    let email_start = identity
        .find('<')
        .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
    let email_end = identity
        .rfind('>')
        .filter(|end| *end > email_start)
        .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

    let name = identity[..email_start].trim().to_string();
    let email = identity[email_start + 1..email_end].to_string();

    Ok((name, email))
}

fn validate_identity(name: &str, email: &str) -> anyhow::Result<()> {
    let forbidden = |c: char| matches!(c, '<' | '>' | '\n' | '\r');

    anyhow::ensure!(
        !name.contains(forbidden) && name.trim() == name,
        "Invalid author name {name:?}"
    );
    anyhow::ensure!(!email.contains(forbidden), "Invalid author email {email:?}");

    Ok(())
}

fn parse_date(date: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = date.trim();

    if let Ok(seconds) = date.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow::anyhow!("{AUTHOR_DATE_ENV} out of range: {date}"));
    }

    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
        .map(|date| date.with_timezone(&Utc))
        .with_context(|| format!("Invalid {AUTHOR_DATE_ENV}: {date}"))
}

/// Commit object
///
/// Links a tree snapshot to at most one parent commit. Any change to the tree, parent,
/// author or message yields a different digest.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// The author doubles as committer.
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        Ok(Bytes::from(lines.join("\n")))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .context("Invalid commit object: invalid tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        let mut parent = None;
        if let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parent = Some(ObjectId::try_parse(parent_oid)?);
            next_line = lines
                .next()
                .context("Invalid commit object: missing author line")?;
        }

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .context("Invalid commit object: invalid committer line")?;
        let committer = Author::try_from(committer)?;

        if let Some(extra) = lines.next() {
            anyhow::bail!("Invalid commit object: unexpected header {extra:?}");
        }

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
