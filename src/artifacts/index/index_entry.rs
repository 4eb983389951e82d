//! Index entry representation
//!
//! Each entry in the index represents a staged file with:
//! - File path (relative to the work tree, `/`-separated)
//! - Content hash (blob object ID)
//! - File metadata (mode and modification time)
//!
//! ## Entry Format
//!
//! One line per entry: `<mode> <digest> <mtime> <path>\n`. The path is the last field
//! and may itself contain spaces, but never line breaks. It is always relative, made of
//! plain segments only, and never points into the repository directory.

use crate::REPOSITORY_DIR;
use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RevError;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::io::BufRead;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to the work tree
    pub name: PathBuf,
    /// Digest of the staged blob
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name {:?}", self.name))
    }

    /// Directory segments leading to the entry, outermost first
    ///
    /// `a/b/c.txt` yields `["a", "b"]`.
    pub fn parent_segments(&self) -> anyhow::Result<Vec<&str>> {
        let Some(parent) = self.name.parent() else {
            return Ok(Vec::new());
        };

        parent
            .components()
            .map(|component| match component {
                Component::Normal(segment) => segment
                    .to_str()
                    .with_context(|| format!("Non UTF-8 path segment in {:?}", self.name)),
                other => Err(anyhow::anyhow!(
                    "Unexpected path component {:?} in {:?}",
                    other,
                    self.name
                )),
            })
            .collect()
    }

    /// Every proper ancestor directory of the entry, outermost first
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = self
            .name
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<Vec<_>>();
        dirs.reverse();

        dirs
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        validate_entry_path(&self.name)?;

        let line = format!(
            "{} {} {} {}\n",
            self.metadata.mode,
            self.oid,
            self.metadata.mtime,
            normalize_path(&self.name)?
        );

        Ok(line.into())
    }
}

impl Unpackable for IndexEntry {
    /// Parse a single index line
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end_matches(['\n', '\r']);

        let mut fields = line.splitn(4, ' ');
        let (Some(mode), Some(oid), Some(mtime), Some(path)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            anyhow::bail!("Index line has fewer than four fields: {line:?}");
        };

        let mode = EntryMode::try_from(mode)?;
        if mode.is_tree() {
            anyhow::bail!("Index entries cannot be directories: {line:?}");
        }

        let oid = ObjectId::try_parse(oid)?;
        let mtime = parse_mtime(mtime).with_context(|| format!("Invalid mtime in {line:?}"))?;

        if path.is_empty() {
            anyhow::bail!("Index line has an empty path: {line:?}");
        }
        validate_entry_path(Path::new(path))?;

        Ok(IndexEntry::new(
            PathBuf::from(path),
            oid,
            EntryMetadata::new(mode, mtime),
        ))
    }
}

/// Mode and modification time recorded when a file was staged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, new)]
pub struct EntryMetadata {
    pub mode: EntryMode,
    /// Modification time (seconds since Unix epoch)
    pub mtime: i64,
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((path, metadata): (&Path, Metadata)) -> anyhow::Result<Self> {
        let mode = if path.is_executable() {
            FileMode::Executable
        } else {
            FileMode::Regular
        };

        let mtime = metadata
            .modified()
            .with_context(|| format!("Unable to read mtime of {}", path.display()))?
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or_default();

        Ok(EntryMetadata::new(mode.into(), mtime))
    }
}

/// Check that `path` can be stored as an index line and stays inside the work tree
///
/// Absolute paths, `.`/`..` segments and paths into the repository directory are
/// [`RevError::PathOutsideRepository`]. Non UTF-8 names and names holding line breaks
/// are [`RevError::InvalidPathName`].
pub fn validate_entry_path(path: &Path) -> anyhow::Result<()> {
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return Err(RevError::InvalidPathName(path.to_path_buf()).into());
    }

    for (position, component) in components.enumerate() {
        let Component::Normal(segment) = component else {
            return Err(RevError::PathOutsideRepository(path.to_path_buf()).into());
        };
        if position == 0 && segment == REPOSITORY_DIR {
            return Err(RevError::PathOutsideRepository(path.to_path_buf()).into());
        }

        match segment.to_str() {
            Some(segment) if !segment.contains(['\n', '\r']) => {}
            _ => return Err(RevError::InvalidPathName(path.to_path_buf()).into()),
        }
    }

    Ok(())
}

/// Render a relative path with `/` separators regardless of platform
pub fn normalize_path(path: &Path) -> anyhow::Result<String> {
    let segments = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(
                segment
                    .to_str()
                    .with_context(|| format!("Non UTF-8 path {}", path.display())),
            ),
            _ => None,
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(segments.join("/"))
}

// older writers stored fractional seconds
fn parse_mtime(raw: &str) -> anyhow::Result<i64> {
    match raw.parse::<i64>() {
        Ok(mtime) => Ok(mtime),
        Err(_) => {
            let mtime = raw.parse::<f64>()?;
            anyhow::ensure!(mtime.is_finite(), "mtime is not finite");
            Ok(mtime.trunc() as i64)
        }
    }
}
