//! Object types and their canonical encodings
//!
//! Every piece of content is stored as an object identified by a SHA-1 digest.
//! There are three kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parent commit, tree)
//!
//! All objects share the framing `<type> <size>\0<content>`; the digest is computed
//! over that exact byte sequence.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes, as embedded in tree entries
pub const OBJECT_ID_BYTES: usize = 20;
