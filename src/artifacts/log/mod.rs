//! Commit history traversal
//!
//! - `rev_list`: follows parent links from a starting commit back to the root

pub mod rev_list;
