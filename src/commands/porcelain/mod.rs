//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the repository areas into the version control
//! workflow. Each one is a method on [`Repository`](crate::areas::repository::Repository)
//! that returns a value and leaves presentation to the caller.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage files for commit
//! - `commit`: Create a new commit
//! - `status`: Show working tree status
//! - `log`: Show commit history
//! - `checkout`: Materialize a stored tree onto disk
//! - `revert`: Reset the working directory to a past commit

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod revert;
pub mod status;
