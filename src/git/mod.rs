//! Version-control gateway
//!
//! The release pipeline needs only a handful of operations from the
//! version-control system. They are captured by the [Vcs] trait so the
//! orchestrator can be driven by either implementation:
//!
//! - [command::GitCli]: shells out to the system `git` binary
//! - [mock::MockVcs]: in-memory implementation for testing
//!
//! Every call is synchronous. A failing external command is reported as
//! [crate::error::ReleaseError::ExternalTool] carrying the first line of its
//! diagnostic output.

pub mod command;
pub mod mock;

pub use command::GitCli;
pub use mock::MockVcs;

use crate::domain::ChangelogRange;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Operations the release pipeline consumes from version control
pub trait Vcs {
    /// Name of the most recent tag reachable from HEAD
    ///
    /// # Returns
    /// * `Ok(String)` - Tag name, trailing newline removed
    /// * `Err(NotFound)` - No tag exists yet (first release)
    /// * `Err` - Any other failure of the external tool
    fn describe_latest_tag(&self) -> Result<String>;

    /// Abbreviated hash of the current HEAD commit
    fn short_head_hash(&self) -> Result<String>;

    /// Per-author commit summary for `range`
    ///
    /// The output is written to a temporary file, rewound to the start, since
    /// its size is unbounded. The file is removed when the handle is dropped.
    fn shortlog(&self, range: &ChangelogRange) -> Result<NamedTempFile>;

    /// Create annotated tag `name` using the whole of `message_file` as message
    fn create_annotated_tag(&self, name: &str, message_file: &Path) -> Result<()>;

    /// Write `<tag>.tar.gz` for `tag` and return its path
    fn create_archive(&self, tag: &str) -> Result<PathBuf>;
}
