//! Domain logic - pure version rules independent of git operations

pub mod request;
pub mod version;

pub use request::{ChangelogRange, ReleaseRequest};
pub use version::{BumpKind, SemanticVersion};
