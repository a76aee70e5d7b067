use crate::domain::version::BumpKind;
use crate::error::{ReleaseError, Result};
use std::fmt;

/// What the operator asked for on one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRequest {
    pub bump: BumpKind,
    /// Append the abbreviated HEAD hash as build metadata
    pub include_build_metadata: bool,
    /// Pre-release label; empty for a final release
    pub prerelease: String,
}

impl ReleaseRequest {
    /// Create a request, validating the pre-release label
    ///
    /// The label must be a valid semver pre-release and may not contain `-` or
    /// `+`, which the tag parser treats as qualifier separators.
    pub fn new(
        bump: BumpKind,
        include_build_metadata: bool,
        prerelease: impl Into<String>,
    ) -> Result<Self> {
        let prerelease = prerelease.into();

        if !prerelease.is_empty() {
            if prerelease.contains(|c: char| c == '-' || c == '+') {
                return Err(ReleaseError::parse(format!(
                    "pre-release label '{}' may not contain '-' or '+'",
                    prerelease
                )));
            }
            semver::Prerelease::new(&prerelease).map_err(|e| {
                ReleaseError::parse(format!("pre-release label '{}': {}", prerelease, e))
            })?;
        }

        Ok(ReleaseRequest {
            bump,
            include_build_metadata,
            prerelease,
        })
    }
}

/// Commit range summarised into the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogRange {
    /// No previous tag: all history up to HEAD
    Head,
    /// Everything since the given tag
    Since(String),
}

impl ChangelogRange {
    pub fn from_previous_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) => ChangelogRange::Since(tag.to_string()),
            None => ChangelogRange::Head,
        }
    }
}

impl fmt::Display for ChangelogRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangelogRange::Head => write!(f, "HEAD"),
            ChangelogRange::Since(tag) => write!(f, "{}..HEAD", tag),
        }
    }
}
