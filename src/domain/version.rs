use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version with optional pre-release and build metadata
///
/// Renders as `v<major>.<minor>.<patch>[-<prerelease>][+<build>]`. The default
/// value is `v0.0.0`, used when no release has been tagged yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
    pub build: String,
}

/// Which numeric field a release advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    pub fn name(&self) -> &'static str {
        match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        }
    }
}

impl FromStr for BumpKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patch" => Ok(BumpKind::Patch),
            "minor" => Ok(BumpKind::Minor),
            "major" => Ok(BumpKind::Major),
            other => Err(ReleaseError::config(format!(
                "unknown release version {:?}",
                other
            ))),
        }
    }
}

/// Accumulator receiving qualifier characters while scanning the tail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collecting {
    Prerelease,
    Build,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            ..Default::default()
        }
    }

    /// Parse a version from a tag string (e.g. "v1.2.3-rc1+abc1234")
    ///
    /// The `v` prefix is optional. The third segment's leading digits are the
    /// patch number; whatever follows must start with `-` or `+`.
    pub fn parse(text: &str) -> Result<Self> {
        let clean = text.strip_prefix('v').unwrap_or(text);

        let parts: Vec<&str> = clean.splitn(3, '.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::parse(format!(
                "'{}': expected major.minor.patch",
                text
            )));
        }

        let major = parse_number(parts[0], "major", text)?;
        let minor = parse_number(parts[1], "minor", text)?;

        let digits = parts[2]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(parts[2].len());
        let (patch, tail) = parts[2].split_at(digits);
        let patch = parse_number(patch, "patch", text)?;

        let mut version = SemanticVersion::new(major, minor, patch);
        if tail.is_empty() {
            return Ok(version);
        }

        let mut active = match tail.chars().next() {
            Some('-') => Collecting::Prerelease,
            Some('+') => Collecting::Build,
            _ => {
                return Err(ReleaseError::parse(format!(
                    "'{}': qualifier must start with '-' or '+'",
                    text
                )))
            }
        };

        for c in tail.chars() {
            match c {
                '-' => active = Collecting::Prerelease,
                '+' => active = Collecting::Build,
                _ => match active {
                    Collecting::Prerelease => version.prerelease.push(c),
                    Collecting::Build => version.build.push(c),
                },
            }
        }

        Ok(version)
    }

    /// Advance to the next clean numeric version
    ///
    /// Qualifiers are always dropped; the caller applies new ones afterwards.
    pub fn bump(&mut self, kind: BumpKind) {
        self.prerelease.clear();
        self.build.clear();

        match kind {
            BumpKind::Patch => {
                self.patch += 1;
            }
            BumpKind::Minor => {
                self.minor += 1;
                self.patch = 0;
            }
            BumpKind::Major => {
                self.major += 1;
                self.minor = 0;
                self.patch = 0;
            }
        }
    }

    /// Compare release precedence, ignoring build metadata
    pub fn precedence(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }
}

fn parse_number(segment: &str, field: &str, text: &str) -> Result<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReleaseError::parse(format!(
            "'{}': {} is not a number",
            text, field
        )));
    }

    segment
        .parse::<u64>()
        .map_err(|e| ReleaseError::parse(format!("'{}': {}: {}", text, field, e)))
}

fn compare_prerelease(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match (semver::Prerelease::new(a), semver::Prerelease::new(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", self.prerelease)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}
