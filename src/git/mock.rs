use crate::domain::ChangelogRange;
use crate::error::{ReleaseError, Result};
use crate::git::Vcs;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A tag created through [MockVcs], with the message file content at call time
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTag {
    pub name: String,
    pub message: Vec<u8>,
}

impl CreatedTag {
    /// Message decoded for assertions; invalid UTF-8 is replaced
    pub fn message_text(&self) -> String {
        String::from_utf8_lossy(&self.message).into_owned()
    }
}

/// Mock gateway for testing without a repository
///
/// Records every call so tests can assert on ordering and on the tag
/// messages the pipeline assembled.
pub struct MockVcs {
    latest_tag: Option<String>,
    head_hash: String,
    shortlog: String,
    failures: HashSet<&'static str>,
    calls: RefCell<Vec<String>>,
    tags: RefCell<Vec<CreatedTag>>,
    archives: RefCell<Vec<String>>,
}

impl MockVcs {
    /// Create a mock with no tags and an empty history summary
    pub fn new() -> Self {
        MockVcs {
            latest_tag: None,
            head_hash: "1a2b3c4".to_string(),
            shortlog: String::new(),
            failures: HashSet::new(),
            calls: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            archives: RefCell::new(Vec::new()),
        }
    }

    /// Set the tag `describe_latest_tag` reports
    pub fn with_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_tag = Some(tag.into());
        self
    }

    pub fn with_head_hash(mut self, hash: impl Into<String>) -> Self {
        self.head_hash = hash.into();
        self
    }

    pub fn with_shortlog(mut self, text: impl Into<String>) -> Self {
        self.shortlog = text.into();
        self
    }

    /// Make the named operation fail with a git-like diagnostic
    ///
    /// Operation names match the recorded call names: `describe`, `log`,
    /// `shortlog`, `tag`, `archive`.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failures.insert(operation);
        self
    }

    /// Operations invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn created_tags(&self) -> Vec<CreatedTag> {
        self.tags.borrow().clone()
    }

    pub fn archives(&self) -> Vec<String> {
        self.archives.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.failures.contains(operation) {
            return Err(ReleaseError::external(&format!(
                "fatal: {} failed\nmore detail",
                operation
            )));
        }
        Ok(())
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn describe_latest_tag(&self) -> Result<String> {
        self.record("describe".to_string());
        self.check("describe")?;
        self.latest_tag
            .clone()
            .ok_or_else(|| ReleaseError::not_found("no tag describes HEAD"))
    }

    fn short_head_hash(&self) -> Result<String> {
        self.record("log".to_string());
        self.check("log")?;
        Ok(self.head_hash.clone())
    }

    fn shortlog(&self, range: &ChangelogRange) -> Result<NamedTempFile> {
        self.record(format!("shortlog {}", range));
        self.check("shortlog")?;

        let mut file = NamedTempFile::new()?;
        file.write_all(self.shortlog.as_bytes())?;
        file.seek(SeekFrom::Start(0))?;
        Ok(file)
    }

    fn create_annotated_tag(&self, name: &str, message_file: &Path) -> Result<()> {
        self.record(format!("tag {}", name));
        self.check("tag")?;

        let message = fs::read(message_file)?;
        self.tags.borrow_mut().push(CreatedTag {
            name: name.to_string(),
            message,
        });
        Ok(())
    }

    fn create_archive(&self, tag: &str) -> Result<PathBuf> {
        self.record(format!("archive {}", tag));
        self.check("archive")?;

        self.archives.borrow_mut().push(tag.to_string());
        Ok(PathBuf::from(format!("{}.tar.gz", tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_mock_no_tag_is_not_found() {
        let vcs = MockVcs::new();
        assert!(vcs.describe_latest_tag().unwrap_err().is_not_found());
    }

    #[test]
    fn test_mock_latest_tag() {
        let vcs = MockVcs::new().with_latest_tag("v1.0.0");
        assert_eq!(vcs.describe_latest_tag().unwrap(), "v1.0.0");
    }

    #[test]
    fn test_mock_shortlog_is_rewound() {
        let vcs = MockVcs::new().with_shortlog("Jane (1):\n      Initial commit\n\n");
        let mut file = vcs.shortlog(&ChangelogRange::Head).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert!(content.starts_with("Jane (1):"));
        assert_eq!(vcs.calls(), vec!["shortlog HEAD".to_string()]);
    }

    #[test]
    fn test_mock_failure_keeps_first_line() {
        let vcs = MockVcs::new().failing("archive");
        let err = vcs.create_archive("v1.0.0").unwrap_err();
        assert_eq!(err.to_string(), "fatal: archive failed");
        assert!(vcs.archives().is_empty());
    }
}
