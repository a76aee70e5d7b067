//! Release workflow orchestration
//!
//! Drives a bump request through notes collection, version resolution,
//! changelog extraction, tagging and archiving. Stages run strictly in order;
//! the first failing stage ends the run and its error is returned unchanged.
//! A tag that was already created is not removed when archiving fails.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use crate::domain::{ChangelogRange, ReleaseRequest, SemanticVersion};
use crate::editor::NotesEditor;
use crate::error::Result;
use crate::git::Vcs;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    NotesCollected,
    VersionResolved,
    ChangelogCollected,
    TagMessageAssembled,
    Tagged,
    Archived,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::NotesCollected => "notes collected",
            Stage::VersionResolved => "version resolved",
            Stage::ChangelogCollected => "changelog collected",
            Stage::TagMessageAssembled => "tag message assembled",
            Stage::Tagged => "tagged",
            Stage::Archived => "archived",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Version parsed from the previous tag; `None` on the first release
    pub previous: Option<SemanticVersion>,

    /// The version that was tagged
    pub version: SemanticVersion,

    /// Rendered tag name
    pub tag: String,

    /// Archive written for the tag
    pub archive: PathBuf,
}

/// Release pipeline over a version-control gateway
pub struct Release<'a, V: Vcs> {
    vcs: &'a V,
    editor: NotesEditor,
    stage: Stage,
}

impl<'a, V: Vcs> Release<'a, V> {
    pub fn new(vcs: &'a V, editor: NotesEditor) -> Self {
        Release {
            vcs,
            editor,
            stage: Stage::Start,
        }
    }

    /// Last stage reached
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        log::debug!("release stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Run the whole pipeline for `request`
    pub fn run(&mut self, request: &ReleaseRequest) -> Result<ReleaseOutcome> {
        // Nothing in the repository is touched before the notes are in.
        let mut notes = self.editor.collect()?;
        self.advance(Stage::NotesCollected);

        let (previous, range) = self.previous_version()?;
        let version = self.next_version(previous.as_ref(), request)?;
        self.advance(Stage::VersionResolved);

        let mut changelog = self.vcs.shortlog(&range)?;
        self.advance(Stage::ChangelogCollected);

        // The message stays on disk; only git reads it back.
        notes.append_changelog(&mut changelog)?;
        self.advance(Stage::TagMessageAssembled);

        let tag = version.to_string();
        self.vcs.create_annotated_tag(&tag, notes.path())?;
        self.advance(Stage::Tagged);

        let archive = self.vcs.create_archive(&tag)?;
        self.advance(Stage::Archived);

        self.advance(Stage::Done);
        Ok(ReleaseOutcome {
            previous,
            version,
            tag,
            archive,
        })
    }

    /// Version of the latest tag and the commit range since it
    fn previous_version(&self) -> Result<(Option<SemanticVersion>, ChangelogRange)> {
        match self.vcs.describe_latest_tag() {
            Ok(tag) => {
                let version = SemanticVersion::parse(&tag)?;
                Ok((Some(version), ChangelogRange::from_previous_tag(Some(tag.as_str()))))
            }
            Err(e) if e.is_not_found() => {
                log::info!("no previous tag, starting from v0.0.0");
                Ok((None, ChangelogRange::Head))
            }
            Err(e) => Err(e),
        }
    }

    fn next_version(
        &self,
        previous: Option<&SemanticVersion>,
        request: &ReleaseRequest,
    ) -> Result<SemanticVersion> {
        let mut version = previous.cloned().unwrap_or_default();
        version.bump(request.bump);
        version.prerelease = request.prerelease.clone();

        if request.include_build_metadata {
            version.build = self.vcs.short_head_hash()?;
        }

        if let Some(previous) = previous {
            if version.precedence(previous) != Ordering::Greater {
                log::warn!("{} does not sort after {}", version, previous);
            }
        }

        Ok(version)
    }
}
