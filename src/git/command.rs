use crate::domain::ChangelogRange;
use crate::error::{ReleaseError, Result};
use crate::git::Vcs;
use std::ffi::OsStr;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

/// Diagnostics `git describe` prints when there is simply no tag to find
const NO_TAG_MARKERS: [&str; 3] = [
    "No names found",
    "No tags can describe",
    "No annotated tags can describe",
];

/// Gateway backed by the system `git` binary
pub struct GitCli {
    program: String,
    workdir: PathBuf,
    editor: Option<String>,
    amend_tag_message: bool,
}

impl GitCli {
    /// Run `program` inside `workdir`
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        GitCli {
            program: program.into(),
            workdir: workdir.into(),
            editor: None,
            amend_tag_message: true,
        }
    }

    /// Editor git uses for the final tag message amend (`GIT_EDITOR`)
    pub fn with_editor(mut self, editor: Option<String>) -> Self {
        self.editor = editor;
        self
    }

    /// Whether `git tag` reopens the message in the editor before writing it
    pub fn with_amend(mut self, amend: bool) -> Self {
        self.amend_tag_message = amend;
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.workdir).args(args);
        log::trace!("running {:?}", cmd);
        cmd
    }

    /// Command whose output is parsed or reported; messages stay untranslated
    fn captured<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.command(args);
        cmd.env("LC_ALL", "C").stdin(Stdio::null());
        cmd
    }

    /// Run with captured output, failing on non-zero exit
    fn run_captured(&self, args: &[&str]) -> Result<Output> {
        let output = self
            .captured(args)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(self.failure(args, &output.stderr, output.status));
        }
        Ok(output)
    }

    fn spawn_error(&self, e: std::io::Error) -> ReleaseError {
        ReleaseError::external(&format!("{}: {}", self.program, e))
    }

    fn failure(
        &self,
        args: &[&str],
        stderr: &[u8],
        status: std::process::ExitStatus,
    ) -> ReleaseError {
        let stderr = String::from_utf8_lossy(stderr);
        if stderr.trim().is_empty() {
            let sub = args.first().copied().unwrap_or_default();
            ReleaseError::external(&format!("{} {} failed: {}", self.program, sub, status))
        } else {
            ReleaseError::external(&stderr)
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        GitCli::new("git", ".")
    }
}

impl Vcs for GitCli {
    fn describe_latest_tag(&self) -> Result<String> {
        let args = ["describe", "--abbrev=0"];
        let output = self
            .captured(args)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if NO_TAG_MARKERS.iter().any(|m| stderr.contains(m)) {
                return Err(ReleaseError::not_found("no tag describes HEAD"));
            }
            return Err(self.failure(&args, &output.stderr, output.status));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim_end_matches('\n').to_string())
    }

    fn short_head_hash(&self) -> Result<String> {
        let output = self.run_captured(&["log", "-n", "1", "--format=%h"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim_end_matches('\n').to_string())
    }

    fn shortlog(&self, range: &ChangelogRange) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("release-changelog-")
            .tempfile()?;

        let range = range.to_string();
        let args = ["shortlog", range.as_str()];
        let output = self
            .captured(args)
            .stdout(file.reopen()?)
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(self.failure(&args, &output.stderr, output.status));
        }

        file.seek(SeekFrom::Start(0))?;
        Ok(file)
    }

    fn create_annotated_tag(&self, name: &str, message_file: &Path) -> Result<()> {
        let file = message_file.to_string_lossy();
        let mut args = vec!["tag", "-a", name];
        if self.amend_tag_message {
            args.push("-e");
        }
        args.extend(["-F", &*file]);

        let mut cmd = self.command(&args);
        if let Some(editor) = &self.editor {
            cmd.env("GIT_EDITOR", editor);
        }

        // The amend editor needs the terminal and the user's locale; only stderr is captured.
        let output = cmd
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(self.failure(&args, &output.stderr, output.status));
        }
        Ok(())
    }

    fn create_archive(&self, tag: &str) -> Result<PathBuf> {
        let archive = format!("{}.tar.gz", tag);
        self.run_captured(&["archive", "-o", archive.as_str(), tag])?;
        Ok(self.workdir.join(archive))
    }
}
