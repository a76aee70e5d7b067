//! Release notes collection through the operator's text editor.

use crate::error::{ReleaseError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

/// Instructions written at the top of the notes buffer
pub const NOTES_PREAMBLE: &str = "\
# Enter notes about the release below. These would provide a high-level overview
# of what's in the release. Lines starting with '#' will be ignored, and the
# output of 'git shortlog' will be appended to the bottom.
";

/// Separator placed between the notes and the changelog in the tag message
pub const CHANGELOG_HEADER: &str = "\nChangelog:\n\n";

/// Run `command` on `path` attached to the caller's terminal, blocking until it exits
///
/// The command goes through `sh -c` the way git runs `GIT_EDITOR`, so values
/// with arguments or quoting (`code --wait`, `"my editor" -n`) behave the same
/// for the notes and for the final amend. The file path is passed as `$1`.
pub fn launch(command: &str, path: &Path) -> Result<()> {
    if command.trim().is_empty() {
        return Err(ReleaseError::config("EDITOR not set"));
    }

    log::debug!("opening {} with {}", path.display(), command);
    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{} \"$@\"", command))
        .arg(command)
        .arg(path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ReleaseError::external(&format!("{}: {}", command, e)))?;

    if !status.success() {
        return Err(ReleaseError::external(&format!(
            "{} exited with {}",
            command, status
        )));
    }
    Ok(())
}

/// Drop every line starting with `#`, keeping all others (blank ones too) in order
///
/// Works on raw bytes: notes are copied into the tag message in whatever
/// encoding the editor saved them. Every kept line ends with `\n`; a `\r`
/// before the newline is dropped.
pub fn strip_comments<R: BufRead>(input: R, out: &mut impl Write) -> Result<()> {
    for line in input.split(b'\n') {
        let mut line = line?;
        if line.first() == Some(&b'#') {
            continue;
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        out.write_all(&line)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Collects release notes in a temporary file opened in the configured editor
#[derive(Debug, Clone)]
pub struct NotesEditor {
    command: Option<String>,
}

impl NotesEditor {
    /// `command` is the resolved editor; blank values count as unset
    pub fn new(command: Option<String>) -> Self {
        NotesEditor {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Open the preamble in the editor and return the cleaned notes
    ///
    /// The returned buffer owns the temporary file; it is removed when the
    /// buffer is dropped, whatever happens afterwards.
    pub fn collect(&self) -> Result<NotesBuffer> {
        let command = self
            .command
            .as_deref()
            .ok_or_else(|| ReleaseError::config("EDITOR not set"))?;

        let mut file = tempfile::Builder::new().prefix("release-").tempfile()?;
        file.write_all(NOTES_PREAMBLE.as_bytes())?;
        file.flush()?;

        launch(command, file.path())?;

        // Editors may replace the file rather than write in place, so go by path.
        let edited = BufReader::new(File::open(file.path())?);
        let mut notes = Vec::new();
        strip_comments(edited, &mut notes)?;
        fs::write(file.path(), &notes)?;

        Ok(NotesBuffer { file, notes })
    }
}

/// Cleaned release notes, backed by the file that becomes the tag message
#[derive(Debug)]
pub struct NotesBuffer {
    file: NamedTempFile,
    notes: Vec<u8>,
}

impl NotesBuffer {
    /// Notes as collected, without the changelog
    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Append the changelog block, turning the notes into the full tag message
    pub fn append_changelog<R: Read>(&mut self, changelog: &mut R) -> Result<()> {
        let mut out = OpenOptions::new().append(true).open(self.file.path())?;
        out.write_all(CHANGELOG_HEADER.as_bytes())?;
        io::copy(changelog, &mut out)?;
        out.flush()?;
        Ok(())
    }
}
