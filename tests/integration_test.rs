// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Repository, Signature};
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

// Helper function to setup a temporary git repo with one commit
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");

    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    commit_file(&repo, temp_dir.path(), "README.md", "Initial content\n", "Initial commit");
    (temp_dir, repo)
}

fn commit_file(repo: &Repository, root: &Path, name: &str, content: &str, message: &str) {
    fs::write(root.join(name), content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new(name))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = Signature::now("Test User", "test@example.com").expect("Could not get sig");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit");
}

fn tag_message(repo: &Repository, tag: &str) -> String {
    let reference = repo
        .find_reference(&format!("refs/tags/{}", tag))
        .expect("tag should exist");
    let tag = reference.peel_to_tag().expect("tag should be annotated");
    tag.message().unwrap_or_default().to_string()
}

#[test]
fn test_git_release_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_git-release"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git-release"));
    assert!(stdout.contains("annotated"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_help_write_failure_exits_non_zero() {
    let Ok(full) = fs::OpenOptions::new().write(true).open("/dev/full") else {
        return;
    };

    let status = Command::new(env!("CARGO_BIN_EXE_git-release"))
        .arg("--help")
        .stdout(full)
        .status()
        .expect("Failed to execute command");

    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_unknown_bump_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_git-release"))
        .arg("huge")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown release version \"huge\""));
}

#[test]
fn test_missing_bump_is_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_git-release"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_editor_reported_with_program_name() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("release.toml");
    fs::write(&config, "").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_git-release"))
        .current_dir(dir.path())
        .env_remove("EDITOR")
        .args(["--config", config.to_str().unwrap(), "patch"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("git-release"));
    assert!(stderr.contains("EDITOR not set"));
}

#[test]
fn test_invalid_prerelease_label_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("release.toml");
    fs::write(&config, "").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_git-release"))
        .current_dir(dir.path())
        .env("EDITOR", "true")
        .args(["--config", config.to_str().unwrap(), "minor", "rc-1"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rc-1"));
}

#[cfg(unix)]
mod git_operations_tests {
    use super::*;
    use git_release::cli::Release;
    use git_release::domain::{BumpKind, ChangelogRange, ReleaseRequest};
    use git_release::editor::NotesEditor;
    use git_release::git::{GitCli, Vcs};
    use git_release::ReleaseError;
    use std::io::Read;

    fn gateway(dir: &TempDir) -> GitCli {
        GitCli::new("git", dir.path()).with_editor(Some("true".to_string()))
    }

    #[test]
    fn test_describe_without_tags_is_not_found() {
        if !git_available() {
            return;
        }
        let (dir, _repo) = setup_test_repo();

        let err = gateway(&dir).describe_latest_tag().unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {}", err);
    }

    #[test]
    fn test_shortlog_and_short_hash() {
        if !git_available() {
            return;
        }
        let (dir, repo) = setup_test_repo();
        let git = gateway(&dir);

        let mut file = git.shortlog(&ChangelogRange::Head).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert!(content.contains("Test User (1):"));
        assert!(content.contains("Initial commit"));

        let hash = git.short_head_hash().unwrap();
        assert!(!hash.ends_with('\n'));
        let head = repo.head().unwrap().target().unwrap().to_string();
        assert!(head.starts_with(&hash));
    }

    #[test]
    fn test_failed_command_reports_first_stderr_line() {
        if !git_available() {
            return;
        }
        let (dir, _repo) = setup_test_repo();

        let err = gateway(&dir).create_archive("v9.9.9").unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalTool(_)));
        assert!(!err.to_string().contains('\n'));
    }

    #[test]
    fn test_full_release_in_real_repository() {
        if !git_available() {
            return;
        }
        let (dir, repo) = setup_test_repo();
        let notes_dir = TempDir::new().unwrap();
        let notes = notes_dir.path().join("notes.txt");
        fs::write(&notes, "# dropped\nRelease notes\n").unwrap();

        let git = gateway(&dir);
        let editor = NotesEditor::new(Some(format!("cp {}", notes.display())));
        let request = ReleaseRequest::new(BumpKind::Patch, false, "").unwrap();

        let outcome = Release::new(&git, editor).run(&request).unwrap();

        assert_eq!(outcome.tag, "v0.0.1");
        assert!(dir.path().join("v0.0.1.tar.gz").exists());

        let message = tag_message(&repo, "v0.0.1");
        assert!(message.starts_with("Release notes\n"));
        assert!(message.contains("Changelog:"));
        assert!(message.contains("Initial commit"));
        assert!(!message.contains("dropped"));

        // A second release picks up the annotated tag and only the new commit.
        commit_file(&repo, dir.path(), "CHANGES.md", "more\n", "Add changes file");
        let editor = NotesEditor::new(Some(format!("cp {}", notes.display())));
        let request = ReleaseRequest::new(BumpKind::Minor, true, "rc1").unwrap();

        let outcome = Release::new(&git, editor).run(&request).unwrap();

        let hash = git.short_head_hash().unwrap();
        assert_eq!(outcome.tag, format!("v0.1.0-rc1+{}", hash));
        assert_eq!(outcome.previous.map(|v| v.to_string()), Some("v0.0.1".to_string()));
        let message = tag_message(&repo, &outcome.tag);
        assert!(message.contains("Add changes file"));
        assert!(!message.contains("Initial commit"));
        assert!(dir.path().join(format!("{}.tar.gz", outcome.tag)).exists());
    }
}
