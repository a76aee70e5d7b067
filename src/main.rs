use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use git_release::cli::{Release, ReleaseOutcome};
use git_release::config;
use git_release::domain::{BumpKind, ReleaseRequest};
use git_release::editor::NotesEditor;
use git_release::git::GitCli;
use git_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump the semantic version, write release notes and create an annotated, archived tag"
)]
struct Args {
    #[arg(short, long, help = "Include the abbreviated HEAD hash as build metadata")]
    info: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(value_parser = parse_bump, help = "Version field to bump: major, minor or patch")]
    bump: BumpKind,

    #[arg(help = "Pre-release label, e.g. rc1")]
    prerelease: Option<String>,
}

fn parse_bump(s: &str) -> std::result::Result<BumpKind, String> {
    s.parse().map_err(|e: git_release::ReleaseError| e.to_string())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let program = std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "git-release".to_string());

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage errors exit 1 rather than clap's 2; help that could not be written fails too.
            let code = match e.print() {
                Ok(()) if !e.use_stderr() => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    match run(args) {
        Ok(outcome) => {
            ui::display_release_summary(&outcome);
            println!("{}", outcome.tag);
        }
        Err(e) => {
            ui::display_error(&program, &format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<ReleaseOutcome> {
    let config = config::load_config(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Error loading config")?;

    let request = ReleaseRequest::new(
        args.bump,
        args.info,
        args.prerelease.unwrap_or_default(),
    )?;

    let editor = config.resolve_editor(std::env::var("EDITOR").ok());
    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let git = GitCli::new(config.git.clone(), cwd)
        .with_editor(editor.clone())
        .with_amend(config.amend_tag_message);

    ui::display_status(&format!("Preparing {} release", args.bump.name()));
    let mut release = Release::new(&git, NotesEditor::new(editor));
    let outcome = release.run(&request)?;
    Ok(outcome)
}
