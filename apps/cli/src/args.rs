//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stashbox_client::RedirectMode;

#[derive(Debug, Parser)]
#[command(
    name = "stashbox",
    version = env!("CARGO_PKG_VERSION"),
    about = "Client for the stashbox file-hosting service",
    propagate_version = true
)]
pub struct App {
    /// Account username.
    #[arg(short = 'u', long, global = true)]
    pub username: Option<String>,

    /// Account password.
    #[arg(short = 'p', long, global = true)]
    pub password: Option<String>,

    /// Extra request header as `Name: value`. Repeatable.
    #[arg(short = 'H', long = "header", global = true, value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Follow redirects (overrides --redirect).
    #[arg(short = 'L', long = "location", global = true)]
    pub follow: bool,

    /// Redirect handling for uploads.
    #[arg(long, global = true, value_enum, default_value = "follow")]
    pub redirect: RedirectOpt,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a file, optionally into a remote folder.
    Upload(UploadArgs),
    /// Download a file by URL or id.
    Download(DownloadArgs),
}

#[derive(Debug, clap::Args)]
pub struct UploadArgs {
    /// Local file to upload.
    pub file: PathBuf,

    /// Remote folder path (defaults to the account root).
    pub path: Option<String>,

    /// Require login to fetch the uploaded file.
    #[arg(long)]
    pub secured: bool,
}

#[derive(Debug, clap::Args)]
pub struct DownloadArgs {
    /// Full URL or file id.
    pub target: String,

    /// Write output to this path.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Name the output after the remote file.
    #[arg(short = 'O', long = "remote-name")]
    pub remote_name: bool,
}

/// CLI-facing redirect policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RedirectOpt {
    Follow,
    Manual,
    Error,
}

impl RedirectOpt {
    pub fn to_mode(self) -> RedirectMode {
        match self {
            RedirectOpt::Follow => RedirectMode::Follow,
            RedirectOpt::Manual => RedirectMode::Manual,
            RedirectOpt::Error => RedirectMode::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_upload_with_flags() {
        let app = App::try_parse_from([
            "stashbox", "-u", "alice", "-p", "secret", "upload", "report.pdf", "docs/2026",
        ])
        .unwrap();

        assert_eq!(app.username.as_deref(), Some("alice"));
        match app.cmd {
            Commands::Upload(args) => {
                assert_eq!(args.file, PathBuf::from("report.pdf"));
                assert_eq!(args.path.as_deref(), Some("docs/2026"));
                assert!(!args.secured);
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn parses_repeated_headers() {
        let app = App::try_parse_from([
            "stashbox",
            "-H",
            "X-Trace: 1",
            "-H",
            "X-Env: test",
            "download",
            "f-1",
            "-O",
        ])
        .unwrap();
        assert_eq!(app.headers.len(), 2);
    }

    #[test]
    fn parses_download_output() {
        let app = App::try_parse_from([
            "stashbox", "download", "https://x/d/a.bin", "-o", "/tmp/a.bin",
        ])
        .unwrap();
        match app.cmd {
            Commands::Download(args) => {
                assert_eq!(args.output, Some(PathBuf::from("/tmp/a.bin")));
                assert!(!args.remote_name);
            }
            _ => panic!("expected download"),
        }
    }

    #[test]
    fn redirect_defaults_to_follow() {
        let app = App::try_parse_from(["stashbox", "upload", "a.bin"]).unwrap();
        assert_eq!(app.redirect, RedirectOpt::Follow);
        assert!(!app.follow);
    }

    #[test]
    fn redirect_manual_parses() {
        let app =
            App::try_parse_from(["stashbox", "--redirect", "manual", "upload", "a.bin"]).unwrap();
        assert_eq!(app.redirect.to_mode(), RedirectMode::Manual);
    }

    #[test]
    fn location_flag_parses() {
        let app = App::try_parse_from(["stashbox", "-L", "download", "f-1", "-O"]).unwrap();
        assert!(app.follow);
    }

    #[test]
    fn missing_subcommand_fails() {
        assert!(App::try_parse_from(["stashbox"]).is_err());
    }
}
