//! Tests for add and run subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_add() {
    match parse(&["ytq", "add", "https://youtu.be/dQw4w9WgXcQ"]) {
        CliCommand::Add {
            urls,
            file,
            no_resolve,
        } => {
            assert_eq!(urls, vec!["https://youtu.be/dQw4w9WgXcQ".to_string()]);
            assert!(file.is_none());
            assert!(!no_resolve);
        }
        _ => panic!("expected Add"),
    }
}

#[test]
fn cli_parse_add_many_and_stdin() {
    match parse(&["ytq", "add", "https://a.example/1", "-", "https://a.example/2"]) {
        CliCommand::Add { urls, .. } => assert_eq!(urls.len(), 3),
        _ => panic!("expected Add"),
    }
}

#[test]
fn cli_parse_add_file_no_resolve() {
    match parse(&["ytq", "add", "--file", "links.txt", "--no-resolve"]) {
        CliCommand::Add {
            urls,
            file,
            no_resolve,
        } => {
            assert!(urls.is_empty());
            assert_eq!(file.as_deref(), Some(std::path::Path::new("links.txt")));
            assert!(no_resolve);
        }
        _ => panic!("expected Add with --file"),
    }
}

#[test]
fn cli_parse_run() {
    match parse(&["ytq", "run"]) {
        CliCommand::Run { jobs, dir } => {
            assert!(jobs.is_none());
            assert!(dir.is_none());
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_jobs_dir() {
    match parse(&["ytq", "run", "--jobs", "2", "--dir", "/tmp/music"]) {
        CliCommand::Run { jobs, dir } => {
            assert_eq!(jobs, Some(2));
            assert_eq!(dir.as_deref(), Some(std::path::Path::new("/tmp/music")));
        }
        _ => panic!("expected Run with --jobs"),
    }
}

#[test]
fn cli_parse_run_rejects_bad_jobs() {
    assert!(Cli::try_parse_from(["ytq", "run", "--jobs", "many"]).is_err());
}
