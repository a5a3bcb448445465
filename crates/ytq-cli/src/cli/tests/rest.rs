//! Tests for the remaining subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_status() {
    match parse(&["ytq", "status"]) {
        CliCommand::Status => {}
        _ => panic!("expected Status"),
    }
}

#[test]
fn cli_parse_remove() {
    match parse(&["ytq", "remove", "3", "7"]) {
        CliCommand::Remove { ids, delete_files } => {
            assert_eq!(ids, vec![3, 7]);
            assert!(!delete_files);
        }
        _ => panic!("expected Remove"),
    }
}

#[test]
fn cli_parse_remove_delete_files() {
    match parse(&["ytq", "remove", "--delete-files", "1"]) {
        CliCommand::Remove { ids, delete_files } => {
            assert_eq!(ids, vec![1]);
            assert!(delete_files);
        }
        _ => panic!("expected Remove with --delete-files"),
    }
}

#[test]
fn cli_parse_remove_requires_id() {
    assert!(Cli::try_parse_from(["ytq", "remove"]).is_err());
}

#[test]
fn cli_parse_cancel() {
    match parse(&["ytq", "cancel"]) {
        CliCommand::Cancel { id } => assert!(id.is_none()),
        _ => panic!("expected Cancel"),
    }
    match parse(&["ytq", "cancel", "5"]) {
        CliCommand::Cancel { id } => assert_eq!(id, Some(5)),
        _ => panic!("expected Cancel with id"),
    }
}

#[test]
fn cli_parse_retry() {
    match parse(&["ytq", "retry", "12"]) {
        CliCommand::Retry { id, dir } => {
            assert_eq!(id, 12);
            assert!(dir.is_none());
        }
        _ => panic!("expected Retry"),
    }
}

#[test]
fn cli_parse_show_dir() {
    match parse(&["ytq", "show", "4", "--dir", "/music"]) {
        CliCommand::Show { id, dir } => {
            assert_eq!(id, 4);
            assert_eq!(dir.as_deref(), Some(std::path::Path::new("/music")));
        }
        _ => panic!("expected Show"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["ytq", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    match parse(&["ytq", "man"]) {
        CliCommand::Man => {}
        _ => panic!("expected Man"),
    }
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
