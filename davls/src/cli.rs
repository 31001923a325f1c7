// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Clone, ValueEnum)]
enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Args)]
pub(crate) struct Reply {
    /// File containing the body of a reply to a PROPFIND request.
    ///
    /// Reads from stdin if omitted or `-`.
    pub(crate) file: Option<PathBuf>,

    /// Path of the directory that was listed.
    ///
    /// Example: `/dav/`. If omitted, the shortest href in the reply is used.
    #[arg(long)]
    pub(crate) path: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the entries in a directory listing
    List {
        #[command(flatten)]
        reply: Reply,
    },
    /// Report problems found while decoding a directory listing
    Check {
        #[command(flatten)]
        reply: Reply,
    },
}

#[derive(Parser)]
#[clap(author, version = env!("DAVLS_VERSION"), about, long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,

    /// Change logging verbosity
    #[clap(short, long)]
    verbose: Option<Verbosity>,
}

impl Cli {
    /// Returns the desired log level.
    /// The default log level is WARN.
    pub(crate) fn log_level(&self) -> log::Level {
        match self.verbose {
            Some(Verbosity::Error) => log::Level::Error,
            Some(Verbosity::Warn) | None => log::Level::Warn,
            Some(Verbosity::Info) => log::Level::Info,
            Some(Verbosity::Debug) => log::Level::Debug,
            Some(Verbosity::Trace) => log::Level::Trace,
        }
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn parse_list_with_path() {
    let cli = Cli::try_parse_from(["davls", "-v", "debug", "list", "--path", "/dav/", "reply.xml"])
        .unwrap();
    assert_eq!(cli.log_level(), log::Level::Debug);
    match cli.command {
        Command::List { reply } => {
            assert_eq!(reply.path.as_deref(), Some("/dav/"));
            assert_eq!(reply.file, Some(PathBuf::from("reply.xml")));
        }
        Command::Check { .. } => panic!("expected list command"),
    }
}
