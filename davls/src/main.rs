// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

use std::io::Read;

use anyhow::Context;
use clap::Parser;
use libdavfs::{FilesystemEntry, Listing};

mod cli;

fn read_reply(reply: &cli::Reply) -> anyhow::Result<Listing> {
    let raw = match &reply.file {
        Some(file) if file.as_os_str() != "-" => std::fs::read(file)
            .with_context(|| format!("failed to read {}", file.display()))?,
        _ => {
            let mut raw = Vec::new();
            std::io::stdin()
                .read_to_end(&mut raw)
                .context("failed to read stdin")?;
            raw
        }
    };

    libdavfs::parse_propfind_reply(&raw, reply.path.as_deref()).context("could not parse reply")
}

fn format_entry(entry: &FilesystemEntry) -> String {
    let kind = if entry.is_directory() { 'd' } else { '-' };
    let modified = entry.modification_datetime().map_or_else(
        || String::from("-"),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    format!("{kind} {modified:>19} {}", entry.name)
}

fn list(listing: &Listing) {
    if let Some(current) = &listing.current_directory {
        println!("{}", format_entry(current));
    }
    if let Some(parent) = listing.parent_path() {
        println!("(parent: {parent})");
    }
    if listing.children.is_empty() {
        println!("No entries in directory");
    } else {
        for entry in &listing.children {
            println!("{}", format_entry(entry));
        }
    }
}

fn check(listing: &Listing) -> anyhow::Result<()> {
    for error in &listing.errors {
        println!("- {error}");
    }
    if listing.has_errors() {
        anyhow::bail!("{} problem(s) found in reply", listing.errors.len());
    }
    println!("No problems found.");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    simple_logger::init_with_level(cli.log_level()).context("failed to initialise logger")?;

    match &cli.command {
        cli::Command::List { reply } => list(&read_reply(reply)?),
        cli::Command::Check { reply } => check(&read_reply(reply)?)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use libdavfs::{EntryKind, FilesystemEntry};

    use super::format_entry;

    #[test]
    fn test_format_entry() {
        let entry = FilesystemEntry {
            name: "Диск 1".to_string(),
            kind: EntryKind::Directory,
            creation_time: None,
            modification_time: Some(784_111_777),
        };
        assert_eq!(format_entry(&entry), "d 1994-11-06 08:49:37 Диск 1");

        let entry = FilesystemEntry {
            name: "notes.txt".to_string(),
            kind: EntryKind::File,
            creation_time: None,
            modification_time: None,
        };
        assert_eq!(
            format_entry(&entry),
            format!("- {:>19} notes.txt", "-")
        );
    }
}
