// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Entries of a directory listing.

use chrono::{DateTime, Utc};

/// Whether a resource is a collection or a plain resource.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    #[default]
    File,
}

/// Status of a single property inside a `response`.
///
/// Each `propstat` block in a response pairs some properties with a single status line. The
/// status of a property is unknown until the status line of its block has been read.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStatus {
    /// The property was never seen.
    #[default]
    None,
    /// The property is inside a `propstat` whose status has not been read yet.
    Unknown,
    Ok,
    Unauthorized,
    Forbidden,
    NotFound,
}

/// A single file or directory found in a `PROPFIND` reply.
///
/// Timestamps are seconds since the Unix epoch, in UTC. A timestamp is `None` if the server did
/// not return it with a successful status, or if its value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemEntry {
    /// Last segment of the entry's path, percent-decoded.
    pub name: String,
    pub kind: EntryKind,
    pub creation_time: Option<i64>,
    pub modification_time: Option<i64>,
}

impl FilesystemEntry {
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    #[must_use]
    pub fn is_creation_time_valid(&self) -> bool {
        self.creation_time.is_some()
    }

    #[must_use]
    pub fn is_modification_time_valid(&self) -> bool {
        self.modification_time.is_some()
    }

    #[must_use]
    pub fn creation_datetime(&self) -> Option<DateTime<Utc>> {
        self.creation_time.and_then(|t| DateTime::from_timestamp(t, 0))
    }

    #[must_use]
    pub fn modification_datetime(&self) -> Option<DateTime<Utc>> {
        self.modification_time
            .and_then(|t| DateTime::from_timestamp(t, 0))
    }
}
