// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! The decoded contents of a directory.

use std::str::Utf8Error;

use crate::entry::{FilesystemEntry, PropertyStatus};
use crate::names::Tag;
use crate::time::TimestampError;
use crate::xmlutils::{parent_path, same_path};

/// A problem in a reply which did not prevent decoding the rest of it.
///
/// Properties or responses affected by a soft error are left out of the [`Listing`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SoftError {
    #[error("could not parse {property}: {source}")]
    Timestamp {
        property: Tag,
        source: TimestampError,
    },

    #[error("resource type of '{href}' has status {status:?}")]
    UnresolvedResourceType {
        href: String,
        status: PropertyStatus,
    },

    #[error("response without href")]
    MissingHref,

    #[error("href is not valid utf-8 once decoded")]
    InvalidHref(#[from] Utf8Error),
}

/// The result of decoding a `PROPFIND` reply.
///
/// `current_directory` is the entry for the listed directory itself, if the server included it.
/// All other entries are in `children`, in the order in which the server returned them.
#[derive(Debug, Default)]
pub struct Listing {
    pub current_directory: Option<FilesystemEntry>,
    pub children: Vec<FilesystemEntry>,
    /// Soft errors, in the order in which they were found.
    pub errors: Vec<SoftError>,
    directory_path: Option<String>,
}

impl Listing {
    /// Splits decoded entries into the listed directory and its children.
    ///
    /// `entries` pairs each entry with its decoded path. The first entry whose path matches
    /// `directory_path` becomes the current directory. No match is not an error.
    pub(crate) fn assemble(
        entries: Vec<(String, FilesystemEntry)>,
        directory_path: Option<String>,
        errors: Vec<SoftError>,
    ) -> Listing {
        let mut current_directory = None;
        let mut children = Vec::with_capacity(entries.len());

        for (path, entry) in entries {
            let is_current = current_directory.is_none()
                && directory_path
                    .as_deref()
                    .map_or(false, |dir| same_path(dir, &path));
            if is_current {
                current_directory = Some(entry);
            } else {
                children.push(entry);
            }
        }

        Listing {
            current_directory,
            children,
            errors,
            directory_path,
        }
    }

    /// Returns true if any soft error occurred while decoding.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// A human-readable description of the most recent soft error, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.errors.last().map(ToString::to_string)
    }

    /// Path of the listed directory.
    ///
    /// This is either the path given by the caller, or the shortest `href` in the reply.
    #[must_use]
    pub fn directory_path(&self) -> Option<&str> {
        self.directory_path.as_deref()
    }

    /// Path of the directory containing the listed one, with a trailing slash.
    #[must_use]
    pub fn parent_path(&self) -> Option<&str> {
        self.directory_path.as_deref().and_then(parent_path)
    }
}
